//! Body-weight history.
//!
//! Readings are stored in a JSONL journal in the order they were logged.
//! This module provides the two views callers need: a chronological
//! history for display and the newest-first window fed to the progress
//! engine.

use crate::journal::{read_entries, EntrySink, JsonlJournal};
use crate::validation::validate_logged_weight;
use crate::{Result, WeightObservation};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Log a new reading taken at `recorded_at`
pub fn record_weight(
    path: &Path,
    weight_kg: f64,
    recorded_at: DateTime<Utc>,
) -> Result<WeightObservation> {
    validate_logged_weight(weight_kg)?;

    let observation = WeightObservation {
        weight_kg,
        recorded_at,
    };
    let mut journal = JsonlJournal::new(path);
    journal.append(&observation)?;

    tracing::info!("Logged weight {:.1} kg", weight_kg);
    Ok(observation)
}

/// All readings sorted oldest first
pub fn load_history(path: &Path) -> Result<Vec<WeightObservation>> {
    let mut entries: Vec<WeightObservation> = read_entries(path)?;
    entries.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
    Ok(entries)
}

/// The first `limit` readings, oldest first
///
/// Mirrors the chart view, which shows the start of the history.
pub fn load_history_page(path: &Path, limit: usize) -> Result<Vec<WeightObservation>> {
    let mut entries = load_history(path)?;
    entries.truncate(limit);
    Ok(entries)
}

/// The `count` most recent readings, newest first
pub fn load_recent(path: &Path, count: usize) -> Result<Vec<WeightObservation>> {
    let mut entries = load_history(path)?;
    entries.reverse();
    entries.truncate(count);

    tracing::debug!("Loaded {} recent weight readings", entries.len());
    Ok(entries)
}
