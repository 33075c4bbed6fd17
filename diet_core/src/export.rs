//! CSV export of the weight and food journals.
//!
//! Each export rewrites the target CSV from scratch so repeated exports
//! stay consistent with the journal. The CSV is fsynced before returning.

use crate::food_log::{load_entries, FoodLogEntry};
use crate::weight_log::load_history;
use crate::{Result, WeightObservation};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// A row in the weights CSV
#[derive(Debug, Serialize)]
struct WeightRow {
    recorded_at: String,
    weight_kg: f64,
}

impl From<&WeightObservation> for WeightRow {
    fn from(obs: &WeightObservation) -> Self {
        WeightRow {
            recorded_at: obs.recorded_at.to_rfc3339(),
            weight_kg: obs.weight_kg,
        }
    }
}

/// A row in the food log CSV
#[derive(Debug, Serialize)]
struct FoodRow {
    id: String,
    logged_at: String,
    date: String,
    food_name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl From<&FoodLogEntry> for FoodRow {
    fn from(entry: &FoodLogEntry) -> Self {
        FoodRow {
            id: entry.id.to_string(),
            logged_at: entry.logged_at.to_rfc3339(),
            date: entry.local_date().format("%Y-%m-%d").to_string(),
            food_name: entry.food_name.clone(),
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
        }
    }
}

fn write_rows<R: Serialize>(csv_path: &Path, rows: impl IntoIterator<Item = R>) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    Ok(count)
}

/// Export the weight history (oldest first), returning the row count
pub fn export_weights(history_path: &Path, csv_path: &Path) -> Result<usize> {
    let history = load_history(history_path)?;
    let count = write_rows(csv_path, history.iter().map(WeightRow::from))?;
    tracing::info!("Exported {} weight readings to {:?}", count, csv_path);
    Ok(count)
}

/// Export the food log in logging order, returning the row count
pub fn export_food_log(log_path: &Path, csv_path: &Path) -> Result<usize> {
    let entries = load_entries(log_path)?;
    let count = write_rows(csv_path, entries.iter().map(FoodRow::from))?;
    tracing::info!("Exported {} food entries to {:?}", count, csv_path);
    Ok(count)
}
