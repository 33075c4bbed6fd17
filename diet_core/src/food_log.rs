//! Daily food log.
//!
//! Each eaten item is appended to a JSONL journal with its energy and
//! macros. Entries are grouped by local calendar day for the daily
//! summary.

use crate::journal::{read_entries, EntrySink, JsonlJournal};
use crate::validation::validate_food_entry;
use crate::{Error, MacroTotals, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// A logged food item
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodLogEntry {
    pub id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub logged_at: DateTime<Utc>,
}

impl FoodLogEntry {
    pub fn macros(&self) -> MacroTotals {
        MacroTotals {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }

    /// Local calendar day the entry belongs to
    pub fn local_date(&self) -> NaiveDate {
        self.logged_at.with_timezone(&Local).date_naive()
    }
}

/// Validate and append a new entry
pub fn add_entry(
    path: &Path,
    food_name: &str,
    macros: MacroTotals,
    logged_at: DateTime<Utc>,
) -> Result<FoodLogEntry> {
    validate_food_entry(
        food_name,
        macros.calories,
        macros.protein,
        macros.carbs,
        macros.fat,
    )?;

    let entry = FoodLogEntry {
        id: Uuid::new_v4(),
        food_name: food_name.trim().to_string(),
        calories: macros.calories,
        protein: macros.protein,
        carbs: macros.carbs,
        fat: macros.fat,
        logged_at,
    };

    let mut journal = JsonlJournal::new(path);
    journal.append(&entry)?;

    tracing::info!(
        "Logged {} ({:.0} kcal) as {}",
        entry.food_name,
        entry.calories,
        entry.id
    );
    Ok(entry)
}

/// All entries in logging order
pub fn load_entries(path: &Path) -> Result<Vec<FoodLogEntry>> {
    read_entries(path)
}

/// Entries logged on a local calendar day, newest first
pub fn entries_on(path: &Path, date: NaiveDate) -> Result<Vec<FoodLogEntry>> {
    let mut entries: Vec<FoodLogEntry> = load_entries(path)?
        .into_iter()
        .filter(|e| e.local_date() == date)
        .collect();
    entries.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
    Ok(entries)
}

/// Sum of energy and macros over a set of entries
pub fn totals(entries: &[FoodLogEntry]) -> MacroTotals {
    entries.iter().map(FoodLogEntry::macros).sum()
}

/// Remove an entry by id, returning it
pub fn remove_entry(path: &Path, id: Uuid) -> Result<FoodLogEntry> {
    let removed = JsonlJournal::new(path).modify(|entries: &mut Vec<FoodLogEntry>| {
        let position = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("food log entry {}", id)))?;
        Ok(entries.remove(position))
    })?;

    tracing::info!("Removed food log entry {}", id);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn banana() -> MacroTotals {
        MacroTotals {
            calories: 89.0,
            protein: 1.1,
            carbs: 23.0,
            fat: 0.3,
        }
    }

    #[test]
    fn test_add_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("food.jsonl");

        let entry = add_entry(&path, "  Banana ", banana(), Utc::now()).unwrap();
        assert_eq!(entry.food_name, "Banana");

        let entries = load_entries(&path).unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_entries_on_filters_by_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("food.jsonl");
        let now = Utc::now();

        add_entry(&path, "Old", banana(), now - Duration::days(2)).unwrap();
        let today = add_entry(&path, "Today", banana(), now).unwrap();

        let entries = entries_on(&path, today.local_date()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].food_name, "Today");
    }

    #[test]
    fn test_totals() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("food.jsonl");
        let now = Utc::now();

        add_entry(&path, "Banana", banana(), now).unwrap();
        add_entry(
            &path,
            "Chicken",
            MacroTotals {
                calories: 165.0,
                protein: 31.0,
                carbs: 0.0,
                fat: 3.6,
            },
            now,
        )
        .unwrap();

        let sum = totals(&load_entries(&path).unwrap());
        assert_eq!(sum.calories, 254.0);
        assert_eq!(sum.carbs, 23.0);
    }

    #[test]
    fn test_remove_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("food.jsonl");

        let keep = add_entry(&path, "Keep", banana(), Utc::now()).unwrap();
        let dropped = add_entry(&path, "Drop", banana(), Utc::now()).unwrap();

        let removed = remove_entry(&path, dropped.id).unwrap();
        assert_eq!(removed.food_name, "Drop");
        assert_eq!(load_entries(&path).unwrap(), vec![keep]);

        assert!(matches!(
            remove_entry(&path, Uuid::new_v4()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("food.jsonl");

        let mut bad = banana();
        bad.calories = 20_000.0;
        assert!(add_entry(&path, "Feast", bad, Utc::now()).is_err());
    }

    #[test]
    fn test_remove_concurrent_with_adds_keeps_new_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("food.jsonl");

        let doomed: Vec<Uuid> = (0..10)
            .map(|i| {
                add_entry(&path, &format!("Old {}", i), banana(), Utc::now())
                    .unwrap()
                    .id
            })
            .collect();

        let remover_path = path.clone();
        let remover = std::thread::spawn(move || {
            for id in doomed {
                remove_entry(&remover_path, id).unwrap();
            }
        });
        let adder_path = path.clone();
        let adder = std::thread::spawn(move || {
            for i in 0..10 {
                add_entry(&adder_path, &format!("New {}", i), banana(), Utc::now()).unwrap();
            }
        });
        remover.join().unwrap();
        adder.join().unwrap();

        let names: Vec<String> = load_entries(&path)
            .unwrap()
            .into_iter()
            .map(|e| e.food_name)
            .collect();
        assert_eq!(names.len(), 10);
        assert!(names.iter().all(|n| n.starts_with("New")));
    }
}
