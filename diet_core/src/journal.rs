//! Append-only JSONL journals for logged entries.
//!
//! Weight readings and food entries are appended to JSON Lines files with
//! file locking to ensure safe concurrent access. Unparseable lines are
//! skipped with a warning rather than failing the whole read.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Sink trait for persisting logged entries
pub trait EntrySink<T> {
    fn append(&mut self, entry: &T) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new JSONL journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sidecar file serializing writers of this journal
    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Take the exclusive writer lock; released when the file is unlocked or dropped
    fn lock_writers(&self) -> Result<File> {
        self.ensure_parent_dir()?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    /// Read, edit and write back the journal under the writer lock
    ///
    /// Appends take the same lock, so none can land between the read and
    /// the rename.
    pub fn modify<T, F, R>(&self, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let lock = self.lock_writers()?;
        let mut entries: Vec<T> = read_entries(&self.path)?;
        let outcome = f(&mut entries)?;
        self.write_atomic(&entries)?;
        lock.unlock()?;
        Ok(outcome)
    }

    /// Write to a temp file in the same directory and rename it over the journal
    ///
    /// Callers must hold the writer lock.
    fn write_atomic<T: Serialize>(&self, entries: &[T]) -> Result<()> {
        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            Error::Other(format!("journal path {:?} has no parent", self.path))
        })?)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for entry in entries {
                serde_json::to_writer(&mut writer, entry)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Rewrote {:?} with {} entries", self.path, entries.len());
        Ok(())
    }
}

impl<T: Serialize> EntrySink<T> for JsonlJournal {
    fn append(&mut self, entry: &T) -> Result<()> {
        // Serialize with rewrites so an append never targets a replaced file
        let lock = self.lock_writers()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write entry as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        lock.unlock()?;

        tracing::debug!("Appended entry to {:?}", self.path);
        Ok(())
    }
}

/// Read all entries from a JSONL file
///
/// A missing file reads as empty.
pub fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(
                    "Skipping unparseable line {} in {:?}: {}",
                    line_num + 1,
                    path,
                    e
                );
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} entries from {:?}", entries.len(), path);
    Ok(entries)
}
