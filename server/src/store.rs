// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fs;
use std::io;
use std::path::PathBuf;

use common::Task;
use thiserror::Error;
use tracing::debug;

// Define the directory where we want to store the data
const DATA_DIR: &str = "data";
const TASKS_FILE_NAME: &str = "tasks.json";

/// Errors the store can report. Callers need to tell a corrupt value apart
/// from an unreachable file, so this is an enum rather than an opaque error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access the task file")]
    Io(#[from] io::Error),

    #[error("stored value is not a valid task collection")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable backing for the task collection: one JSON file holding the full
/// serialized sequence, overwritten as a whole on every save.
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The fixed location the application persists its collection under.
    pub fn default_path() -> PathBuf {
        [DATA_DIR, TASKS_FILE_NAME].iter().collect()
    }

    /// Reads the stored collection. A missing file is an empty collection,
    /// not an error; an unparseable file is `StoreError::Corrupt`.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            debug!("No task file at {}, starting empty.", self.path.display());
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path)?;
        let tasks: Vec<Task> = serde_json::from_str(&data)?;

        debug!(
            "Loaded {} tasks from {}.",
            tasks.len(),
            self.path.display()
        );
        Ok(tasks)
    }

    /// Serializes and replaces the stored collection. The data is written to
    /// a sibling temp file first and renamed over the target, so a reader
    /// never observes a half-written file.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?; // Recursively creates directories if they don't exist
            }
        }

        let data = serde_json::to_string_pretty(tasks)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("Saved {} tasks to {}.", tasks.len(), self.path.display());
        Ok(())
    }
}
