// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{NaiveDate, Utc};
use common::{Priority, Task};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::store::TaskStore;

/// The one rejection the collection enforces: a task can never end up with
/// blank text. Creation swallows blank submissions silently instead (see
/// [`TaskManager::add`]), so this error only comes out of `edit`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("task text cannot be empty")]
    EmptyText,
}

/// Owns the canonical task sequence and mediates every read and write of the
/// backing store. All mutation goes through here; nothing else touches the
/// persisted value.
///
/// Persistence is write-through: each successful mutation re-saves the whole
/// collection before returning. A failed save is logged and the in-memory
/// state stays authoritative for the rest of the session.
pub struct TaskManager {
    tasks: Vec<Task>,
    next_id: i64,
    store: TaskStore,
}

impl TaskManager {
    /// Loads the collection from the store. A corrupt or unreadable value
    /// falls back to an empty collection; startup never fails on bad data.
    pub fn new(store: TaskStore) -> Self {
        let tasks = match store.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(
                    "Could not load the saved task collection, starting empty: {:?}",
                    e
                );
                Vec::new()
            }
        };

        // Ids come from a monotonic counter seeded past everything already
        // stored, so additions are unique even within the same millisecond.
        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;

        Self {
            tasks,
            next_id,
            store,
        }
    }

    /// Read accessor for the canonical sequence, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Appends a new task and returns it. A submission whose trimmed text is
    /// empty is silently ignored: no task, no persistence write, no error.
    pub fn add(
        &mut self,
        text: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Option<Task> {
        if text.trim().is_empty() {
            debug!("Ignoring task submission with blank text.");
            return None;
        }

        let task = Task {
            id: self.next_id,
            text,
            completed: false,
            created_at: Utc::now(),
            priority,
            due_date,
            extra: serde_json::Map::new(),
        };
        self.next_id += 1;

        self.tasks.push(task.clone());
        self.persist();

        info!("Task created with ID: {}", task.id);
        Some(task)
    }

    /// Flips the completion state of the task with the given id. An unknown
    /// id is a silent no-op.
    pub fn toggle(&mut self, id: i64) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                let completed = task.completed;
                self.persist();
                debug!("Toggled task {} to completed={}.", id, completed);
                true
            }
            None => {
                debug!("Toggle requested for unknown task ID: {}", id);
                false
            }
        }
    }

    /// Removes the task with the given id, keeping the relative order of the
    /// remaining tasks. An unknown id is a silent no-op.
    pub fn remove(&mut self, id: i64) -> bool {
        let len_before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);

        if self.tasks.len() == len_before {
            debug!("Delete requested for unknown task ID: {}", id);
            return false;
        }

        self.persist();
        info!("Task with ID {} deleted.", id);
        true
    }

    /// Replaces text, priority and due date of the task with the given id.
    /// `id`, `completed` and `created_at` are untouched. Blank trimmed text
    /// rejects the whole edit; an unknown id is a silent no-op (`Ok(false)`).
    pub fn edit(
        &mut self,
        id: i64,
        text: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<bool, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }

        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.text = text;
                task.priority = priority;
                task.due_date = due_date;
                self.persist();
                info!("Task with ID {} updated.", id);
                Ok(true)
            }
            None => {
                debug!("Edit requested for unknown task ID: {}", id);
                Ok(false)
            }
        }
    }

    /// Marks every task completed. Returns how many were still open.
    pub fn mark_all_completed(&mut self) -> usize {
        let newly_completed = self.tasks.iter().filter(|task| !task.completed).count();
        for task in &mut self.tasks {
            task.completed = true;
        }

        self.persist();
        info!("Marked {} tasks as completed.", newly_completed);
        newly_completed
    }

    /// Drops every completed task, keeping the relative order of the rest.
    /// Returns how many were removed.
    pub fn delete_all_completed(&mut self) -> usize {
        let len_before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = len_before - self.tasks.len();

        self.persist();
        info!("Deleted {} completed tasks.", removed);
        removed
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.tasks) {
            // Non-fatal: the in-memory collection stays authoritative for
            // the session even when the write-back fails.
            warn!("Failed to save the task collection: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn setup_test_manager() -> (TaskManager, TempDir) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir for manager test");
        let store = TaskStore::new(dir.path().join("tasks.json"));
        (TaskManager::new(store), dir)
    }

    fn due(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        Some(NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let (mut manager, _dir) = setup_test_manager();

        // Plenty of additions inside the same millisecond.
        for i in 0..100 {
            manager.add(format!("Task {}", i), Priority::Medium, None);
        }

        let ids: HashSet<i64> = manager.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_add_sets_creation_defaults() {
        let (mut manager, _dir) = setup_test_manager();

        let task = manager
            .add("Buy milk".to_string(), Priority::High, due(2024, 1, 1))
            .unwrap();

        assert!(!task.completed);
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, due(2024, 1, 1));
    }

    #[test]
    fn test_add_blank_text_is_a_silent_no_op() {
        let (mut manager, dir) = setup_test_manager();

        assert!(manager.add(String::new(), Priority::Medium, None).is_none());
        assert!(manager.add("   ".to_string(), Priority::Medium, None).is_none());

        // The collection is unchanged and no persistence write happened.
        assert!(manager.tasks().is_empty());
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn test_toggle_twice_restores_original_state() {
        let (mut manager, _dir) = setup_test_manager();
        let a = manager.add("A".to_string(), Priority::Medium, None).unwrap();
        let b = manager.add("B".to_string(), Priority::Medium, None).unwrap();

        manager.toggle(a.id);
        assert!(manager.tasks()[0].completed);

        manager.toggle(a.id);
        assert!(!manager.tasks()[0].completed);

        // The other task was never touched.
        assert!(!manager.tasks().iter().find(|t| t.id == b.id).unwrap().completed);
    }

    #[test]
    fn test_toggle_unknown_id_is_a_silent_no_op() {
        let (mut manager, _dir) = setup_test_manager();
        manager.add("A".to_string(), Priority::Medium, None);

        assert!(!manager.toggle(9999));
        assert!(!manager.tasks()[0].completed);
    }

    #[test]
    fn test_remove_deletes_exactly_one_and_keeps_order() {
        let (mut manager, _dir) = setup_test_manager();
        let a = manager.add("A".to_string(), Priority::Medium, None).unwrap();
        let b = manager.add("B".to_string(), Priority::Medium, None).unwrap();
        let c = manager.add("C".to_string(), Priority::Medium, None).unwrap();

        assert!(manager.remove(b.id));

        let remaining: Vec<i64> = manager.tasks().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![a.id, c.id]);
    }

    #[test]
    fn test_remove_unknown_id_is_a_silent_no_op() {
        let (mut manager, _dir) = setup_test_manager();
        manager.add("A".to_string(), Priority::Medium, None);

        assert!(!manager.remove(9999));
        assert_eq!(manager.tasks().len(), 1);
    }

    #[test]
    fn test_edit_replaces_fields_and_preserves_identity() {
        let (mut manager, _dir) = setup_test_manager();
        let task = manager
            .add("Original".to_string(), Priority::Medium, None)
            .unwrap();
        manager.toggle(task.id);

        let updated = manager
            .edit(task.id, "Edited".to_string(), Priority::High, due(2024, 6, 1))
            .unwrap();
        assert!(updated);

        let edited = &manager.tasks()[0];
        assert_eq!(edited.text, "Edited");
        assert_eq!(edited.priority, Priority::High);
        assert_eq!(edited.due_date, due(2024, 6, 1));
        // Identity and state survive the edit.
        assert_eq!(edited.id, task.id);
        assert!(edited.completed);
        assert_eq!(edited.created_at, task.created_at);
    }

    #[test]
    fn test_edit_blank_text_is_rejected() {
        let (mut manager, _dir) = setup_test_manager();
        let task = manager
            .add("Original".to_string(), Priority::Medium, None)
            .unwrap();

        let result = manager.edit(task.id, "  ".to_string(), Priority::Low, None);

        assert_eq!(result, Err(ValidationError::EmptyText));
        // The target task is unchanged.
        assert_eq!(manager.tasks()[0].text, "Original");
        assert_eq!(manager.tasks()[0].priority, Priority::Medium);
    }

    #[test]
    fn test_edit_unknown_id_is_a_silent_no_op() {
        let (mut manager, _dir) = setup_test_manager();
        manager.add("A".to_string(), Priority::Medium, None);

        let result = manager.edit(9999, "New text".to_string(), Priority::High, None);

        assert_eq!(result, Ok(false));
        assert_eq!(manager.tasks()[0].text, "A");
    }

    #[test]
    fn test_mark_all_completed() {
        let (mut manager, _dir) = setup_test_manager();
        let a = manager.add("A".to_string(), Priority::Medium, None).unwrap();
        manager.add("B".to_string(), Priority::Medium, None);
        manager.add("C".to_string(), Priority::Medium, None);
        manager.toggle(a.id); // one already completed

        let newly_completed = manager.mark_all_completed();

        assert_eq!(newly_completed, 2);
        assert!(manager.tasks().iter().all(|t| t.completed));
    }

    #[test]
    fn test_delete_all_completed_keeps_remainder_in_order() {
        let (mut manager, _dir) = setup_test_manager();
        let a = manager.add("A".to_string(), Priority::Medium, None).unwrap();
        let b = manager.add("B".to_string(), Priority::Medium, None).unwrap();
        let c = manager.add("C".to_string(), Priority::Medium, None).unwrap();
        let d = manager.add("D".to_string(), Priority::Medium, None).unwrap();
        manager.toggle(a.id);
        manager.toggle(c.id);

        let removed = manager.delete_all_completed();

        assert_eq!(removed, 2);
        let remaining: Vec<i64> = manager.tasks().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![b.id, d.id]);
        assert!(manager.tasks().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_mutations_are_written_through_to_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut manager = TaskManager::new(TaskStore::new(&path));
        let task = manager
            .add("Persisted".to_string(), Priority::Low, due(2024, 2, 2))
            .unwrap();
        manager.toggle(task.id);

        // A fresh manager over the same store sees the mutated state.
        let reloaded = TaskManager::new(TaskStore::new(&path));
        assert_eq!(reloaded.tasks().len(), 1);
        assert_eq!(reloaded.tasks()[0], manager.tasks()[0]);
        assert!(reloaded.tasks()[0].completed);
    }

    #[test]
    fn test_id_counter_continues_past_stored_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut manager = TaskManager::new(TaskStore::new(&path));
        let first = manager.add("A".to_string(), Priority::Medium, None).unwrap();

        let mut reloaded = TaskManager::new(TaskStore::new(&path));
        let second = reloaded.add("B".to_string(), Priority::Medium, None).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_corrupt_store_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "definitely not a task collection").unwrap();

        let mut manager = TaskManager::new(TaskStore::new(&path));

        assert!(manager.tasks().is_empty());
        // The manager is fully usable afterwards.
        let task = manager.add("Fresh start".to_string(), Priority::Medium, None);
        assert_eq!(task.unwrap().id, 1);
    }
}
