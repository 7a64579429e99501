// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::NaiveDate;
use common::{Filter, SortKey, Task};
use serde::Serialize;

/// A task as it appears in the displayed list: the record itself plus the
/// derived overdue flag. The flag is never persisted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedTask {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
}

/// Derives the display list from the canonical collection. Pure: the input
/// sequence is never mutated, and the result is recomputed on every read.
///
/// `today` is passed in rather than read from the clock so the overdue rule
/// is deterministic under test.
pub fn project(
    tasks: &[Task],
    filter: Filter,
    sort_key: SortKey,
    today: NaiveDate,
) -> Vec<ProjectedTask> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| match filter {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        })
        .collect();

    // All three sorts are stable: ties keep their collection order.
    match sort_key {
        // Most recently created first.
        SortKey::CreatedAt => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Priority => visible.sort_by(|a, b| a.priority.cmp(&b.priority)),
        // `None` sorts before every date, so tasks without a due date come
        // first. This mirrors the historical empty-string comparison and is
        // intentional, however surprising it looks.
        SortKey::DueDate => visible.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
    }

    visible
        .into_iter()
        .map(|task| ProjectedTask {
            is_overdue: task.is_overdue(today),
            task: task.clone(),
        })
        .collect()
}
