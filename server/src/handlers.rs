// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use common::{CreateTaskPayload, Filter, SortKey, UpdateTaskPayload};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::manager::TaskManager;
use crate::projection::{self, ProjectedTask};

/// The collection manager shared across handlers. One lock, one writer at a
/// time: operations apply and persist strictly in the order they arrive.
pub type SharedManager = Arc<RwLock<TaskManager>>;

/// Query parameters of the list endpoint. Both are optional and default to
/// the full collection in creation order.
#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub sort: SortKey,
}

/// Handler for listing the projected task list.
pub async fn list_tasks(
    State(manager): State<SharedManager>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<ProjectedTask>> {
    let manager = manager.read();
    let today = Utc::now().date_naive();
    let tasks = projection::project(manager.tasks(), query.filter, query.sort, today);

    info!("Successfully retrieved {} tasks.", tasks.len());
    Json(tasks)
}

/// Handler for creating a new task.
///
/// A submission with blank text is not an error: the collection ignores it,
/// and the handler answers 204 with no body. Everything else is 201 plus the
/// created task.
pub async fn create_task(
    State(manager): State<SharedManager>,
    Json(payload): Json<CreateTaskPayload>,
) -> Response {
    debug!("Received request to create task: {:?}", payload);

    let created = manager
        .write()
        .add(payload.text, payload.priority, payload.due_date);

    match created {
        Some(task) => (StatusCode::CREATED, Json(task)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Handler for flipping a task's completion state. An unknown ID is a
/// no-op, never an error.
pub async fn toggle_task(
    State(manager): State<SharedManager>,
    Path(task_id): Path<i64>,
) -> StatusCode {
    debug!("Received request to toggle task with ID: {}", task_id);

    manager.write().toggle(task_id);
    StatusCode::NO_CONTENT
}

/// Handler for editing a task's text, priority and due date. The only
/// rejection is blank text; an unknown ID is a no-op.
pub async fn update_task(
    State(manager): State<SharedManager>,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<StatusCode, AppError> {
    debug!("Received request to update task with ID: {}", task_id);

    match manager
        .write()
        .edit(task_id, payload.text, payload.priority, payload.due_date)
    {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Validation failed for task {}: {}", task_id, e);
            Err(AppError::new(
                StatusCode::BAD_REQUEST,
                "Task text cannot be empty.",
            ))
        }
    }
}

/// Handler for deleting a task by ID. An unknown ID is a no-op, so this
/// always answers 204.
pub async fn delete_task(
    State(manager): State<SharedManager>,
    Path(task_id): Path<i64>,
) -> StatusCode {
    debug!("Received request to delete task with ID: {}", task_id);

    manager.write().remove(task_id);
    StatusCode::NO_CONTENT
}

/// Handler for marking every task in the collection as completed.
pub async fn complete_all_tasks(State(manager): State<SharedManager>) -> Json<serde_json::Value> {
    debug!("Received request to mark all tasks as completed.");

    let num_completed = manager.write().mark_all_completed();

    Json(serde_json::json!({
        "message": format!("Successfully marked {} tasks as completed.", num_completed),
        "tasks_completed": num_completed
    }))
}

/// Handler for deleting every completed task.
pub async fn delete_completed_tasks(
    State(manager): State<SharedManager>,
) -> Json<serde_json::Value> {
    debug!("Received request to delete all completed tasks.");

    let num_deleted = manager.write().delete_all_completed();

    Json(serde_json::json!({
        "message": format!("Successfully deleted {} completed tasks.", num_deleted),
        "tasks_deleted": num_deleted
    }))
}

// --- Custom Error Handling ---
// This is a good practice for transforming our internal errors
// into appropriate HTTP responses.

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (
            self.code,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use common::Priority;
    use tempfile::TempDir;

    fn setup_test_state() -> (SharedManager, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        (Arc::new(RwLock::new(TaskManager::new(store))), dir)
    }

    #[tokio::test]
    async fn test_update_task_validation_empty_text() {
        // Arrange
        let (manager, _dir) = setup_test_state();
        let created = manager
            .write()
            .add("Valid task".to_string(), Priority::Medium, None)
            .unwrap();
        let payload = Json(UpdateTaskPayload {
            text: "   ".to_string(),
            priority: Priority::High,
            due_date: None,
        });

        // Act
        let result = update_task(State(manager.clone()), Path(created.id), payload).await;

        // Assert
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Task text cannot be empty.");
        assert_eq!(manager.read().tasks()[0].text, "Valid task");
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_a_no_op() {
        // Arrange
        let (manager, _dir) = setup_test_state();
        let payload = Json(UpdateTaskPayload {
            text: "New text".to_string(),
            priority: Priority::Medium,
            due_date: None,
        });

        // Act
        let result = update_task(State(manager), Path(9999), payload).await;

        // Assert: not-found never escalates to an error.
        assert_eq!(result.unwrap(), StatusCode::NO_CONTENT);
    }
}
