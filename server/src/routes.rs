// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers::{self, SharedManager};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

/// Creates and configures the application router.
pub fn create_router(manager: SharedManager) -> Router {
    Router::new()
        // Associates the `GET /api/tasks` route with the `list_tasks` handler
        .route("/api/tasks", get(handlers::list_tasks))
        // Associates the `POST /api/tasks` route with the `create_task` handler
        .route("/api/tasks", post(handlers::create_task))
        // Bulk routes come before the `{id}` routes so the literal segments
        // are not captured as task IDs.
        .route("/api/tasks/complete-all", patch(handlers::complete_all_tasks))
        .route("/api/tasks/completed", delete(handlers::delete_completed_tasks))
        // Associates the `PUT /api/tasks/{id}` route with the `update_task` handler
        .route("/api/tasks/{id}", put(handlers::update_task))
        // Associates the `DELETE /api/tasks/{id}` route with the `delete_task` handler
        .route("/api/tasks/{id}", delete(handlers::delete_task))
        // Associates the `PATCH /api/tasks/{id}/toggle` route with the `toggle_task` handler
        .route("/api/tasks/{id}/toggle", patch(handlers::toggle_task))
        // Adds the shared collection manager to the application state
        .with_state(manager)
}
