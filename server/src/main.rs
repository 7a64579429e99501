// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderName;
use parking_lot::RwLock;
use tower_http::cors::{Any, CorsLayer};

use server::manager::TaskManager;
use server::routes;
use server::store::TaskStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting up the server...");

    // The manager falls back to an empty collection on a corrupt or
    // unreadable file, so startup itself cannot fail here.
    let store = TaskStore::new(TaskStore::default_path());
    let manager = Arc::new(RwLock::new(TaskManager::new(store)));
    tracing::info!(
        "Task collection loaded with {} tasks.",
        manager.read().tasks().len()
    );

    let app_routes = routes::create_router(manager);

    // Configure CORS here, applying it globally to the router
    let cors = CorsLayer::new()
        .allow_methods(Any) // Allow all HTTP methods
        // Explicit list of headers the frontend may send. Without token
        // authentication, 'authorization' is not needed.
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .allow_origin(Any); // Allow all origins

    let app = app_routes.layer(cors); // Apply the CORS layer

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("The server listens on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind the listen address")?;
    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
