//! Application builder: wires router, middleware, and state into an Axum app
//! and serves it.

use axum::Router;
use tracing::{error, info};

use quizhub_core::config::AppConfig;
use quizhub_core::error::AppError;
use quizhub_database::connect_store;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the QuizHub server with the given configuration until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(backend = %config.database.backend, "Starting QuizHub server");

    let store = connect_store(&config.database).await?;
    let addr = config.server.bind_address();
    let app = build_app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "QuizHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("QuizHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
