//! # quizhub-api
//!
//! HTTP API layer for QuizHub built on Axum.
//!
//! Provides the REST endpoints, middleware (request logging, CORS,
//! compression), extractors, DTOs, and error mapping. The caller's identity
//! is taken from the `X-User-Id` header set by the upstream gateway.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
