//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod graph;
pub mod health;
pub mod log;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::service::IngestionService;

/// Shared handler state
pub type AppState = Arc<IngestionService>;

/// Create the main API router with all endpoints
///
/// Builds a fresh [`IngestionService`] from `config`; request bodies larger
/// than `config.max_body_bytes` are refused before they reach a handler.
pub fn create_router(config: &Config) -> Router {
    let service: AppState = Arc::new(IngestionService::new(config));

    Router::new()
        // Liveness
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        // Log endpoints
        .route("/log/{service_id}/{run_id}", post(log::post_log))
        .route(
            "/logs/{service_id}/{run_id}",
            get(log::list_run_logs).post(log::post_logs),
        )
        .route("/logs/{service_id}", get(log::list_service_logs))
        // Graph endpoints
        .route("/graph", get(graph::get_graph))
        // Add state and middleware
        .with_state(service)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
