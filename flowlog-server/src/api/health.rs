//! Health Check API Handler
//!
//! Simple liveness endpoint for monitoring.

use axum::{http::StatusCode, response::IntoResponse};

/// GET / and GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
