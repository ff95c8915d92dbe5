//! Log API Handlers
//!
//! HTTP endpoints for writing and listing log entries.
//!
//! Write bodies are taken as raw bytes so that every malformed payload,
//! including invalid JSON or a missing content type, is reported as 400.
//! Body and query string rejections go through `ApiError` as well, so every
//! error carries an `{"error": ...}` body.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::StatusCode,
};
use flowlog_core::domain::log::LogEntry;
use flowlog_core::domain::page::Page;
use flowlog_core::dto::query::ListQuery;
use flowlog_core::validate::parse_json;

use crate::api::AppState;
use crate::api::error::ApiResult;

// =============================================================================
// Write Endpoints
// =============================================================================

/// POST /log/{service_id}/{run_id}
/// Store a single log entry
pub async fn post_log(
    State(service): State<AppState>,
    Path((service_id, run_id)): Path<(String, String)>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<StatusCode> {
    tracing::debug!("Posting log entry for {}/{}", service_id, run_id);

    let payload = parse_json(&body?)?;
    service.ingest_one(&service_id, &run_id, &payload)?;

    Ok(StatusCode::CREATED)
}

/// POST /logs/{service_id}/{run_id}
/// Store a batch of log entries, one per userID
pub async fn post_logs(
    State(service): State<AppState>,
    Path((service_id, run_id)): Path<(String, String)>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<StatusCode> {
    tracing::debug!("Posting log batch for {}/{}", service_id, run_id);

    let payload = parse_json(&body?)?;
    service.ingest_batch(&service_id, &run_id, &payload)?;

    Ok(StatusCode::CREATED)
}

// =============================================================================
// Read Endpoints
// =============================================================================

/// GET /logs/{service_id}/{run_id}
/// List entries of one run
pub async fn list_run_logs(
    State(service): State<AppState>,
    Path((service_id, run_id)): Path<(String, String)>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<LogEntry>>> {
    tracing::debug!("Listing logs for {}/{}", service_id, run_id);

    let Query(query) = query?;

    let page = service.list_run(&service_id, &run_id, query.cursor.as_deref(), query.limit)?;

    Ok(Json(page))
}

/// GET /logs/{service_id}
/// List entries across every run of a service
pub async fn list_service_logs(
    State(service): State<AppState>,
    Path(service_id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<LogEntry>>> {
    tracing::debug!("Listing logs for service {}", service_id);

    let Query(query) = query?;

    let page = service.list_service(&service_id, query.cursor.as_deref(), query.limit)?;

    Ok(Json(page))
}
