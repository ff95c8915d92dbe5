//! Flowlog Server
//!
//! HTTP service that ingests per-service, per-run log traffic, serves it back
//! page by page and maintains the service graph inferred from it.
//!
//! Layers:
//! - `api`: axum handlers and error mapping
//! - `service`: ingestion pipeline and graph builder
//! - `repository`: in-process log store and pagination cursors
//! - `config`: environment-driven settings

pub mod api;
pub mod config;
pub mod repository;
pub mod service;

pub use api::create_router;
pub use config::Config;
pub use service::IngestionService;
