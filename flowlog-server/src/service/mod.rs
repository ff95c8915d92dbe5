//! Service Module
//!
//! Business logic layer for the server.
//! The ingestion service orchestrates validation, the log repository and the
//! graph builder.

pub mod graph;
pub mod ingestion;

// Re-export for convenience
pub use graph::GraphBuilder;
pub use ingestion as ingestion_service;
pub use ingestion::{Created, IngestError, IngestionService};
