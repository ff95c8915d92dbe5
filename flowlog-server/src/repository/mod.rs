//! Repository Module
//!
//! Data access layer for the server.
//! Log entries live in an in-process store keyed by (service, run); cursors
//! are the opaque tokens that point back into it.

pub mod cursor;
pub mod log;

// Re-export for convenience
pub use log as log_repository;
pub use log::{LogStore, StoreError};
