//! Flowlog Core
//!
//! Core types and abstractions shared by the Flowlog server, client and CLI.
//!
//! This crate contains:
//! - Domain types: log entries, pages and the service graph
//! - DTOs: request shapes exchanged over HTTP
//! - Validation: strict decoding of inbound log payloads

pub mod domain;
pub mod dto;
pub mod validate;

pub use validate::{ValidationError, validate_batch, validate_single};
