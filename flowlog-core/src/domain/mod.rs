//! Core domain types
//!
//! These types describe what the server stores and returns. They are shared
//! between the server (which owns them) and the client (which reads them back).

pub mod graph;
pub mod log;
pub mod page;
