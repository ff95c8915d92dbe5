//! Data Transfer Objects
//!
//! Request shapes exchanged between clients and the server. Write payloads
//! never carry `serviceID`/`runID`; those come from the request path.

pub mod log;
pub mod query;
