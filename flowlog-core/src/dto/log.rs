//! Log write payloads

use serde::{Deserialize, Serialize};

use crate::domain::log::{Direction, LogEntry};

/// Body of a single-entry write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub timestamp: u64,
    pub direction: Direction,
    pub storage: String,
}

/// Body of a batch write
///
/// Expands to one [`LogEntry`] per user ID, all sharing the timestamp,
/// direction and storage of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogBatch {
    #[serde(rename = "userIDs")]
    pub user_ids: Vec<String>,
    pub timestamp: u64,
    pub direction: Direction,
    pub storage: String,
}

/// A validated write, one of the two accepted shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogInput {
    Single(LogRecord),
    Batch(LogBatch),
}

impl LogRecord {
    pub fn into_entry(self, service_id: &str, run_id: &str) -> LogEntry {
        LogEntry {
            service_id: service_id.to_string(),
            run_id: run_id.to_string(),
            user_id: self.user_id,
            timestamp: self.timestamp,
            direction: self.direction,
            storage: self.storage,
        }
    }
}

impl LogBatch {
    pub fn expand(self, service_id: &str, run_id: &str) -> Vec<LogEntry> {
        let LogBatch {
            user_ids,
            timestamp,
            direction,
            storage,
        } = self;

        user_ids
            .into_iter()
            .map(|user_id| LogEntry {
                service_id: service_id.to_string(),
                run_id: run_id.to_string(),
                user_id,
                timestamp,
                direction,
                storage: storage.clone(),
            })
            .collect()
    }
}

impl LogInput {
    /// Timestamp, direction and storage common to every entry of this input
    pub fn shared(&self) -> (u64, Direction, &str) {
        match self {
            LogInput::Single(record) => (record.timestamp, record.direction, &record.storage),
            LogInput::Batch(batch) => (batch.timestamp, batch.direction, &batch.storage),
        }
    }

    pub fn into_entries(self, service_id: &str, run_id: &str) -> Vec<LogEntry> {
        match self {
            LogInput::Single(record) => vec![record.into_entry(service_id, run_id)],
            LogInput::Batch(batch) => batch.expand(service_id, run_id),
        }
    }
}
