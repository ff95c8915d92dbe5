//! Ingestion Service
//!
//! Composition root for log writes and reads. Every write runs
//! validate → store append → graph observe; a payload that fails validation
//! touches neither the store nor the graph.

use flowlog_core::domain::graph::Graph;
use flowlog_core::domain::log::LogEntry;
use flowlog_core::domain::page::Page;
use flowlog_core::dto::log::LogInput;
use flowlog_core::validate::{self, ValidationError};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::repository::cursor::{RunCursor, ServiceCursor};
use crate::repository::{LogStore, StoreError};
use crate::service::graph::{GraphBuilder, Observation};

/// Service error type
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// Outcome of an accepted write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created {
    /// Number of log entries stored
    pub entries: usize,
}

/// Validates, stores and indexes log traffic
pub struct IngestionService {
    store: LogStore,
    graph: GraphBuilder,
    default_page_size: usize,
    max_page_size: usize,
    max_batch_size: usize,
}

impl IngestionService {
    pub fn new(config: &Config) -> Self {
        Self {
            store: LogStore::with_capacity(config.max_entries),
            graph: GraphBuilder::new(),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
            max_batch_size: config.max_batch_size,
        }
    }

    /// Accept one `{userID, timestamp, direction, storage}` payload
    pub fn ingest_one(&self, service_id: &str, run_id: &str, payload: &Value) -> Result<Created> {
        validate::validate_ids(service_id, run_id)?;
        let record = validate::validate_single(payload)?;

        self.ingest(service_id, run_id, LogInput::Single(record))
    }

    /// Accept one `{userIDs, timestamp, direction, storage}` payload
    ///
    /// The batch is stored as one unit; if any part is invalid nothing is.
    pub fn ingest_batch(
        &self,
        service_id: &str,
        run_id: &str,
        payload: &Value,
    ) -> Result<Created> {
        validate::validate_ids(service_id, run_id)?;
        let batch = validate::validate_batch(payload)?;

        if batch.user_ids.len() > self.max_batch_size {
            return Err(ValidationError::BatchTooLarge {
                size: batch.user_ids.len(),
                max: self.max_batch_size,
            }
            .into());
        }

        self.ingest(service_id, run_id, LogInput::Batch(batch))
    }

    /// Entries of one run
    pub fn list_run(
        &self,
        service_id: &str,
        run_id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<LogEntry>> {
        let limit = self.page_size(limit)?;
        let cursor = cursor.map(RunCursor::decode).transpose()?;

        Ok(self.store.query(service_id, run_id, cursor, limit))
    }

    /// Entries of every run of a service
    pub fn list_service(
        &self,
        service_id: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<LogEntry>> {
        let limit = self.page_size(limit)?;
        let cursor = cursor.map(ServiceCursor::decode).transpose()?;

        Ok(self.store.query_by_service(service_id, cursor, limit))
    }

    pub fn graph_snapshot(&self) -> Graph {
        self.graph.snapshot()
    }

    fn ingest(&self, service_id: &str, run_id: &str, input: LogInput) -> Result<Created> {
        let (timestamp, direction, storage) = input.shared();
        let storage = storage.to_string();

        let entries = input.into_entries(service_id, run_id);
        let count = entries.len();

        self.store.append_batch(service_id, run_id, entries)?;

        // Every entry of one write differs only in userID, which the graph ignores.
        let observation = Observation {
            service_id,
            direction,
            storage: &storage,
            timestamp,
        };
        for _ in 0..count {
            self.graph.observe(observation);
        }

        tracing::info!(
            service_id = service_id,
            run_id = run_id,
            entries = count,
            "Log entries accepted"
        );

        Ok(Created { entries: count })
    }

    fn page_size(&self, limit: Option<usize>) -> std::result::Result<usize, ValidationError> {
        match limit {
            None => Ok(self.default_page_size),
            Some(0) => Err(ValidationError::InvalidLimit),
            Some(n) => Ok(n.min(self.max_page_size)),
        }
    }
}

impl Default for IngestionService {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlog_core::domain::log::Direction;
    use serde_json::json;

    fn log(user: &str, direction: &str, storage: &str) -> Value {
        json!({
            "userID": user,
            "timestamp": 1000,
            "direction": direction,
            "storage": storage,
        })
    }

    fn batch(users: &[&str]) -> Value {
        json!({
            "userIDs": users,
            "timestamp": 2000,
            "direction": "out",
            "storage": "s1",
        })
    }

    #[test]
    fn test_ingest_one_then_list_run() {
        let service = IngestionService::default();
        let created = service
            .ingest_one("svcA", "run1", &log("u1", "in", "s1"))
            .unwrap();
        assert_eq!(created.entries, 1);

        let page = service.list_run("svcA", "run1", None, None).unwrap();
        assert_eq!(
            page.payload,
            vec![LogEntry {
                service_id: "svcA".to_string(),
                run_id: "run1".to_string(),
                user_id: "u1".to_string(),
                timestamp: 1000,
                direction: Direction::In,
                storage: "s1".to_string(),
            }]
        );
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_ingest_batch_expands_entries() {
        let service = IngestionService::default();
        let users: Vec<String> = (0..10).map(|i| format!("user-{}", i)).collect();
        let user_refs: Vec<&str> = users.iter().map(String::as_str).collect();

        let created = service
            .ingest_batch("svc", "run", &batch(&user_refs))
            .unwrap();
        assert_eq!(created.entries, 10);

        let page = service.list_run("svc", "run", None, None).unwrap();
        let mut got: Vec<String> = page.payload.iter().map(|e| e.user_id.clone()).collect();
        got.sort();
        let mut expected = users.clone();
        expected.sort();
        assert_eq!(got, expected);
        assert!(page.payload.iter().all(|e| e.timestamp == 2000
            && e.direction == Direction::Out
            && e.storage == "s1"
            && e.service_id == "svc"
            && e.run_id == "run"));
    }

    #[test]
    fn test_invalid_batch_leaves_no_trace() {
        let service = IngestionService::default();
        let mut payload = batch(&["u1", "u2", "u3"]);
        payload["userIDs"][2] = json!({ "something": "invalid" });

        let result = service.ingest_batch("svc", "run", &payload);
        assert!(matches!(result, Err(IngestError::Validation(_))));

        assert!(service.list_run("svc", "run", None, None).unwrap().payload.is_empty());
        assert!(service.graph_snapshot().nodes.is_empty());
        assert_eq!(service.store.len(), 0);
    }

    #[test]
    fn test_invalid_single_rejected() {
        let service = IngestionService::default();
        let result = service.ingest_one("svc", "run", &json!({}));
        assert!(matches!(result, Err(IngestError::Validation(_))));
    }

    #[test]
    fn test_batch_size_limit() {
        let mut config = Config::default();
        config.max_batch_size = 2;
        let service = IngestionService::new(&config);

        let result = service.ingest_batch("svc", "run", &batch(&["a", "b", "c"]));
        assert!(matches!(
            result,
            Err(IngestError::Validation(ValidationError::BatchTooLarge {
                size: 3,
                max: 2
            }))
        ));
        assert!(service.ingest_batch("svc", "run", &batch(&["a", "b"])).is_ok());
    }

    #[test]
    fn test_capacity_exhaustion_is_a_store_error() {
        let service = IngestionService::new(&Config::default().with_max_entries(2));
        service.ingest_batch("svc", "run", &batch(&["a", "b"])).unwrap();

        let result = service.ingest_one("svc", "run", &log("c", "in", "s1"));
        assert!(matches!(result, Err(IngestError::Store(_))));
        // The rejected write is not observed by the graph either
        assert_eq!(service.graph_snapshot().node("svc").unwrap().observations, 2);
    }

    #[test]
    fn test_list_unknown_keys_are_empty() {
        let service = IngestionService::default();
        assert_eq!(
            service.list_run("nope", "run", None, None).unwrap(),
            Page::empty()
        );
        assert_eq!(
            service.list_service("nope", None, None).unwrap(),
            Page::empty()
        );
    }

    #[test]
    fn test_list_service_unions_runs() {
        let service = IngestionService::default();
        service.ingest_batch("svc", "run1", &batch(&["a", "b"])).unwrap();
        service
            .ingest_batch("svc", "run2", &batch(&["c", "d", "e", "f"]))
            .unwrap();

        let page = service.list_service("svc", None, None).unwrap();
        assert_eq!(page.payload.len(), 6);
        assert!(page.next_page.is_none());
        assert_eq!(
            page.payload.iter().filter(|e| e.run_id == "run1").count(),
            2
        );
    }

    #[test]
    fn test_limit_validation_and_clamping() {
        let mut config = Config::default();
        config.default_page_size = 2;
        config.max_page_size = 3;
        let service = IngestionService::new(&config);
        service
            .ingest_batch("svc", "run", &batch(&["a", "b", "c", "d", "e"]))
            .unwrap();

        let page = service.list_run("svc", "run", None, None).unwrap();
        assert_eq!(page.payload.len(), 2);

        let page = service.list_run("svc", "run", None, Some(50)).unwrap();
        assert_eq!(page.payload.len(), 3);
        assert!(page.next_page.is_some());

        let result = service.list_run("svc", "run", None, Some(0));
        assert!(matches!(
            result,
            Err(IngestError::Validation(ValidationError::InvalidLimit))
        ));
    }

    #[test]
    fn test_cursor_walks_all_pages() {
        let service = IngestionService::default();
        let users: Vec<String> = (0..25).map(|i| format!("u{:02}", i)).collect();
        let user_refs: Vec<&str> = users.iter().map(String::as_str).collect();
        service.ingest_batch("svc", "run", &batch(&user_refs)).unwrap();

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = service
                .list_run("svc", "run", cursor.as_deref(), Some(10))
                .unwrap();
            seen.extend(page.payload.into_iter().map(|e| e.user_id));
            match page.next_page {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(seen, users);
    }

    #[test]
    fn test_bad_cursor_rejected() {
        let service = IngestionService::default();
        let result = service.list_run("svc", "run", Some("garbage!"), None);
        assert!(matches!(
            result,
            Err(IngestError::Validation(ValidationError::InvalidCursor))
        ));

        // A service cursor is not a run cursor
        service
            .ingest_batch("svc", "run", &batch(&["a", "b", "c"]))
            .unwrap();
        let page = service.list_service("svc", None, Some(1)).unwrap();
        let token = page.next_page.unwrap();
        assert!(service.list_run("svc", "run", Some(&token), None).is_err());
    }

    #[test]
    fn test_graph_built_from_ingested_traffic() {
        let service = IngestionService::default();
        service
            .ingest_one("serviceA", "run", &log("u", "out", "shared"))
            .unwrap();
        service
            .ingest_one("serviceB", "run", &log("u", "in", "shared"))
            .unwrap();

        let graph = service.graph_snapshot();
        assert!(graph.edge("serviceA", "serviceB").is_some());
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn test_batch_observed_once_per_entry() {
        let service = IngestionService::default();
        service
            .ingest_one("reader", "run", &log("u", "in", "s1"))
            .unwrap();
        service
            .ingest_batch("writer", "run", &batch(&["a", "b", "c"]))
            .unwrap();

        let graph = service.graph_snapshot();
        assert_eq!(graph.edge("writer", "reader").unwrap().count, 3);
        assert_eq!(graph.node("writer").unwrap().observations, 3);
    }
}
