//! Log-related API endpoints

use crate::FlowlogClient;
use crate::error::Result;
use flowlog_core::domain::log::LogEntry;
use flowlog_core::domain::page::Page;
use flowlog_core::dto::log::{LogBatch, LogRecord};
use flowlog_core::dto::query::ListQuery;

impl FlowlogClient {
    // =============================================================================
    // Log Writes
    // =============================================================================

    /// Store a single log entry for a run
    ///
    /// # Arguments
    /// * `service_id` - The emitting service
    /// * `run_id` - The run of that service
    /// * `record` - The entry body
    pub async fn post_log(&self, service_id: &str, run_id: &str, record: &LogRecord) -> Result<()> {
        let url = self.endpoint(&["log", service_id, run_id])?;
        let response = self.client.post(url).json(record).send().await?;

        self.handle_empty_response(response).await
    }

    /// Store a batch of log entries, one per user ID
    ///
    /// The server rejects the whole batch if any part of it is invalid.
    pub async fn post_batch(&self, service_id: &str, run_id: &str, batch: &LogBatch) -> Result<()> {
        let url = self.endpoint(&["logs", service_id, run_id])?;
        let response = self.client.post(url).json(batch).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Log Reads
    // =============================================================================

    /// Fetch one page of a run's entries
    pub async fn list_run(
        &self,
        service_id: &str,
        run_id: &str,
        query: &ListQuery,
    ) -> Result<Page<LogEntry>> {
        let url = self.endpoint(&["logs", service_id, run_id])?;
        let response = self.client.get(url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Fetch one page of a service's entries across all its runs
    pub async fn list_service(&self, service_id: &str, query: &ListQuery) -> Result<Page<LogEntry>> {
        let url = self.endpoint(&["logs", service_id])?;
        let response = self.client.get(url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Fetch every entry of a run, following `nextPage` until exhausted
    pub async fn list_run_all(&self, service_id: &str, run_id: &str) -> Result<Vec<LogEntry>> {
        let mut query = ListQuery::default();
        let mut entries = Vec::new();

        loop {
            let page = self.list_run(service_id, run_id, &query).await?;
            let last = page.is_last();
            entries.extend(page.payload);
            if last {
                break;
            }
            query.cursor = page.next_page;
        }

        tracing::debug!(
            "Fetched {} entries for {}/{}",
            entries.len(),
            service_id,
            run_id
        );

        Ok(entries)
    }

    /// Fetch every entry of a service, following `nextPage` until exhausted
    pub async fn list_service_all(&self, service_id: &str) -> Result<Vec<LogEntry>> {
        let mut query = ListQuery::default();
        let mut entries = Vec::new();

        loop {
            let page = self.list_service(service_id, &query).await?;
            let last = page.is_last();
            entries.extend(page.payload);
            if last {
                break;
            }
            query.cursor = page.next_page;
        }

        Ok(entries)
    }
}
