//! Flowlog HTTP Client
//!
//! A simple, type-safe HTTP client for the Flowlog server API.
//!
//! # Example
//!
//! ```no_run
//! use flowlog_client::FlowlogClient;
//! use flowlog_core::domain::log::Direction;
//! use flowlog_core::dto::log::LogRecord;
//!
//! # async fn example() -> flowlog_client::Result<()> {
//! let client = FlowlogClient::new("http://localhost:3000");
//!
//! client
//!     .post_log(
//!         "checkout",
//!         "run-42",
//!         &LogRecord {
//!             user_id: "user-1".to_string(),
//!             timestamp: 1_700_000_000_000,
//!             direction: Direction::Out,
//!             storage: "orders-queue".to_string(),
//!         },
//!     )
//!     .await?;
//!
//! let page = client.list_run("checkout", "run-42", &Default::default()).await?;
//! println!("{} entries", page.payload.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod graph;
mod logs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the Flowlog server API
///
/// Endpoints are grouped as:
/// - Log writes (single entry, batch)
/// - Log reads (per run, per service, single page or all pages)
/// - Graph snapshot and liveness
#[derive(Debug, Clone)]
pub struct FlowlogClient {
    /// Base URL of the server (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl FlowlogClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use flowlog_client::FlowlogClient;
    ///
    /// let client = FlowlogClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint(&[])?;
        let response = self.client.get(url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Build an endpoint URL from path segments
    ///
    /// Segments are percent-encoded, so identifiers containing `/` or spaces
    /// stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid base URL: {}", e)))?;

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!("Invalid base URL: {}", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that carries no body we need
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
