//! Graph API endpoint

use crate::FlowlogClient;
use crate::error::Result;
use flowlog_core::domain::graph::Graph;

impl FlowlogClient {
    /// Fetch a snapshot of the inferred service graph
    pub async fn graph(&self) -> Result<Graph> {
        let url = self.endpoint(&["graph"])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
