//! Graph API Handler

use axum::{Json, extract::State};
use flowlog_core::domain::graph::Graph;

use crate::api::AppState;

/// GET /graph
/// Snapshot of the inferred service graph
pub async fn get_graph(State(service): State<AppState>) -> Json<Graph> {
    let graph = service.graph_snapshot();

    tracing::debug!(
        "Serving graph with {} node(s) and {} edge(s)",
        graph.nodes.len(),
        graph.edges.len()
    );

    Json(graph)
}
