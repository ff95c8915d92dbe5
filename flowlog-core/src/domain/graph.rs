//! Service dependency graph types
//!
//! A graph snapshot is an immutable value: nodes are the services seen in
//! log traffic, edges point from a service that wrote to a storage to a
//! service that read from the same storage.

use serde::{Deserialize, Serialize};

/// A snapshot of the inferred service graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// A service that appeared in at least one accepted log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// The service identifier
    pub id: String,

    /// Number of log entries observed for this service
    pub observations: u64,

    /// Latest entry timestamp observed for this service (ms since epoch)
    pub last_seen: u64,
}

/// An inferred writer → reader relationship between two services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Service that wrote (`out`) to a shared storage
    pub from: String,

    /// Service that read (`in`) from the same storage
    pub to: String,

    /// Number of matched (out, in) observation pairs
    pub count: u64,

    /// Latest timestamp across all matched pairs (ms since epoch)
    pub last_seen: u64,

    /// Storage keys through which the two services communicate, sorted
    pub storages: Vec<String>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }
}
