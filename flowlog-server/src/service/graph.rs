//! Graph Builder
//!
//! Infers a service dependency graph from accepted log entries. An `out`
//! entry from service A and an `in` entry from service B on the same storage
//! mean A wrote something B read, which yields an edge A → B.
//!
//! For each storage key the builder keeps, per service and direction, how
//! many entries it has seen and the latest timestamp. A new observation is
//! matched against the opposite-direction aggregates of its storage key:
//! the edge count grows by the number of new (out, in) pairs and last-seen
//! takes the max. Both updates commute, so the final graph does not depend
//! on the order entries arrive in.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use flowlog_core::domain::graph::{Graph, GraphEdge, GraphNode};
use flowlog_core::domain::log::{Direction, LogEntry};
use parking_lot::Mutex;

/// Incrementally maintained service graph
#[derive(Default)]
pub struct GraphBuilder {
    storages: DashMap<String, Arc<Mutex<StorageIndex>>>,
    nodes: DashMap<String, Presence>,
    edges: DashMap<(String, String), EdgeStats>,
}

/// Observations recorded against one storage key
#[derive(Default)]
struct StorageIndex {
    writers: HashMap<String, Presence>,
    readers: HashMap<String, Presence>,
}

/// The parts of a log entry the graph cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation<'a> {
    pub service_id: &'a str,
    pub direction: Direction,
    pub storage: &'a str,
    pub timestamp: u64,
}

impl<'a> From<&'a LogEntry> for Observation<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            service_id: &entry.service_id,
            direction: entry.direction,
            storage: &entry.storage,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Presence {
    count: u64,
    last_seen: u64,
}

#[derive(Default)]
struct EdgeStats {
    count: u64,
    last_seen: u64,
    storages: BTreeSet<String>,
}

impl Presence {
    fn record(&mut self, timestamp: u64) {
        self.count += 1;
        self.last_seen = self.last_seen.max(timestamp);
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one accepted entry into the graph
    pub fn observe<'a>(&self, entry: impl Into<Observation<'a>>) {
        let entry = entry.into();

        self.nodes
            .entry(entry.service_id.to_string())
            .or_default()
            .record(entry.timestamp);

        let index = Arc::clone(
            self.storages
                .entry(entry.storage.to_string())
                .or_default()
                .value(),
        );

        // Matching and recording happen under the storage lock so two
        // opposite observations on the same key always see each other
        // exactly once.
        let mut index = index.lock();
        let StorageIndex { writers, readers } = &mut *index;
        let (own, opposite) = match entry.direction {
            Direction::Out => (writers, &*readers),
            Direction::In => (readers, &*writers),
        };

        for (peer, presence) in opposite {
            if *peer == entry.service_id {
                continue;
            }

            let (from, to) = match entry.direction {
                Direction::Out => (entry.service_id, peer.as_str()),
                Direction::In => (peer.as_str(), entry.service_id),
            };

            let mut edge = self
                .edges
                .entry((from.to_string(), to.to_string()))
                .or_default();
            edge.count += presence.count;
            edge.last_seen = edge.last_seen.max(presence.last_seen.max(entry.timestamp));
            if !edge.storages.contains(entry.storage) {
                edge.storages.insert(entry.storage.to_string());
            }

            tracing::trace!(
                from = from,
                to = to,
                storage = %entry.storage,
                count = edge.count,
                "Edge updated"
            );
        }

        own.entry(entry.service_id.to_string())
            .or_default()
            .record(entry.timestamp);
    }

    /// Immutable view of the graph, nodes and edges sorted by identifier
    pub fn snapshot(&self) -> Graph {
        let mut nodes: Vec<GraphNode> = self
            .nodes
            .iter()
            .map(|n| GraphNode {
                id: n.key().clone(),
                observations: n.count,
                last_seen: n.last_seen,
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<GraphEdge> = self
            .edges
            .iter()
            .map(|e| {
                let (from, to) = e.key();
                GraphEdge {
                    from: from.clone(),
                    to: to.clone(),
                    count: e.count,
                    last_seen: e.last_seen,
                    storages: e.storages.iter().cloned().collect(),
                }
            })
            .collect();
        edges.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));

        Graph { nodes, edges }
    }

    /// Number of distinct storage keys seen
    #[cfg(test)]
    fn storage_count(&self) -> usize {
        self.storages.len()
    }
}
