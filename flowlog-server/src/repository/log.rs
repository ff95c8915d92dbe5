//! Log Repository
//!
//! In-process store for log entries, keyed by (service, run).
//!
//! Every run owns its own lock, so appends to different runs proceed in
//! parallel and a batch lands under a single exclusive section: readers of
//! that run see all of it or none of it. Service-wide reads visit runs one at
//! a time and may or may not observe appends that race with them.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;
use flowlog_core::domain::log::LogEntry;
use flowlog_core::domain::page::Page;
use parking_lot::RwLock;
use thiserror::Error;

use crate::repository::cursor::{RunCursor, ServiceCursor};

/// Store failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("log store is full (capacity: {capacity} entries)")]
    CapacityExceeded { capacity: usize },
}

/// Log entries for every service and run
pub struct LogStore {
    services: DashMap<String, Arc<ServiceLog>>,
    sequence: AtomicU64,
    len: AtomicUsize,
    capacity: Option<usize>,
}

/// The runs recorded for one service
#[derive(Default)]
struct ServiceLog {
    runs: RwLock<BTreeMap<String, Arc<RwLock<RunLog>>>>,
}

/// Append-only entries of one (service, run) pair
#[derive(Default)]
struct RunLog {
    /// Insertion order; sequence numbers strictly increase along the vector
    entries: Vec<StoredEntry>,
    /// (timestamp, seq) → position in `entries`
    by_time: BTreeMap<(u64, u64), usize>,
}

struct StoredEntry {
    seq: u64,
    entry: LogEntry,
}

impl LogStore {
    /// Creates an unbounded store
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Creates a store that accepts at most `capacity` entries in total
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            services: DashMap::new(),
            sequence: AtomicU64::new(0),
            len: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Append one entry to a run
    pub fn append_one(
        &self,
        service_id: &str,
        run_id: &str,
        entry: LogEntry,
    ) -> Result<(), StoreError> {
        self.append_batch(service_id, run_id, vec![entry])
    }

    /// Append entries to a run as one atomic unit
    pub fn append_batch(
        &self,
        service_id: &str,
        run_id: &str,
        entries: Vec<LogEntry>,
    ) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        self.reserve(entries.len())?;

        let run = self.run_or_create(service_id, run_id);
        let mut run = run.write();

        let first = self
            .sequence
            .fetch_add(entries.len() as u64, Ordering::Relaxed);

        for (offset, entry) in entries.into_iter().enumerate() {
            let seq = first + offset as u64;
            let position = run.entries.len();
            run.by_time.insert((entry.timestamp, seq), position);
            run.entries.push(StoredEntry { seq, entry });
        }

        Ok(())
    }

    /// Entries of one run in insertion order, resuming after `cursor`
    ///
    /// An unknown (service, run) pair yields an empty page.
    pub fn query(
        &self,
        service_id: &str,
        run_id: &str,
        cursor: Option<RunCursor>,
        limit: usize,
    ) -> Page<LogEntry> {
        let limit = limit.max(1);

        let Some(run) = self.find_run(service_id, run_id) else {
            return Page::empty();
        };
        let run = run.read();

        let start = match cursor {
            Some(cursor) => run.entries.partition_point(|s| s.seq <= cursor.seq),
            None => 0,
        };
        let remaining = &run.entries[start..];
        let taken = &remaining[..remaining.len().min(limit)];

        let next_page = if remaining.len() > limit {
            taken.last().map(|s| RunCursor { seq: s.seq }.encode())
        } else {
            None
        };

        Page {
            payload: taken.iter().map(|s| s.entry.clone()).collect(),
            next_page,
        }
    }

    /// Entries of every run of a service, ordered by (timestamp, sequence)
    pub fn query_by_service(
        &self,
        service_id: &str,
        cursor: Option<ServiceCursor>,
        limit: usize,
    ) -> Page<LogEntry> {
        let limit = limit.max(1);

        let Some(service) = self.find_service(service_id) else {
            return Page::empty();
        };
        let runs: Vec<Arc<RwLock<RunLog>>> = service.runs.read().values().cloned().collect();

        let lower = match cursor {
            Some(c) => Bound::Excluded((c.timestamp, c.seq)),
            None => Bound::Unbounded,
        };

        // Each run contributes at most limit + 1 candidates; the extra one
        // tells us whether another page exists.
        let mut candidates: Vec<((u64, u64), LogEntry)> = Vec::new();
        for run in runs {
            let run = run.read();
            candidates.extend(
                run.by_time
                    .range((lower, Bound::Unbounded))
                    .take(limit.saturating_add(1))
                    .map(|(key, &position)| (*key, run.entries[position].entry.clone())),
            );
        }

        candidates.sort_unstable_by_key(|(key, _)| *key);
        let has_more = candidates.len() > limit;
        candidates.truncate(limit);

        let next_page = if has_more {
            candidates.last().map(|((timestamp, seq), _)| {
                ServiceCursor {
                    timestamp: *timestamp,
                    seq: *seq,
                }
                .encode()
            })
        } else {
            None
        };

        Page {
            payload: candidates.into_iter().map(|(_, entry)| entry).collect(),
            next_page,
        }
    }

    /// Total number of stored entries
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Run identifiers recorded for a service, sorted
    #[cfg(test)]
    fn runs_of(&self, service_id: &str) -> Vec<String> {
        let Some(service) = self.find_service(service_id) else {
            return Vec::new();
        };
        let runs = service.runs.read();
        runs.keys().cloned().collect()
    }

    // =============================================================================
    // Helper Functions
    // =============================================================================

    fn reserve(&self, count: usize) -> Result<(), StoreError> {
        let Some(capacity) = self.capacity else {
            self.len.fetch_add(count, Ordering::AcqRel);
            return Ok(());
        };

        self.len
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_add(count).filter(|total| *total <= capacity)
            })
            .map(|_| ())
            .map_err(|_| StoreError::CapacityExceeded { capacity })
    }

    fn find_service(&self, service_id: &str) -> Option<Arc<ServiceLog>> {
        self.services.get(service_id).map(|s| Arc::clone(s.value()))
    }

    fn find_run(&self, service_id: &str, run_id: &str) -> Option<Arc<RwLock<RunLog>>> {
        let service = self.find_service(service_id)?;
        let run = service.runs.read().get(run_id).cloned();
        run
    }

    fn run_or_create(&self, service_id: &str, run_id: &str) -> Arc<RwLock<RunLog>> {
        let service = Arc::clone(
            self.services
                .entry(service_id.to_string())
                .or_default()
                .value(),
        );

        if let Some(run) = service.runs.read().get(run_id) {
            return Arc::clone(run);
        }

        Arc::clone(service.runs.write().entry(run_id.to_string()).or_default())
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}
