use std::collections::VecDeque;

use parking_lot::RwLock;
use serde::Serialize;

use super::MetricRecord;

// ─── Configuration ───────────────────────────────────────────────

/// How many records the collector keeps when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 1000;

// ─── Public types ────────────────────────────────────────────────

/// Fixed-capacity, insertion-ordered buffer of the most recent metrics.
/// Ingestion connections call `append()`, query handlers call
/// `snapshot()` / `count()`.
///
/// Every mutation happens under the write half of one lock and only for
/// the in-memory update, so a reader never sees a half-applied append.
pub struct MetricStore {
    capacity: usize,
    inner: RwLock<VecDeque<MetricRecord>>,
}

/// Point-in-time copy handed to the `/metrics` listing.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub count: usize,
    pub metrics: Vec<MetricRecord>,
}

// ─── MetricStore impl ────────────────────────────────────────────

impl MetricStore {
    /// `capacity` is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert at the tail, dropping the oldest record first when full.
    pub fn append(&self, record: MetricRecord) {
        let mut records = self.inner.write();
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    pub fn count(&self) -> usize {
        self.inner.read().len()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let records = self.inner.read();
        StoreSnapshot {
            count: records.len(),
            metrics: records.iter().cloned().collect(),
        }
    }
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
