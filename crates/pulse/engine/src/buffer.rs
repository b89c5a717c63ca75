//! Bounded per-tenant history of request outcomes.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pulse_types::RequestOutcome;
use std::collections::VecDeque;

/// Bounded, append-only-with-eviction sequence of outcomes for one tenant.
///
/// The buffer is the unit of mutual exclusion: each tenant owns exactly one,
/// so two tenants never contend on the same lock. At capacity the oldest
/// record is dropped before the newest is appended, bounding memory per
/// tenant regardless of traffic volume.
pub struct MetricBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<RequestOutcome>>,
}

impl MetricBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append one outcome, evicting the oldest record when at capacity.
    pub fn append(&self, outcome: RequestOutcome) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(outcome);
    }

    /// Copy of the current contents, safe to read without further
    /// synchronization.
    pub fn snapshot(&self) -> Vec<RequestOutcome> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Drop every entry older than `cutoff`, preserving the order of the
    /// remainder. Keeps low-traffic tenants from retaining history beyond
    /// the longest aggregation window.
    pub fn trim_older_than(&self, cutoff: DateTime<Utc>) {
        self.entries.lock().retain(|o| o.timestamp >= cutoff);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
