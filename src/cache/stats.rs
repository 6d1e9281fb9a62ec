//! Cache Statistics Module
//!
//! Tracks hits, misses and lazy expirations for one cache store.

use serde::Serialize;

// == Cache Stats ==
/// Per-store performance counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that returned a fresh value
    pub hits: u64,
    /// Reads that found nothing usable (absent or expired)
    pub misses: u64,
    /// Entries dropped because a read found them past expiry
    pub expired: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an expired entry removed on read. The read itself is a miss.
    pub fn record_expired(&mut self) {
        self.expired += 1;
        self.misses += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
