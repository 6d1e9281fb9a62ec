//! Cache Store Module
//!
//! Key/value storage with per-entry TTL and lazy expiry on read.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// In-memory store of response bodies keyed by [`generate_key`] output.
///
/// There is no size bound and no background sweep. An expired entry stays
/// in memory until the next `get` for its key removes it.
///
/// [`generate_key`]: crate::cache::generate_key
#[derive(Debug)]
pub struct CacheStore<T = Value> {
    entries: HashMap<String, CacheEntry<T>>,
    stats: CacheStats,
    default_ttl: Duration,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store whose entries live `default_ttl` unless `set`
    /// is given an explicit TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and its expiry.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed before returning `None`.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_expired();
            debug!(key, "dropped expired cache entry");
        } else {
            self.stats.record_miss();
        }
        None
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Missing keys are ignored.
    pub fn invalidate(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.stats.set_total_entries(self.entries.len());
        }
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry lookup that neither evicts nor touches counters.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }
}
