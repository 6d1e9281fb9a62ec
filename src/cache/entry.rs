//! Cache Entry Module
//!
//! A stored response body together with its expiry timestamp.

use std::time::Duration;

use chrono::Utc;

// == Cache Entry ==
/// A single cached value with creation and expiry timestamps.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: T, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(duration_to_ms(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is still fresh at exactly `expires_at` and expired strictly
    /// after it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against an explicit clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Whole milliseconds in `duration`, capped at `u64::MAX`.
pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
