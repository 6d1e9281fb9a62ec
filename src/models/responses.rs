//! Response DTOs for the gateway
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheName, CacheStats};

/// Stats for one named cache (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Which cache these numbers belong to
    pub name: CacheName,
    /// Default TTL in milliseconds
    pub default_ttl_ms: u64,
    pub hits: u64,
    pub misses: u64,
    /// Entries removed because a read found them expired
    pub expired: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(name: CacheName, default_ttl_ms: u64, stats: &CacheStats) -> Self {
        Self {
            name,
            default_ttl_ms,
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub caches: Vec<CacheStatsResponse>,
}

/// Response body for clearing a cache (DELETE /cache/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// The cache that was cleared
    pub name: CacheName,
}

impl ClearResponse {
    pub fn new(name: CacheName) -> Self {
        Self {
            message: format!("Cache '{}' cleared", name),
            name,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
