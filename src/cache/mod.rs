//! Cache Module
//!
//! In-memory response caching with TTL expiration, canonical key derivation
//! and the process-wide named instances.

mod entry;
mod key;
mod named;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, duration_to_ms, CacheEntry};
pub use key::{generate_key, Params};
pub use named::{
    CacheName, CacheSet, CacheTtl, NamedCache, EXPIRATIONS_CACHE, METRICS_CACHE, OPTIONS_CACHE,
    STRIKES_CACHE,
};
pub use stats::CacheStats;
pub use store::CacheStore;
