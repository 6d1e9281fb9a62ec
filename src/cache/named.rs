//! Named Cache Instances
//!
//! Process-wide cache stores, one per data domain, plus the shared TTL tiers
//! consumers pick from.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{generate_key, CacheStats, CacheStore, Params};

// == TTL Presets ==
/// Shared TTL tiers. Pick by how often the underlying data changes.
pub struct CacheTtl;

impl CacheTtl {
    /// Trade and flow lists.
    pub const SHORT: Duration = Duration::from_secs(60);
    /// Metrics, open interest and volume charts.
    pub const MEDIUM: Duration = Duration::from_secs(5 * 60);
    /// Expiration calendars.
    pub const LONG: Duration = Duration::from_secs(15 * 60);
    /// Strike lists.
    pub const VERY_LONG: Duration = Duration::from_secs(60 * 60);
}

// == Cache Name ==
/// The data domains that get their own cache store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheName {
    Metrics,
    Options,
    Strikes,
    Expirations,
}

impl CacheName {
    pub const ALL: [CacheName; 4] = [
        CacheName::Metrics,
        CacheName::Options,
        CacheName::Strikes,
        CacheName::Expirations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheName::Metrics => "metrics",
            CacheName::Options => "options",
            CacheName::Strikes => "strikes",
            CacheName::Expirations => "expirations",
        }
    }

    /// TTL applied when a caller does not pass one.
    pub fn default_ttl(self) -> Duration {
        match self {
            CacheName::Options => CacheTtl::SHORT,
            CacheName::Metrics => CacheTtl::MEDIUM,
            CacheName::Expirations => CacheTtl::LONG,
            CacheName::Strikes => CacheTtl::VERY_LONG,
        }
    }

    /// Picks the cache for an API path from its first segment.
    ///
    /// `flow/btc`, `trades`, `blocks/...` and `options/...` go to the options
    /// cache. Unrecognised paths fall back to metrics.
    pub fn for_path(path: &str) -> Self {
        let segment = path
            .trim_start_matches('/')
            .trim_start_matches("api/")
            .split(['/', '?'])
            .next()
            .unwrap_or_default();

        match segment {
            "flow" | "trades" | "blocks" | "options" => CacheName::Options,
            "strikes" => CacheName::Strikes,
            "expirations" => CacheName::Expirations,
            _ => CacheName::Metrics,
        }
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// == Named Cache ==
/// Shared handle to one cache store. Clones point at the same entries.
#[derive(Debug, Clone)]
pub struct NamedCache {
    name: CacheName,
    store: Arc<RwLock<CacheStore>>,
}

impl NamedCache {
    /// Creates a fresh, independent store for `name` with its default TTL.
    pub fn new(name: CacheName) -> Self {
        Self::with_default_ttl(name, name.default_ttl())
    }

    pub fn with_default_ttl(name: CacheName, default_ttl: Duration) -> Self {
        Self {
            name,
            store: Arc::new(RwLock::new(CacheStore::new(default_ttl))),
        }
    }

    /// The process-wide instance for `name`.
    pub fn global(name: CacheName) -> &'static NamedCache {
        match name {
            CacheName::Metrics => &METRICS_CACHE,
            CacheName::Options => &OPTIONS_CACHE,
            CacheName::Strikes => &STRIKES_CACHE,
            CacheName::Expirations => &EXPIRATIONS_CACHE,
        }
    }

    pub fn name(&self) -> CacheName {
        self.name
    }

    pub fn generate_key(&self, url: &str, params: Option<&Params>) -> String {
        generate_key(url, params)
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        self.store.write().await.set(key, value, ttl);
    }

    pub async fn invalidate(&self, key: &str) {
        self.store.write().await.invalidate(key);
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn default_ttl(&self) -> Duration {
        self.store.read().await.default_ttl()
    }

    /// Remaining lifetime of the entry under `key` without evicting it.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.store
            .read()
            .await
            .peek(key)
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms()))
    }
}

// == Process-wide Instances ==
pub static METRICS_CACHE: Lazy<NamedCache> = Lazy::new(|| NamedCache::new(CacheName::Metrics));
pub static OPTIONS_CACHE: Lazy<NamedCache> = Lazy::new(|| NamedCache::new(CacheName::Options));
pub static STRIKES_CACHE: Lazy<NamedCache> = Lazy::new(|| NamedCache::new(CacheName::Strikes));
pub static EXPIRATIONS_CACHE: Lazy<NamedCache> =
    Lazy::new(|| NamedCache::new(CacheName::Expirations));

// == Cache Set ==
/// One handle per named cache, as handed to the gateway.
#[derive(Debug, Clone)]
pub struct CacheSet {
    caches: [NamedCache; 4],
}

impl CacheSet {
    /// Handles onto the process-wide instances.
    pub fn global() -> Self {
        Self {
            caches: CacheName::ALL.map(|name| NamedCache::global(name).clone()),
        }
    }

    /// Independent stores, used where callers must not share state.
    pub fn isolated() -> Self {
        Self {
            caches: CacheName::ALL.map(NamedCache::new),
        }
    }

    pub fn get(&self, name: CacheName) -> &NamedCache {
        // declaration order matches ALL
        &self.caches[name as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedCache> {
        self.caches.iter()
    }
}
