//! Fetch Module
//!
//! Cache-first GET requests and the reactive [`CachedFetch`] unit built on
//! top of them.

mod client;
mod hook;

pub use client::{query_pairs, HttpClient, ReqwestClient};
pub use hook::{CachedFetch, FetchState};

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{Params, NamedCache};
use crate::error::FetchResult;

// == Cache Status ==
/// Where a fetched value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

// == Fetch Through ==
/// Returns the cached body for `(url, params)` or fetches and caches it.
///
/// Only successful bodies are stored, with `ttl` or the cache's default.
/// Errors are returned as-is and leave the cache untouched.
pub async fn fetch_through<C: HttpClient>(
    client: &C,
    cache: &NamedCache,
    url: &str,
    params: Option<&Params>,
    ttl: Option<Duration>,
) -> FetchResult<(Value, CacheStatus)> {
    let key = cache.generate_key(url, params);

    if let Some(cached) = cache.get(&key).await {
        debug!(cache = %cache.name(), %key, "cache hit");
        return Ok((cached, CacheStatus::Hit));
    }

    debug!(cache = %cache.name(), %key, "cache miss");
    match client.get_json(url, params).await {
        Ok(body) => {
            cache.set(key, body.clone(), ttl).await;
            Ok((body, CacheStatus::Miss))
        }
        Err(err) => {
            warn!(cache = %cache.name(), url, error = %err, "fetch failed");
            Err(err)
        }
    }
}
