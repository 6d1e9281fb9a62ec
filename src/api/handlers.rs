//! API Handlers
//!
//! HTTP request handlers for the caching gateway.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::cache::{duration_to_ms, CacheName, CacheSet};
use crate::config::{api_endpoint, is_safe_api_path, Config};
use crate::error::{FetchResult, GatewayError, Result};
use crate::fetch::{fetch_through, ReqwestClient};
use crate::models::{
    params_from_query, CacheStatsResponse, ClearResponse, HealthResponse, StatsResponse,
};

/// Header reporting whether a proxied body came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// One handle per named cache
    pub caches: CacheSet,
    /// Upstream HTTP client
    pub client: Arc<ReqwestClient>,
    /// Upstream base URL, without the `/api` suffix
    pub api_base_url: String,
}

impl AppState {
    pub fn new(caches: CacheSet, client: ReqwestClient, api_base_url: impl Into<String>) -> Self {
        Self {
            caches,
            client: Arc::new(client),
            api_base_url: api_base_url.into(),
        }
    }

    /// State backed by the process-wide named caches.
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        Ok(Self::new(
            CacheSet::global(),
            ReqwestClient::from_config(config)?,
            config.api_base_url.clone(),
        ))
    }
}

/// Handler for GET /api/*path
///
/// Serves the upstream `/api/{path}` through the named cache the path maps
/// to. The query string becomes the fetch params. Paths with dot segments
/// are refused before anything reaches upstream or the cache.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response> {
    if !is_safe_api_path(&path) {
        warn!(%path, "rejected API path");
        return Err(GatewayError::InvalidPath(path));
    }

    let cache = state.caches.get(CacheName::for_path(&path));
    let url = api_endpoint(&state.api_base_url, &path);
    let params = params_from_query(query);

    let (body, status) =
        fetch_through(state.client.as_ref(), cache, &url, params.as_ref(), None).await?;

    Ok(([(CACHE_STATUS_HEADER, status.as_str())], Json(body)).into_response())
}

/// Handler for DELETE /cache/:name
///
/// Drops every entry of one named cache.
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    let name: CacheName = name.parse().map_err(GatewayError::UnknownCache)?;

    state.caches.get(name).clear().await;
    info!(cache = %name, "cache cleared");

    Ok(Json(ClearResponse::new(name)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut caches = Vec::new();
    for cache in state.caches.iter() {
        let stats = cache.stats().await;
        let default_ttl_ms = duration_to_ms(cache.default_ttl().await);
        caches.push(CacheStatsResponse::new(cache.name(), default_ttl_ms, &stats));
    }

    Json(StatsResponse { caches })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
