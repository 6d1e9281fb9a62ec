//! Integration Tests for the caching gateway and cached fetch
//!
//! Runs an in-process mock upstream API and talks to it over real HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use flow_cache::{
    api::{create_router, CACHE_STATUS_HEADER},
    cache::{CacheName, CacheSet},
    AppState, CachedFetch, NamedCache, Params, ReqwestClient,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Mock Upstream ==

#[derive(Clone, Default)]
struct Upstream {
    hits: Arc<AtomicUsize>,
}

impl Upstream {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn flow(
    State(upstream): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let call = upstream.hits.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "trades": [{ "asset": query.get("asset"), "call": call }] }))
}

async fn strikes(State(upstream): State<Upstream>) -> Json<Value> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([100, 105, 110]))
}

async fn broken(State(upstream): State<Upstream>) -> (StatusCode, Json<Value>) {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "boom" })),
    )
}

async fn admin_secret(State(upstream): State<Upstream>) -> Json<Value> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "leaked": true }))
}

/// Starts the mock upstream and returns its base URL.
async fn spawn_upstream() -> (String, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new()
        .route("/api/flow", get(flow))
        .route("/api/strikes", get(strikes))
        .route("/api/broken", get(broken))
        .route("/admin/secret", get(admin_secret))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}

// == Helper Functions ==

fn client() -> ReqwestClient {
    ReqwestClient::new(Duration::from_secs(5)).unwrap()
}

async fn create_test_app() -> (Router, Upstream) {
    let (base_url, upstream) = spawn_upstream().await;
    let state = AppState::new(CacheSet::isolated(), client(), base_url);
    (create_router(state), upstream)
}

async fn get_request(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn cache_status(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn params(value: Value) -> Params {
    serde_json::from_value(value).unwrap()
}

// == Gateway Tests ==

#[tokio::test]
async fn test_gateway_miss_then_hit() {
    let (app, upstream) = create_test_app().await;

    let first = get_request(&app, "/api/flow?asset=BTC").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_status(&first), "MISS");
    let first_body = body_to_json(first.into_body()).await;
    assert_eq!(first_body["trades"][0]["asset"], "BTC");

    let second = get_request(&app, "/api/flow?asset=BTC").await;
    assert_eq!(cache_status(&second), "HIT");
    assert_eq!(body_to_json(second.into_body()).await, first_body);

    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_gateway_param_order_shares_entry() {
    let (app, upstream) = create_test_app().await;

    let first = get_request(&app, "/api/flow?asset=ETH&limit=5").await;
    assert_eq!(cache_status(&first), "MISS");

    let second = get_request(&app, "/api/flow?limit=5&asset=ETH").await;
    assert_eq!(cache_status(&second), "HIT");

    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_gateway_different_params_miss() {
    let (app, upstream) = create_test_app().await;

    get_request(&app, "/api/flow?asset=BTC").await;
    let other = get_request(&app, "/api/flow?asset=ETH").await;

    assert_eq!(cache_status(&other), "MISS");
    assert_eq!(body_to_json(other.into_body()).await["trades"][0]["asset"], "ETH");
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_gateway_upstream_error_is_not_cached() {
    let (app, upstream) = create_test_app().await;

    let first = get_request(&app, "/api/broken").await;
    assert_eq!(first.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(first.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("status 500"));

    let second = get_request(&app, "/api/broken").await;
    assert_eq!(second.status(), StatusCode::BAD_GATEWAY);

    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_gateway_refuses_paths_outside_api() {
    let (app, upstream) = create_test_app().await;

    for uri in [
        "/api/..%2Fadmin%2Fsecret",
        "/api/flow%2F..%2F..%2Fadmin%2Fsecret",
        "/api/%252e%252e%2Fadmin%2Fsecret",
    ] {
        let response = get_request(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let json = body_to_json(response.into_body()).await;
        assert!(json.get("leaked").is_none());
        assert!(json["error"].as_str().unwrap().contains("Invalid API path"));
    }

    let stats = body_to_json(get_request(&app, "/stats").await.into_body()).await;
    for cache in stats["caches"].as_array().unwrap() {
        assert_eq!(cache["total_entries"], 0);
    }
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_gateway_clear_cache() {
    let (app, upstream) = create_test_app().await;

    get_request(&app, "/api/strikes").await;

    let clear = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache/strikes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(clear.status(), StatusCode::OK);
    let json = body_to_json(clear.into_body()).await;
    assert_eq!(json["name"], "strikes");

    let again = get_request(&app, "/api/strikes").await;
    assert_eq!(cache_status(&again), "MISS");
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_gateway_stats_track_named_caches() {
    let (app, _upstream) = create_test_app().await;

    get_request(&app, "/api/flow?asset=BTC").await;
    get_request(&app, "/api/flow?asset=BTC").await;
    get_request(&app, "/api/strikes").await;

    let response = get_request(&app, "/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    let caches = json["caches"].as_array().unwrap();
    let options = caches.iter().find(|c| c["name"] == "options").unwrap();
    assert_eq!(options["hits"], 1);
    assert_eq!(options["misses"], 1);
    assert_eq!(options["total_entries"], 1);
    assert_eq!(options["default_ttl_ms"], 60_000);

    let strikes = caches.iter().find(|c| c["name"] == "strikes").unwrap();
    assert_eq!(strikes["misses"], 1);
    assert_eq!(strikes["total_entries"], 1);
}

// == Cached Fetch over HTTP ==

#[tokio::test]
async fn test_cached_fetch_miss_then_cached_across_units() {
    let (base_url, upstream) = spawn_upstream().await;
    let http = Arc::new(client());
    let cache = NamedCache::new(CacheName::Options);
    let url = format!("{}/api/flow", base_url);

    let mut first = CachedFetch::new(Arc::clone(&http), cache.clone(), None);
    first.set_inputs(url.clone(), Some(params(json!({ "asset": "BTC" }))));
    let state = first.settled().await;
    assert_eq!(state.data.as_ref().unwrap()["trades"][0]["asset"], "BTC");

    // a second consumer of the same cache is served without a request
    let mut second = CachedFetch::new(Arc::clone(&http), cache, None);
    second.set_inputs(url, Some(params(json!({ "asset": "BTC" }))));
    let state = second.settled().await;
    assert_eq!(state.data.as_ref().unwrap()["trades"][0]["call"], 1);

    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_cached_fetch_error_keeps_previous_data() {
    let (base_url, _upstream) = spawn_upstream().await;
    let mut hook = CachedFetch::new(
        Arc::new(client()),
        NamedCache::new(CacheName::Strikes),
        None,
    );

    hook.set_inputs(format!("{}/api/strikes", base_url), None);
    let good = hook.settled().await;
    assert_eq!(good.data, Some(json!([100, 105, 110])));

    hook.set_inputs(format!("{}/api/broken", base_url), None);
    let failed = hook.settled().await;

    assert_eq!(failed.data, Some(json!([100, 105, 110])));
    assert!(failed.error.unwrap().contains("status 500"));
    assert!(!failed.loading);
}

#[tokio::test]
async fn test_cached_fetch_refetches_after_ttl() {
    let (base_url, upstream) = spawn_upstream().await;
    let http = Arc::new(client());
    let cache = NamedCache::with_default_ttl(CacheName::Options, Duration::from_millis(100));
    let url = format!("{}/api/flow", base_url);

    let mut hook = CachedFetch::new(Arc::clone(&http), cache.clone(), None);
    hook.set_inputs(url.clone(), None);
    hook.settled().await;

    tokio::time::sleep(Duration::from_millis(150)).await;

    let mut later = CachedFetch::new(http, cache, None);
    later.set_inputs(url, None);
    let state = later.settled().await;

    assert_eq!(state.data.unwrap()["trades"][0]["call"], 2);
    assert_eq!(upstream.hits(), 2);
}
