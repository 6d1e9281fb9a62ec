//! API Routes
//!
//! Configures the Axum router for the caching gateway.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{clear_handler, health_handler, proxy_handler, stats_handler, AppState};

/// Creates the gateway router.
///
/// # Endpoints
/// - `GET /api/*path` - Cached upstream GET
/// - `DELETE /cache/:name` - Clear one named cache
/// - `GET /stats` - Per-cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: dashboard pages are served from another origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/api/*path", get(proxy_handler))
        .route("/cache/:name", delete(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
