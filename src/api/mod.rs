//! API Module
//!
//! HTTP handlers and routing for the caching gateway.
//!
//! # Endpoints
//! - `GET /api/*path` - Upstream GET served through the matching named cache
//! - `DELETE /cache/:name` - Clear one named cache
//! - `GET /stats` - Per-cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
