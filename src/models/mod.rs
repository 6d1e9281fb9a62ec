//! Request and Response models for the gateway
//!
//! DTOs for query decoding and JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::params_from_query;
pub use responses::{
    CacheStatsResponse, ClearResponse, ErrorResponse, HealthResponse, StatsResponse,
};
