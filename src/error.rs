//! Error types for the fetch layer and the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Fetch Error Enum ==
/// Why an upstream GET did not produce a usable JSON body.
///
/// The `Display` text is what a [`CachedFetch`](crate::fetch::CachedFetch)
/// exposes as its `error`.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// Body was not valid JSON
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

// == Gateway Error Enum ==
/// Errors returned by the caching gateway's handlers.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No named cache with this name
    #[error("Unknown cache: {0}")]
    UnknownCache(String),

    /// Path would leave the upstream `/api/` tree
    #[error("Invalid API path: {0}")]
    InvalidPath(String),

    /// Upstream fetch failed and nothing was cached
    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::UnknownCache(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidPath(_) => StatusCode::NOT_FOUND,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Aliases ==
pub type FetchResult<T> = std::result::Result<T, FetchError>;

pub type Result<T> = std::result::Result<T, GatewayError>;
