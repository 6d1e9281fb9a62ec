//! Flow Cache - request-caching data layer for an options-flow dashboard
//!
//! Provides TTL caches keyed by URL + params, a cache-first reactive fetcher
//! and a caching gateway in front of the analytics API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use api::AppState;
pub use cache::{generate_key, CacheName, CacheTtl, NamedCache, Params};
pub use config::Config;
pub use fetch::{CachedFetch, FetchState, HttpClient, ReqwestClient};
