//! Configuration Module
//!
//! Loads gateway and client settings from environment variables.

use std::env;

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream analytics API, without the `/api` suffix
    pub api_base_url: String,
    /// Per-request timeout in seconds for upstream calls
    pub request_timeout: u64,
    /// HTTP server port for the gateway
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Upstream API base URL (default: http://localhost:8000)
    /// - `REQUEST_TIMEOUT` - Upstream request timeout in seconds (default: 30)
    /// - `SERVER_PORT` - Gateway port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout: env::var("REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Full upstream URL for an API path, e.g. `flow` -> `<base>/api/flow`.
    pub fn endpoint(&self, path: &str) -> String {
        api_endpoint(&self.api_base_url, path)
    }
}

/// Joins `base` and `path` under `/api/`.
pub fn api_endpoint(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    let path = path.strip_prefix("api/").unwrap_or(path);
    format!("{}/api/{}", base.trim_end_matches('/'), path)
}

/// True when `path` cannot step outside `/api/` once joined and normalized.
///
/// Rejects `.` and `..` segments, including their `%2e` spellings, and
/// treats `\` as a separator the way URL parsing does.
pub fn is_safe_api_path(path: &str) -> bool {
    path.split(['/', '\\']).all(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment != "." && segment != ".."
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout: 30,
            server_port: 3000,
        }
    }
}
