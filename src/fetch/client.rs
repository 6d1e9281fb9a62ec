//! HTTP Client
//!
//! The transport the fetch layer issues GET requests through.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::cache::Params;
use crate::config::Config;
use crate::error::{FetchError, FetchResult};

// == Http Client Trait ==
/// Performs a GET and decodes the JSON body.
///
/// Implementations must turn non-2xx responses into
/// [`FetchError::Status`] rather than returning the error body.
pub trait HttpClient: Send + Sync + 'static {
    fn get_json(
        &self,
        url: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = FetchResult<Value>> + Send;
}

// == Reqwest Client ==
/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> FetchResult<Self> {
        Self::new(Duration::from_secs(config.request_timeout))
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    async fn get_json(&self, url: &str, params: Option<&Params>) -> FetchResult<Value> {
        let query = query_pairs(params);
        debug!(url, ?query, "GET");

        let response = self.client.get(url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

// == Query Encoding ==
/// Flattens params into query pairs.
///
/// Strings are sent as-is, numbers and booleans in their display form,
/// `null` is dropped, arrays repeat as `name[]` and objects are sent as JSON.
pub fn query_pairs(params: Option<&Params>) -> Vec<(String, String)> {
    let Some(params) = params else {
        return Vec::new();
    };

    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let name = format!("{}[]", name);
                pairs.extend(
                    items
                        .iter()
                        .filter_map(scalar_to_string)
                        .map(|item| (name.clone(), item)),
                );
            }
            other => {
                if let Some(text) = scalar_to_string(other) {
                    pairs.push((name.clone(), text));
                }
            }
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested => Some(nested.to_string()),
    }
}
