//! Request DTOs for the gateway
//!
//! Turns an incoming query string into the params a cached fetch is keyed by.

use serde_json::Value;

use crate::cache::Params;

/// Builds fetch params from decoded query pairs.
///
/// `name[]` pairs are collected into an array under `name`. For a plain name
/// given more than once the last value wins. An empty query yields `None`,
/// so `/api/flow` and `/api/flow?` share a cache key.
pub fn params_from_query(pairs: Vec<(String, String)>) -> Option<Params> {
    if pairs.is_empty() {
        return None;
    }

    let mut params = Params::new();
    for (name, value) in pairs {
        match name.strip_suffix("[]") {
            Some(base) => {
                let slot = params
                    .entry(base.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match slot {
                    Value::Array(items) => items.push(Value::String(value)),
                    other => *other = Value::Array(vec![Value::String(value)]),
                }
            }
            None => {
                params.insert(name, Value::String(value));
            }
        }
    }
    Some(params)
}
