//! Cache Key Module
//!
//! Derives canonical cache keys from a request URL and its query parameters.

use serde_json::{Map, Value};

/// Query parameters attached to a cached request.
pub type Params = Map<String, Value>;

// == Generate Key ==
/// Builds the cache key for `url` requested with `params`.
///
/// The key is `"{url}:{suffix}"` where the suffix is the JSON array of
/// `[name, value]` pairs sorted by name, so callers that build the same
/// parameters in a different order share one entry:
///
/// ```
/// use flow_cache::cache::{generate_key, Params};
/// use serde_json::json;
///
/// let params: Params = serde_json::from_value(json!({ "asset": "BTC" })).unwrap();
/// assert_eq!(generate_key("url", Some(&params)), r#"url:[["asset","BTC"]]"#);
/// assert_eq!(generate_key("url", None), "url:");
/// ```
///
/// Absent params produce an empty suffix while an empty map produces `[]`,
/// so `None` and `Some(&Params::new())` are different keys. Callers should
/// pick one form per endpoint.
pub fn generate_key(url: &str, params: Option<&Params>) -> String {
    match params {
        Some(params) => format!("{}:{}", url, serialize_sorted(params)),
        None => format!("{}:", url),
    }
}

fn serialize_sorted(params: &Params) -> String {
    let mut entries: Vec<(&String, &Value)> = params.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let pairs: Vec<Value> = entries
        .into_iter()
        .map(|(name, value)| Value::Array(vec![Value::String(name.clone()), value.clone()]))
        .collect();

    Value::Array(pairs).to_string()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_key_with_single_param() {
        let key = generate_key("url", Some(&params(json!({ "asset": "BTC" }))));
        assert_eq!(key, r#"url:[["asset","BTC"]]"#);
    }

    #[test]
    fn test_key_sorts_params_by_name() {
        let key = generate_key(
            "/api/flow",
            Some(&params(json!({ "b": 2, "a": 1, "c": "x" }))),
        );
        assert_eq!(key, r#"/api/flow:[["a",1],["b",2],["c","x"]]"#);
    }

    #[test]
    fn test_key_insertion_order_independent() {
        let mut first = Params::new();
        first.insert("a".to_string(), json!(1));
        first.insert("b".to_string(), json!(2));

        let mut second = Params::new();
        second.insert("b".to_string(), json!(2));
        second.insert("a".to_string(), json!(1));

        assert_eq!(
            generate_key("url", Some(&first)),
            generate_key("url", Some(&second))
        );
    }

    #[test]
    fn test_key_distinguishes_values_and_urls() {
        let one = params(json!({ "x": 1 }));
        let two = params(json!({ "x": 2 }));

        assert_ne!(generate_key("url", Some(&one)), generate_key("url", Some(&two)));
        assert_ne!(generate_key("url1", Some(&one)), generate_key("url2", Some(&one)));
    }

    #[test]
    fn test_key_absent_vs_empty_params() {
        assert_eq!(generate_key("url", None), "url:");
        assert_eq!(generate_key("url", Some(&Params::new())), "url:[]");
    }

    #[test]
    fn test_key_distinguishes_string_and_number() {
        let text = params(json!({ "limit": "10" }));
        let number = params(json!({ "limit": 10 }));

        assert_ne!(
            generate_key("url", Some(&text)),
            generate_key("url", Some(&number))
        );
    }
}
