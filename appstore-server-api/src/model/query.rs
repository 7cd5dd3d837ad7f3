//! Query-string flattening for GET-style parameter models.
//!
//! The App Store expects repeated keys for list parameters
//! (`productType=A&productType=B`), never the bracketed `productType[]` form.

use serde_json::Value;
use url::form_urlencoded::byte_serialize;

/// Flattens `(name, value)` pairs into an `&`-joined query string.
///
/// - `null` values are skipped
/// - booleans are written as `true` / `false`
/// - arrays and objects emit one pair per element, repeating the key
/// - everything else is percent-encoded in form style
///
/// # Examples
///
/// ```
/// use appstore_server_api::model::query::to_query_string;
/// use serde_json::json;
///
/// let query = to_query_string(&[
///     ("revision", json!("abc")),
///     ("productType", json!(["AUTO_RENEWABLE", "CONSUMABLE"])),
///     ("revoked", json!(false)),
///     ("sort", json!(null)),
/// ]);
/// assert_eq!(
///     query,
///     "revision=abc&productType=AUTO_RENEWABLE&productType=CONSUMABLE&revoked=false"
/// );
/// ```
#[must_use]
pub fn to_query_string(fields: &[(&str, Value)]) -> String {
    let mut segments = Vec::new();

    for (name, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    segments.push(pair(name, &render(item)));
                }
            }
            Value::Object(entries) => {
                for item in entries.values() {
                    segments.push(pair(name, &render(item)));
                }
            }
            scalar => segments.push(pair(name, &render(scalar))),
        }
    }

    segments.join("&")
}

fn pair(name: &str, value: &str) -> String {
    format!("{}={}", encode(name), encode(value))
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}
