//! Request body helpers.
//!
//! Bodies are taken as raw bytes and parsed leniently: anything that is not
//! a JSON object becomes an empty map, so field lookups fall back to their
//! defaults instead of failing the extractor.

use axum::body::Bytes;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;

pub type Payload = Map<String, Value>;

/// Parse a raw request body into a key/value map.
///
/// Never fails.  An empty body is an empty map; invalid UTF-8, invalid JSON
/// or a non-object value is logged and also yields an empty map.
pub fn raw_to_map(raw: &Bytes) -> Payload {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Payload::new();
    }

    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "request body is not valid UTF-8");
            return Payload::new();
        }
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = json_kind(&other), "request body is not a JSON object");
            Payload::new()
        }
        Err(e) => {
            warn!(error = %e, "request body is not valid JSON");
            Payload::new()
        }
    }
}

/// A string field that must be present and non-blank.
pub fn required_str<'a>(payload: &'a Payload, key: &str) -> Result<&'a str, ApiError> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
        Some(Value::String(_)) => Err(ApiError::Validation(format!("'{key}' must not be empty"))),
        Some(_) => Err(ApiError::Validation(format!("'{key}' must be a string"))),
        None => Err(ApiError::Validation(format!("'{key}' is required"))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: &str) -> Payload {
        raw_to_map(&Bytes::from(raw.to_owned()))
    }

    #[test]
    fn object_body_is_parsed() {
        let map = parse(r#"{"repository": "library/redis", "name": "warm"}"#);
        assert_eq!(map.get("repository"), Some(&json!("library/redis")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_and_blank_bodies_are_empty_maps() {
        assert!(parse("").is_empty());
        assert!(parse("  \n").is_empty());
    }

    #[test]
    fn malformed_json_degrades_to_empty_map() {
        assert!(parse("{\"repository\": ").is_empty());
        assert!(parse("not json at all").is_empty());
    }

    #[test]
    fn non_object_json_degrades_to_empty_map() {
        assert!(parse("[1, 2, 3]").is_empty());
        assert!(parse("\"RUN\"").is_empty());
    }

    #[test]
    fn invalid_utf8_degrades_to_empty_map() {
        let map = raw_to_map(&Bytes::from_static(&[0x7b, 0xff, 0xfe, 0x7d]));
        assert!(map.is_empty());
    }

    #[test]
    fn required_str_rejects_missing_blank_and_non_string() {
        let map = parse(r#"{"name": "  ", "repository": 7}"#);

        assert!(matches!(required_str(&map, "name"), Err(ApiError::Validation(_))));
        assert!(matches!(required_str(&map, "repository"), Err(ApiError::Validation(_))));
        assert!(matches!(required_str(&map, "missing"), Err(ApiError::Validation(_))));
    }
}
