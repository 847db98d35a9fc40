//! Response outcomes
//!
//! Bodies are not always JSON: a successful response whose body fails to
//! parse is kept as raw text, and error responses are never parsed at all.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status codes at or above this are failures
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// Response body, tagged by the shape it was read as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    /// JSON first, raw text when that fails
    pub fn parse(text: String) -> Self {
        if text.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    /// Keep the body as text without attempting to parse it
    pub fn raw(text: String) -> Self {
        if text.is_empty() {
            ResponseBody::Empty
        } else {
            ResponseBody::Text(text)
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// String field of a top-level JSON object
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.as_json()?.get(field)?.as_str()
    }

    /// Number of catalog entries in the body.
    ///
    /// Handles both a bare JSON array and the server's
    /// `{"success": .., "message": .., "data": [..]}` envelope.
    pub fn item_count(&self) -> Option<usize> {
        match self.as_json()? {
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => map.get("data")?.as_array().map(Vec::len),
            _ => None,
        }
    }

    /// Display form: JSON pretty-printed with two-space indent, text verbatim
    pub fn render(&self) -> String {
        match self {
            ResponseBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ResponseBody::Text(text) => text.clone(),
            ResponseBody::Empty => String::new(),
        }
    }
}

/// Result of exactly one request attempt that reached the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseOutcome {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: ResponseBody,

    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

impl ResponseOutcome {
    /// Build an outcome, parsing the body only for non-error statuses
    pub fn from_response(status: u16, text: String, latency_ms: u64) -> Self {
        let body = if status < ERROR_STATUS_THRESHOLD {
            ResponseBody::parse(text)
        } else {
            ResponseBody::raw(text)
        };
        Self {
            status,
            body,
            latency_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status < ERROR_STATUS_THRESHOLD
    }

    /// Body usable by callers; error responses yield nothing
    pub fn payload(&self) -> Option<&ResponseBody> {
        if self.is_success() {
            Some(&self.body)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prefers_json() {
        let body = ResponseBody::parse(r#"{"status":"UP"}"#.to_string());
        assert_eq!(body, ResponseBody::Json(json!({"status": "UP"})));
        assert_eq!(body.field_str("status"), Some("UP"));
    }

    #[test]
    fn test_parse_falls_back_to_text() {
        let body = ResponseBody::parse("pong".to_string());
        assert_eq!(body, ResponseBody::Text("pong".to_string()));
        assert_eq!(body.field_str("status"), None);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(ResponseBody::parse(String::new()), ResponseBody::Empty);
        assert_eq!(ResponseBody::raw(String::new()), ResponseBody::Empty);
    }

    #[test]
    fn test_error_status_is_not_parsed() {
        let outcome = ResponseOutcome::from_response(500, r#"{"error":"boom"}"#.to_string(), 3);
        assert!(!outcome.is_success());
        assert_eq!(outcome.body, ResponseBody::Text(r#"{"error":"boom"}"#.to_string()));
        assert!(outcome.payload().is_none());
    }

    #[test]
    fn test_redirect_range_counts_as_success() {
        let outcome = ResponseOutcome::from_response(399, "moved".to_string(), 1);
        assert!(outcome.is_success());
        assert_eq!(outcome.payload(), Some(&ResponseBody::Text("moved".to_string())));
    }

    #[test]
    fn test_item_count_shapes() {
        let bare = ResponseBody::Json(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(bare.item_count(), Some(2));

        let envelope = ResponseBody::Json(json!({
            "success": true,
            "message": "Countries retrieved successfully",
            "data": [{"id": 1, "name": "India"}]
        }));
        assert_eq!(envelope.item_count(), Some(1));

        let health = ResponseBody::Json(json!({"status": "UP"}));
        assert_eq!(health.item_count(), None);
        assert_eq!(ResponseBody::Text("[]".into()).item_count(), None);
    }

    #[test]
    fn test_render_uses_two_space_indent() {
        let body = ResponseBody::Json(json!({"status": "UP"}));
        assert_eq!(body.render(), "{\n  \"status\": \"UP\"\n}");
    }
}
