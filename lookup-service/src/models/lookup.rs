use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Key reserved for traffic-manager liveness probes. Never looked up.
pub const PING_KEY: &str = "ping";

/// Body returned for [`PING_KEY`].
pub const PING_ACK: &str = "Ping ACK";

/// Result of a single regional lookup.
///
/// Absence and store failures deliberately share one variant: callers
/// cannot tell a missing key from an unreadable store.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    PingAck,
    Found(Value),
    AbsentOrError { key: String },
}

impl LookupOutcome {
    /// Label for metrics and logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            LookupOutcome::PingAck => "ping",
            LookupOutcome::Found(_) => "found",
            LookupOutcome::AbsentOrError { .. } => "absent_or_error",
        }
    }
}

pub fn not_found_body(key: &str) -> String {
    format!("Document '{}' not found", key)
}

/// JavaScript-style truthiness. `null`, `false`, `0` and `""` count as
/// absent; objects and arrays are present even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl IntoResponse for LookupOutcome {
    fn into_response(self) -> Response {
        let plain = [(header::CONTENT_TYPE, "text/plain; charset=utf-8")];

        // Every outcome is a 200; only the body differs.
        match self {
            LookupOutcome::PingAck => (StatusCode::OK, plain, PING_ACK).into_response(),
            // Bare strings go out as-is rather than JSON-quoted.
            LookupOutcome::Found(Value::String(text)) => {
                (StatusCode::OK, plain, text).into_response()
            }
            LookupOutcome::Found(document) => (StatusCode::OK, Json(document)).into_response(),
            LookupOutcome::AbsentOrError { key } => {
                (StatusCode::OK, plain, not_found_body(&key)).into_response()
            }
        }
    }
}
