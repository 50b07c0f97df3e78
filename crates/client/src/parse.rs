//! Tolerant decoding of response bodies.
//!
//! Nothing in here fails loudly: a body that is empty, not JSON, or JSON of
//! the wrong shape decodes to `None`, and the caller decides what that means.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Decodes `body` as JSON into `T`, returning `None` on any failure.
///
/// `Some(value)` with an empty collection inside is a successful decode and
/// is never conflated with `None`.
pub fn parse_json_safely<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, bytes = body.len(), "response body did not decode");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// Extracts a human-readable detail from an error body.
///
/// Accepts `{"detail": "text"}` and the structured
/// `{"detail": {"error": "text", ...}}` form the service uses for rejected
/// patterns. Blank details count as absent.
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    let payload: ErrorBody = parse_json_safely(body)?;
    let text = match payload.detail? {
        Value::String(text) => text,
        Value::Object(mut map) => match map.remove("error") {
            Some(Value::String(text)) => text,
            _ => return None,
        },
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
