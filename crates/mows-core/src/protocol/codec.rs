//! JSON codec for mows protocol events.
//!
//! Wire format: one UTF-8 JSON object per message.
//!
//! ```text
//! {"type":"<event kind>", <kind-specific fields>}
//! ```
//!
//! Decoding is done in two steps so that failures can be reported precisely:
//! the text is first parsed as a generic JSON value, the `"type"` field is
//! checked against [`Event::TYPE_NAMES`], and only then is the value mapped
//! onto the matching [`Event`] variant.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::Event;

/// Errors that can occur while decoding a wire message.
///
/// A `DecodeError` always concerns a single message.  Callers log it, skip the
/// message, and keep reading the connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The message is not valid JSON (or not UTF-8).
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The message is a JSON value without a string `"type"` field.
    #[error("message has no \"type\" field")]
    MissingType,

    /// The `"type"` field does not name a known event kind.
    #[error("unknown message type: {0:?}")]
    UnknownType(String),

    /// The kind is known but a field is missing or has the wrong shape.
    #[error("malformed {kind} message: {reason}")]
    Malformed { kind: String, reason: String },
}

/// Error returned when an event cannot be serialized.
#[derive(Debug, Error)]
#[error("failed to encode event: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`Event`] into its JSON wire text.
///
/// # Errors
///
/// Returns [`EncodeError`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use mows_core::{decode_event, encode_event, Event};
///
/// let event = Event::MouseMove { dx: 4, dy: -2 };
/// let text = encode_event(&event).unwrap();
/// assert_eq!(decode_event(&text).unwrap(), event);
/// ```
pub fn encode_event(event: &Event) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(event)?)
}

/// Decodes one [`Event`] from JSON wire text.
///
/// # Errors
///
/// Returns [`DecodeError`] if the text is not JSON, carries no `"type"`,
/// names an unknown kind, or is missing a required field.
pub fn decode_event(text: &str) -> Result<Event, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    if !Event::TYPE_NAMES.contains(&kind.as_str()) {
        return Err(DecodeError::UnknownType(kind));
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Malformed {
        kind,
        reason: e.to_string(),
    })
}

/// Decodes an event from raw bytes (e.g. a binary WebSocket frame).
///
/// # Errors
///
/// Returns [`DecodeError::InvalidJson`] if the bytes are not UTF-8, otherwise
/// the same errors as [`decode_event`].
pub fn decode_event_bytes(bytes: &[u8]) -> Result<Event, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    decode_event(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
