//! Inbound message types.
//!
//! Every text frame from the server is a JSON object discriminated by its
//! `type` field.
//!
//! # Message Types
//!
//! | `type` | Fields | Client reaction |
//! |--------|--------|-----------------|
//! | `video_frame` | `data` | decode and deliver frame |
//! | `connection` | `status`, `message`, `raspberry_connected` | log |
//! | `ack` | `command`, `status`, `message` | log |
//! | `status` | `raspberry_connected`, `clients_count` | log |
//! | `error` | `message` | forward to host |
//! | anything else | - | log and ignore |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Deserializer};
use serde_json::{Value, from_str, from_value};

use std::result::Result as StdResult;

use crate::error::{Error, Result};

// ============================================================================
// InboundMessage
// ============================================================================

/// A message received from the server.
///
/// Only `video_frame.data` is required and strictly typed. Every other field
/// falls back to an empty string, `false` or `0` when absent or of the wrong
/// type, so informational messages never fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// One base64-encoded image.
    VideoFrame {
        /// Standard base64 of the encoded image.
        data: String,
    },

    /// Greeting sent by the relay after the socket opens.
    Connection {
        /// Connection status label.
        #[serde(default, deserialize_with = "lenient_string")]
        status: String,
        /// Human-readable message.
        #[serde(default, deserialize_with = "lenient_string")]
        message: String,
        /// Whether the camera side is attached to the relay.
        #[serde(default, deserialize_with = "lenient_bool")]
        raspberry_connected: bool,
    },

    /// Acknowledgement of a previously sent command.
    Ack {
        /// Command being acknowledged.
        #[serde(default, deserialize_with = "lenient_string")]
        command: String,
        /// Outcome label.
        #[serde(default, deserialize_with = "lenient_string")]
        status: String,
        /// Human-readable message.
        #[serde(default, deserialize_with = "lenient_string")]
        message: String,
    },

    /// Relay state snapshot, usually the answer to a `status` command.
    Status {
        /// Whether the camera side is attached to the relay.
        #[serde(default, deserialize_with = "lenient_bool")]
        raspberry_connected: bool,
        /// Number of viewer clients attached to the relay.
        #[serde(default, deserialize_with = "lenient_count")]
        clients_count: i64,
    },

    /// Server-side error report.
    Error {
        /// Error text, forwarded to the host as is.
        #[serde(default, deserialize_with = "lenient_string")]
        message: String,
    },

    /// Any `type` this client does not know.
    #[serde(skip)]
    Unknown {
        /// The unrecognized `type` value.
        kind: String,
    },
}

impl InboundMessage {
    /// `type` values with a dedicated variant.
    const KNOWN_TYPES: [&'static str; 5] = ["video_frame", "connection", "ack", "status", "error"];

    /// Parses one text payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMessage`] if the text is not JSON, has no
    /// string `type` field, or a known type lacks a required field.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            from_str(text).map_err(|e| Error::malformed_message(format!("invalid JSON: {e}")))?;

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed_message("missing 'type' field"))?;

        if !Self::KNOWN_TYPES.contains(&kind) {
            return Ok(Self::Unknown {
                kind: kind.to_owned(),
            });
        }

        from_value(value).map_err(|e| Error::malformed_message(e.to_string()))
    }

    /// Returns the wire `type` of this message.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::VideoFrame { .. } => "video_frame",
            Self::Connection { .. } => "connection",
            Self::Ack { .. } => "ack",
            Self::Status { .. } => "status",
            Self::Error { .. } => "error",
            Self::Unknown { kind } => kind,
        }
    }
}

// ============================================================================
// Lenient Field Readers
// ============================================================================

/// Reads a string field. Scalars are rendered as text; `null`, arrays and
/// objects become empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Reads a boolean field. Accepts `"true"` / `"false"` in any case; anything
/// else is `false`.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Reads an integer field. Floats are truncated, numeric strings parsed;
/// anything else is `0`.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_frame() {
        let msg = InboundMessage::parse(r#"{"type":"video_frame","data":"AAEC"}"#).unwrap();
        assert_eq!(
            msg,
            InboundMessage::VideoFrame {
                data: "AAEC".into()
            }
        );
    }

    #[test]
    fn test_parse_connection_with_defaults() {
        let msg = InboundMessage::parse(
            r#"{"type":"connection","status":"connected","message":"hi"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Connection {
                status: "connected".into(),
                message: "hi".into(),
                raspberry_connected: false,
            }
        );
    }

    #[test]
    fn test_parse_ack() {
        let msg = InboundMessage::parse(
            r#"{"type":"ack","command":"start_stream","status":"success","message":"sent"}"#,
        )
        .unwrap();
        assert!(matches!(msg, InboundMessage::Ack { ref command, .. } if command == "start_stream"));
    }

    #[test]
    fn test_parse_status() {
        let msg = InboundMessage::parse(
            r#"{"type":"status","raspberry_connected":true,"clients_count":3}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Status {
                raspberry_connected: true,
                clients_count: 3,
            }
        );
    }

    #[test]
    fn test_informational_fields_of_wrong_type_fall_back() {
        let msg = InboundMessage::parse(
            r#"{"type":"status","raspberry_connected":"yes","clients_count":"4"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Status {
                raspberry_connected: false,
                clients_count: 4,
            }
        );

        let msg = InboundMessage::parse(
            r#"{"type":"ack","command":"start_stream","status":true,"message":5}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Ack {
                command: "start_stream".into(),
                status: "true".into(),
                message: "5".into(),
            }
        );
    }

    #[test]
    fn test_negative_and_fractional_counts() {
        let msg =
            InboundMessage::parse(r#"{"type":"status","clients_count":-1}"#).unwrap();
        assert!(matches!(msg, InboundMessage::Status { clients_count: -1, .. }));

        let msg =
            InboundMessage::parse(r#"{"type":"status","clients_count":2.9}"#).unwrap();
        assert!(matches!(msg, InboundMessage::Status { clients_count: 2, .. }));
    }

    #[test]
    fn test_null_fields_become_defaults() {
        let msg = InboundMessage::parse(
            r#"{"type":"connection","status":null,"message":null,"raspberry_connected":null}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            InboundMessage::Connection {
                status: String::new(),
                message: String::new(),
                raspberry_connected: false,
            }
        );
    }

    #[test]
    fn test_video_frame_data_stays_strict() {
        let err = InboundMessage::parse(r#"{"type":"video_frame","data":42}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedMessage { .. }));
    }

    #[test]
    fn test_parse_error() {
        let msg =
            InboundMessage::parse(r#"{"type":"error","message":"Raspberry Pi not connected"}"#)
                .unwrap();
        assert_eq!(msg.kind(), "error");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let msg = InboundMessage::parse(
            r#"{"type":"video_frame","data":"AA==","timestamp":1700000000,"frame_id":7}"#,
        )
        .unwrap();
        assert_eq!(msg.kind(), "video_frame");
    }

    #[test]
    fn test_unknown_type() {
        let msg = InboundMessage::parse(r#"{"type":"command","command":"start_stream"}"#).unwrap();
        assert_eq!(
            msg,
            InboundMessage::Unknown {
                kind: "command".into()
            }
        );
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = InboundMessage::parse("{not json").unwrap_err();
        assert!(matches!(err, Error::MalformedMessage { .. }));
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let err = InboundMessage::parse(r#"{"data":"AA=="}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedMessage { .. }));
    }

    #[test]
    fn test_non_string_type_is_malformed() {
        assert!(InboundMessage::parse(r#"{"type":5}"#).is_err());
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(InboundMessage::parse("[1,2,3]").is_err());
        assert!(InboundMessage::parse(r#""video_frame""#).is_err());
    }

    #[test]
    fn test_video_frame_without_data_is_malformed() {
        let err = InboundMessage::parse(r#"{"type":"video_frame"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedMessage { .. }));
    }
}
