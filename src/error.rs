//! Error types for the video stream client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use video_stream_client::{Result, StreamClient};
//!
//! fn start(client: &StreamClient) -> Result<()> {
//!     client.connect("http://192.168.1.20:8765")?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Addressing | [`Error::InvalidAddress`] |
//! | Connection | [`Error::NotConnected`], [`Error::Transport`], [`Error::ConnectionTimeout`] |
//! | Message | [`Error::MalformedMessage`], [`Error::FrameDecode`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |
//!
//! A graceful close or an idle timeout is not an error. The transport
//! reports it as [`SessionEvent::Closed`](crate::transport::SessionEvent::Closed).

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use base64::DecodeError;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when client options are invalid or no tokio runtime is
    /// available to drive the connection.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Addressing Errors
    // ========================================================================
    /// The connect target is not a usable WebSocket endpoint.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress {
        /// Address as given by the caller.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// A send was attempted while no session is open.
    #[error("Not connected")]
    NotConnected,

    /// The underlying connection failed.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The WebSocket handshake did not complete in time.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Message Errors
    // ========================================================================
    /// Inbound payload is not JSON or has no usable `type` field.
    #[error("Malformed message: {message}")]
    MalformedMessage {
        /// Description of the parse failure.
        message: String,
    },

    /// Frame payload is not valid standard base64.
    #[error("Frame decode failed: {0}")]
    FrameDecode(#[from] DecodeError),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid address error.
    #[inline]
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a malformed message error.
    #[inline]
    pub fn malformed_message(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error comes from the connection itself.
    ///
    /// Only these errors change the client's connection state.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::Transport { .. }
                | Self::ConnectionTimeout { .. }
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error is confined to a single inbound message.
    #[inline]
    #[must_use]
    pub fn is_message_error(&self) -> bool {
        matches!(self, Self::MalformedMessage { .. } | Self::FrameDecode(_))
    }

    /// Returns `true` if a later reconnect may succeed.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::ConnectionTimeout { .. } | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_error_display() {
        let err = Error::transport("connection reset");
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }

    #[test]
    fn test_invalid_address_display() {
        let err = Error::invalid_address("ftp://cam", "unsupported scheme 'ftp'");
        assert_eq!(
            err.to_string(),
            "Invalid address 'ftp://cam': unsupported scheme 'ftp'"
        );
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::NotConnected.is_connection_error());
        assert!(Error::transport("x").is_connection_error());
        assert!(Error::connection_timeout(1000).is_connection_error());
        assert!(!Error::malformed_message("x").is_connection_error());
        assert!(!Error::config("x").is_connection_error());
    }

    #[test]
    fn test_is_message_error() {
        let decode_err = STANDARD.decode("@@@").unwrap_err();
        assert!(Error::from(decode_err).is_message_error());
        assert!(Error::malformed_message("x").is_message_error());
        assert!(!Error::NotConnected.is_message_error());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::connection_timeout(5000).is_recoverable());
        assert!(!Error::invalid_address("a", "b").is_recoverable());
        assert!(!Error::NotConnected.is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
