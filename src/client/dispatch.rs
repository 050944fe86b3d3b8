//! Inbound message routing.
//!
//! Turns one text payload into at most one host event. Every failure here is
//! confined to the payload at hand and never touches connection state.

use tracing::{debug, info, warn};

use crate::protocol::{Frame, InboundMessage};

use super::event::ClientEvent;

// ============================================================================
// Constants
// ============================================================================

/// Host-visible text for an unparseable payload.
pub const JSON_PARSING_FAILED: &str = "JSON parsing failed";

/// Host-visible text for a frame whose payload is not valid base64.
pub const BASE64_DECODING_FAILED: &str = "Base64 decoding failed";

/// How much of a rejected payload is echoed into the log.
const LOG_PREVIEW_CHARS: usize = 100;

// ============================================================================
// Routing
// ============================================================================

/// Routes one inbound text payload.
///
/// Returns the event to deliver to the host, if any.
pub(crate) fn route_message(text: &str) -> Option<ClientEvent> {
    let message = match InboundMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            let preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
            warn!(error = %e, %preview, "Dropping unparseable message");
            return Some(ClientEvent::Error(JSON_PARSING_FAILED.to_string()));
        }
    };

    debug!(kind = message.kind(), len = text.len(), "Message received");

    match message {
        InboundMessage::VideoFrame { data } => match Frame::decode(&data) {
            Ok(frame) => {
                debug!(bytes = frame.len(), "Frame decoded");
                Some(ClientEvent::FrameReceived(frame))
            }
            Err(e) => {
                warn!(error = %e, chars = data.len(), "Dropping undecodable frame");
                Some(ClientEvent::Error(BASE64_DECODING_FAILED.to_string()))
            }
        },

        InboundMessage::Connection {
            status,
            message,
            raspberry_connected,
        } => {
            info!(%status, %message, raspberry_connected, "Relay connection notice");
            None
        }

        InboundMessage::Ack {
            command,
            status,
            message,
        } => {
            info!(%command, %status, %message, "Command acknowledged");
            None
        }

        InboundMessage::Status {
            raspberry_connected,
            clients_count,
        } => {
            info!(raspberry_connected, clients_count, "Relay status");
            None
        }

        InboundMessage::Error { message } => {
            warn!(%message, "Server error");
            Some(ClientEvent::Error(message))
        }

        InboundMessage::Unknown { kind } => {
            warn!(%kind, "Ignoring unknown message type");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
