//! WebSocket protocol message types.
//!
//! This module defines the JSON messages exchanged with the streaming relay.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`Command`] | Client → Server | `{"command": "<name>"}` instruction |
//! | [`InboundMessage`] | Server → Client | `type`-tagged notification |
//! | [`Frame`] | - | decoded `video_frame` payload |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Outbound command envelope |
//! | `frame` | Base64 frame decoding |
//! | `message` | Inbound message parsing |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound command envelope.
pub mod command;

/// Decoded video frames.
pub mod frame;

/// Inbound message types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use frame::Frame;
pub use message::InboundMessage;
