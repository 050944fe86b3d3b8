//! Video Stream Client - WebSocket client for a JSON video-frame relay.
//!
//! This library keeps a persistent connection to a streaming relay server,
//! speaks its small JSON command/event protocol and decodes inbound video
//! frames for a host application to display.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  connect / send_command  ┌──────────────┐   WebSocket   ┌─────────┐
//! │     Host     │ ───────────────────────► │ StreamClient │ ◄───────────► │  Relay  │
//! │ (UI, viewer) │ ◄─────────────────────── │  → Session   │   JSON text   │         │
//! └──────────────┘      ClientEvent         └──────────────┘               └─────────┘
//! ```
//!
//! - **Transport**: one [`Session`](transport::Session) per connection,
//!   with keepalive and a 30s idle timeout
//! - **Protocol**: `type`-tagged inbound messages, `{"command": ...}` outbound
//! - **Client**: state machine, frame decoding, reconnect and auto-start
//!
//! # Quick Start
//!
//! ```no_run
//! use video_stream_client::{ClientEvent, Result, StreamClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let (client, mut events) = StreamClient::builder().build()?;
//!     client.connect("http://192.168.1.20:8765")?;
//!
//!     while let Some(event) = events.recv().await {
//!         if let ClientEvent::FrameReceived(frame) = event {
//!             println!("frame: {} bytes ({:?})", frame.len(), frame.image_format());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`StreamClient`], options, events |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | JSON message types and frame decoding |
//! | [`transport`] | WebSocket session and address handling |
//!
//! # Cargo Features
//!
//! - `native-tls`: enables `wss://` endpoints

// ============================================================================
// Modules
// ============================================================================

/// Streaming protocol client.
///
/// - [`StreamClient`] - Connection lifecycle and message routing
/// - [`ClientEvent`] - Host notifications
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// JSON protocol message types.
pub mod protocol;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{
    ClientBuilder, ClientEvent, ClientOptions, ConnectionState, EventReceiver, StreamClient,
    StreamListener,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::SessionId;

// Protocol types
pub use protocol::{Command, Frame, InboundMessage};
