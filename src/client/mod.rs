//! Streaming protocol client.
//!
//! This module provides the host-facing side of the crate.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StreamClient`] | Connection lifecycle, message routing, reconnect |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`ClientOptions`] | Timing and policy options |
//! | [`ClientEvent`] | Notification delivered to the host |
//! | [`StreamListener`] | Callback-style event consumer |
//! | [`ConnectionState`] | Lifecycle state |
//!
//! # State Machine
//!
//! ```text
//! Disconnected ──connect()──► Connecting ──opened──► Connected
//!      ▲                          │                      │
//!      └───────── closed / error ─┴──────────────────────┘
//! ```
//!
//! After `Connected` the client sends `status` at once and the auto-start
//! command (default `start_stream`) one second later. After losing the
//! connection it reconnects to the same target three seconds later, unless
//! [`StreamClient::disconnect`] was called.

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

/// Inbound message routing.
pub mod dispatch;

/// Host-facing events and listener trait.
pub mod event;

/// Client options.
pub mod options;

/// Reconnect and auto-start timers.
mod policy;

/// Connection state.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::StreamClient;
pub use dispatch::{BASE64_DECODING_FAILED, JSON_PARSING_FAILED};
pub use event::{ClientEvent, EventReceiver, StreamListener};
pub use options::{ClientOptions, DEFAULT_AUTO_START_DELAY, DEFAULT_RECONNECT_DELAY};
pub use state::ConnectionState;
