//! WebSocket transport layer.
//!
//! This module owns the network side of the client: turning a user-supplied
//! address into a WebSocket URL and running one connection per [`Session`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  StreamClient   │                              │  Stream relay   │
//! │                 │         WebSocket            │                 │
//! │  → Session      │◄────────────────────────────►│  JSON frames    │
//! │    (event loop) │      ws://HOST:PORT/PATH     │  and commands   │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Session Lifecycle
//!
//! 1. [`normalize`] - Rewrite `http(s)://` or bare `host:port` to `ws(s)://`
//! 2. [`Session::open`] - Spawn the handshake and event loop
//! 3. [`SessionEvent::Opened`] - Session ready, [`Session::send`] accepted
//! 4. [`SessionEvent::Closed`] / [`SessionEvent::Error`] - Session over
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `address` | Address normalization |
//! | `session` | WebSocket connection and event loop |

// ============================================================================
// Submodules
// ============================================================================

/// Address normalization.
pub mod address;

/// WebSocket connection and event loop.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use address::{endpoint, normalize};
pub use session::{
    CloseReason, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_IDLE_TIMEOUT, Session, SessionConfig,
    SessionEvent, SessionEventHandler,
};
