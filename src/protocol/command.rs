//! Outbound command envelope.
//!
//! The client sends exactly one message shape to the server:
//!
//! ```json
//! { "command": "start_stream" }
//! ```
//!
//! The server decides which names it accepts; the well-known ones are
//! exposed as constants.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::to_string;

use crate::error::Result;

// ============================================================================
// Command
// ============================================================================

/// A client-to-server instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name.
    pub command: String,
}

impl Command {
    /// Query relay and camera state.
    pub const STATUS: &'static str = "status";

    /// Ask the camera to start streaming frames.
    pub const START_STREAM: &'static str = "start_stream";

    /// Ask the camera to stop streaming frames.
    pub const STOP_STREAM: &'static str = "stop_stream";

    /// Creates a command with an arbitrary name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            command: name.into(),
        }
    }

    /// Creates a `status` command.
    #[inline]
    #[must_use]
    pub fn status() -> Self {
        Self::new(Self::STATUS)
    }

    /// Creates a `start_stream` command.
    #[inline]
    #[must_use]
    pub fn start_stream() -> Self {
        Self::new(Self::START_STREAM)
    }

    /// Creates a `stop_stream` command.
    #[inline]
    #[must_use]
    pub fn stop_stream() -> Self {
        Self::new(Self::STOP_STREAM)
    }

    /// Returns the command name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.command
    }

    /// Serializes the envelope to JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
