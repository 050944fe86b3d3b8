//! Client configuration options.
//!
//! Timing and policy knobs for [`StreamClient`](super::StreamClient).
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use video_stream_client::ClientOptions;
//!
//! let options = ClientOptions::new()
//!     .with_reconnect_delay(Duration::from_secs(5))
//!     .without_auto_start();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::transport::{DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_IDLE_TIMEOUT, SessionConfig};

// ============================================================================
// Constants
// ============================================================================

/// Delay before reconnecting after the connection is lost.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Delay between the connection opening and the automatic stream start.
pub const DEFAULT_AUTO_START_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// ClientOptions
// ============================================================================

/// Client timing and policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Close the session after this long without inbound traffic.
    pub idle_timeout: Duration,

    /// Maximum duration of the WebSocket handshake.
    pub handshake_timeout: Duration,

    /// Send a `status` command as soon as the session opens.
    pub query_status_on_open: bool,

    /// Reconnect to the last target after the connection is lost.
    pub auto_reconnect: bool,

    /// Delay before each reconnect attempt.
    pub reconnect_delay: Duration,

    /// Command sent automatically after connecting, if any.
    pub auto_start_command: Option<String>,

    /// Delay before the automatic command.
    pub auto_start_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientOptions {
    /// Creates options with the default policy: 30s idle timeout, status
    /// query on open, reconnect after 3s, `start_stream` after 1s.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            query_status_on_open: true,
            auto_reconnect: true,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            auto_start_command: Some(Command::START_STREAM.to_string()),
            auto_start_delay: DEFAULT_AUTO_START_DELAY,
        }
    }

    /// Creates options with no automatic behavior at all.
    ///
    /// No status query, no reconnect, no auto-start.
    #[inline]
    #[must_use]
    pub fn manual() -> Self {
        Self {
            query_status_on_open: false,
            auto_reconnect: false,
            auto_start_command: None,
            ..Self::new()
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientOptions {
    /// Sets the idle timeout.
    #[inline]
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Enables or disables the `status` query on open.
    #[inline]
    #[must_use]
    pub fn with_status_query(mut self, enabled: bool) -> Self {
        self.query_status_on_open = enabled;
        self
    }

    /// Sets the reconnect delay and enables reconnecting.
    #[inline]
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.auto_reconnect = true;
        self.reconnect_delay = delay;
        self
    }

    /// Disables reconnecting.
    #[inline]
    #[must_use]
    pub fn without_reconnect(mut self) -> Self {
        self.auto_reconnect = false;
        self
    }

    /// Sets the command sent automatically after connecting.
    #[inline]
    #[must_use]
    pub fn with_auto_start(mut self, command: impl Into<String>, delay: Duration) -> Self {
        self.auto_start_command = Some(command.into());
        self.auto_start_delay = delay;
        self
    }

    /// Disables the automatic command.
    #[inline]
    #[must_use]
    pub fn without_auto_start(mut self) -> Self {
        self.auto_start_command = None;
        self
    }
}

// ============================================================================
// Conversion Methods
// ============================================================================

impl ClientOptions {
    /// Returns the per-session timing parameters.
    #[inline]
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: self.idle_timeout,
            handshake_timeout: self.handshake_timeout,
        }
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a timeout is zero or the auto-start
    /// command name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.idle_timeout.is_zero() {
            return Err(Error::config("Idle timeout must be greater than zero"));
        }

        if self.handshake_timeout.is_zero() {
            return Err(Error::config("Handshake timeout must be greater than zero"));
        }

        if let Some(command) = &self.auto_start_command
            && command.trim().is_empty()
        {
            return Err(Error::config("Auto-start command must not be blank"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.idle_timeout, Duration::from_secs(30));
        assert_eq!(options.reconnect_delay, Duration::from_secs(3));
        assert_eq!(options.auto_start_delay, Duration::from_secs(1));
        assert_eq!(options.auto_start_command.as_deref(), Some("start_stream"));
        assert!(options.query_status_on_open);
        assert!(options.auto_reconnect);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_manual_disables_automation() {
        let options = ClientOptions::manual();
        assert!(!options.query_status_on_open);
        assert!(!options.auto_reconnect);
        assert!(options.auto_start_command.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let options = ClientOptions::manual()
            .with_reconnect_delay(Duration::from_millis(250))
            .with_auto_start("status", Duration::from_millis(10))
            .with_idle_timeout(Duration::from_secs(5));

        assert!(options.auto_reconnect);
        assert_eq!(options.reconnect_delay, Duration::from_millis(250));
        assert_eq!(options.auto_start_command.as_deref(), Some("status"));
        assert_eq!(options.session_config().idle_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let options = ClientOptions::new().with_idle_timeout(Duration::ZERO);
        assert!(matches!(options.validate(), Err(Error::Config { .. })));

        let options = ClientOptions::new().with_handshake_timeout(Duration::ZERO);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_auto_start() {
        let options = ClientOptions::new().with_auto_start("  ", Duration::from_secs(1));
        assert!(options.validate().is_err());
    }
}
