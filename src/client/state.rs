//! Connection state.

use std::fmt;

// ============================================================================
// ConnectionState
// ============================================================================

/// Where the client is in its connection lifecycle.
///
/// Changed only by the client in response to session events and to its own
/// `connect` / `disconnect` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No session, or the last session ended.
    #[default]
    Disconnected,
    /// A session is performing its handshake.
    Connecting,
    /// The session is open.
    Connected,
}

impl ConnectionState {
    /// Returns `true` if a session exists, open or not.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disconnected() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_is_active() {
        assert!(!ConnectionState::Disconnected.is_active());
        assert!(ConnectionState::Connecting.is_active());
        assert!(ConnectionState::Connected.is_active());
    }
}
