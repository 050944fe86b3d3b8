//! Host-facing events.
//!
//! The client never calls into host code directly. It pushes a
//! [`ClientEvent`] onto an unbounded channel and the host drains the
//! [`EventReceiver`] on whatever execution context owns its state (a UI
//! thread, a render loop, a task).
//!
//! Hosts that prefer the callback style implement [`StreamListener`] and
//! forward each event with [`ClientEvent::dispatch`]:
//!
//! ```ignore
//! while let Some(event) = events.recv().await {
//!     event.dispatch(&mut viewer);
//! }
//! ```

use tokio::sync::mpsc;

use crate::protocol::Frame;

// ============================================================================
// Types
// ============================================================================

/// Receiving end of the client's event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;

// ============================================================================
// ClientEvent
// ============================================================================

/// Notification delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A video frame was decoded.
    FrameReceived(Frame),
    /// The connection opened (`true`) or was lost (`false`).
    ConnectionStatusChanged(bool),
    /// A human-readable error for display.
    Error(String),
}

impl ClientEvent {
    /// Forwards the event to the matching listener callback.
    pub fn dispatch<L: StreamListener + ?Sized>(self, listener: &mut L) {
        match self {
            Self::FrameReceived(frame) => listener.on_frame_received(frame),
            Self::ConnectionStatusChanged(connected) => {
                listener.on_connection_status_changed(connected);
            }
            Self::Error(message) => listener.on_error(&message),
        }
    }
}

// ============================================================================
// StreamListener
// ============================================================================

/// Callback-style consumer of [`ClientEvent`]s.
pub trait StreamListener {
    /// Called with every decoded frame. The listener owns the frame.
    fn on_frame_received(&mut self, frame: Frame);

    /// Called when the connection opens or is lost.
    fn on_connection_status_changed(&mut self, connected: bool);

    /// Called with a human-readable error.
    fn on_error(&mut self, message: &str);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<u8>>,
        statuses: Vec<bool>,
        errors: Vec<String>,
    }

    impl StreamListener for Recorder {
        fn on_frame_received(&mut self, frame: Frame) {
            self.frames.push(frame.into_bytes());
        }

        fn on_connection_status_changed(&mut self, connected: bool) {
            self.statuses.push(connected);
        }

        fn on_error(&mut self, message: &str) {
            self.errors.push(message.to_owned());
        }
    }

    #[test]
    fn test_dispatch_routes_each_variant() {
        let mut recorder = Recorder::default();

        ClientEvent::ConnectionStatusChanged(true).dispatch(&mut recorder);
        ClientEvent::FrameReceived(Frame::from(vec![1, 2, 3])).dispatch(&mut recorder);
        ClientEvent::Error("boom".into()).dispatch(&mut recorder);
        ClientEvent::ConnectionStatusChanged(false).dispatch(&mut recorder);

        assert_eq!(recorder.frames, vec![vec![1, 2, 3]]);
        assert_eq!(recorder.statuses, vec![true, false]);
        assert_eq!(recorder.errors, vec!["boom".to_string()]);
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let mut recorder = Recorder::default();
        let listener: &mut dyn StreamListener = &mut recorder;
        ClientEvent::Error("x".into()).dispatch(listener);
        assert_eq!(recorder.errors.len(), 1);
    }
}
