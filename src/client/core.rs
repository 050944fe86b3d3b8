//! Protocol client implementation.
//!
//! [`StreamClient`] drives one [`Session`] at a time through the
//! `Disconnected → Connecting → Connected → Disconnected` cycle, routes
//! inbound messages and reports to the host through [`ClientEvent`]s.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::Command;
use crate::transport::{Session, SessionEvent, SessionEventHandler, normalize};

use super::builder::ClientBuilder;
use super::dispatch::route_message;
use super::event::{ClientEvent, EventReceiver};
use super::options::ClientOptions;
use super::policy;
use super::state::ConnectionState;

// ============================================================================
// StreamClient
// ============================================================================

/// Client for the video streaming relay.
///
/// Cloning is cheap; clones share the same connection and event channel.
/// Dropping the last clone closes the live session.
///
/// # Example
///
/// ```no_run
/// use video_stream_client::{ClientEvent, StreamClient};
///
/// # async fn example() -> video_stream_client::Result<()> {
/// let (client, mut events) = StreamClient::builder().build()?;
/// client.connect("http://192.168.1.20:8765")?;
///
/// while let Some(event) = events.recv().await {
///     match event {
///         ClientEvent::FrameReceived(frame) => println!("frame: {} bytes", frame.len()),
///         ClientEvent::ConnectionStatusChanged(up) => println!("connected: {up}"),
///         ClientEvent::Error(message) => eprintln!("error: {message}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StreamClient {
    shared: Arc<Shared>,
}

impl fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.shared.core.lock();
        f.debug_struct("StreamClient")
            .field("state", &core.state)
            .field("target", &core.target.as_ref().map(Url::as_str))
            .finish()
    }
}

impl StreamClient {
    /// Creates a builder for configuring a client.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with the given options on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the options are invalid
    /// - [`Error::Config`] if called outside a tokio runtime
    pub fn new(options: ClientOptions) -> Result<(Self, EventReceiver)> {
        ClientBuilder::new().options(options).build()
    }

    /// Assembles a client from validated parts.
    pub(crate) fn from_parts(options: ClientOptions, runtime: Handle) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            options,
            runtime,
            core: Mutex::new(Core::default()),
            events,
        });
        (Self { shared }, receiver)
    }

    /// Connects to the relay at `address`.
    ///
    /// `http://` and `https://` prefixes are rewritten to `ws://` and
    /// `wss://` (the latter only with the `native-tls` feature); a bare
    /// `host:port` gets `ws://`. Returns once the session is
    /// started; the outcome arrives as [`ClientEvent::ConnectionStatusChanged`].
    ///
    /// Calling again with the same target while connecting or connected is a
    /// no-op. A different target replaces the current session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the address cannot be used. The
    /// same error is also delivered as [`ClientEvent::Error`].
    pub fn connect(&self, address: &str) -> Result<()> {
        debug!(%address, "Connect requested");

        match normalize(address) {
            Ok(url) => self.shared.connect_to(url),
            Err(e) => {
                error!(error = %e, "Connect aborted");
                self.shared.emit(ClientEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Sends `{"command": name}` to the relay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the client is not connected. Nothing
    /// is sent and no event is raised in that case.
    pub fn send_command(&self, name: &str) -> Result<()> {
        self.shared.send_command(name)
    }

    /// Closes the current session and stops reconnecting.
    ///
    /// Safe to call at any time, any number of times.
    pub fn disconnect(&self) {
        self.shared.disconnect();
    }

    /// Returns `true` if the session is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Returns the current connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.core.lock().state
    }

    /// Returns the normalized URL of the last `connect`, until `disconnect`.
    #[must_use]
    pub fn target(&self) -> Option<Url> {
        self.shared.core.lock().target.clone()
    }

    /// Returns the active options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.shared.options
    }
}

// ============================================================================
// Core
// ============================================================================

/// Mutable client state, guarded by one lock.
#[derive(Default)]
struct Core {
    state: ConnectionState,
    session: Option<Session>,
    target: Option<Url>,
}

impl Core {
    fn is_current(&self, id: SessionId) -> bool {
        self.session.as_ref().is_some_and(|s| s.id() == id)
    }
}

// ============================================================================
// Shared
// ============================================================================

/// State shared between client handles, session callbacks and timers.
///
/// The core lock is never held while emitting events.
pub(crate) struct Shared {
    pub(crate) options: ClientOptions,
    pub(crate) runtime: Handle,
    core: Mutex<Core>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl Shared {
    /// Opens a session to `url`, replacing any other target.
    pub(crate) fn connect_to(self: &Arc<Self>, url: Url) -> Result<()> {
        let id = SessionId::generate();

        let (previous, replaced) = {
            let mut core = self.core.lock();

            if core.state.is_active() && core.target.as_ref() == Some(&url) {
                debug!(url = %url, state = %core.state, "Already connecting or connected, ignoring");
                return Ok(());
            }

            let replaced = core.session.take();
            let opened = Session::open(
                id,
                url.clone(),
                self.options.session_config(),
                &self.runtime,
                self.session_handler(),
            );

            match opened {
                Ok(session) => {
                    let previous = mem::replace(&mut core.state, ConnectionState::Connecting);
                    core.session = Some(session);
                    core.target = Some(url.clone());
                    (previous, replaced)
                }
                Err(e) => {
                    let previous = mem::replace(&mut core.state, ConnectionState::Disconnected);
                    drop(core);
                    drop(replaced);
                    error!(error = %e, "Session could not be opened");
                    if previous == ConnectionState::Connected {
                        self.emit(ClientEvent::ConnectionStatusChanged(false));
                    }
                    self.emit(ClientEvent::Error(e.to_string()));
                    return Err(e);
                }
            }
        };

        if let Some(old) = replaced {
            info!(old = %old.id(), new = %id, "Replacing session");
            old.close();
        }

        info!(session = %id, url = %url, "Connecting");

        if previous == ConnectionState::Connected {
            self.emit(ClientEvent::ConnectionStatusChanged(false));
        }

        Ok(())
    }

    /// Sends a command over the current session.
    pub(crate) fn send_command(&self, name: &str) -> Result<()> {
        let core = self.core.lock();

        let session = match (&core.state, &core.session) {
            (ConnectionState::Connected, Some(session)) => session,
            _ => {
                warn!(command = name, state = %core.state, "Cannot send command, not connected");
                return Err(Error::NotConnected);
            }
        };

        session.send(Command::new(name).to_json()?)?;
        debug!(session = %session.id(), command = name, "Command sent");
        Ok(())
    }

    /// Drops the session and the target.
    fn disconnect(&self) {
        let (previous, session) = {
            let mut core = self.core.lock();
            core.target = None;
            let previous = mem::replace(&mut core.state, ConnectionState::Disconnected);
            (previous, core.session.take())
        };

        if let Some(session) = session {
            session.close();
            info!(session = %session.id(), "Disconnected manually");
        }

        if previous.is_active() {
            self.emit(ClientEvent::ConnectionStatusChanged(false));
        }
    }

    /// Returns the target to reconnect to, if a reconnect is still wanted.
    pub(crate) fn reconnect_target(&self) -> Option<Url> {
        let core = self.core.lock();
        match core.state {
            ConnectionState::Disconnected => core.target.clone(),
            _ => None,
        }
    }

    /// Returns `true` if `id` is the live, open session.
    pub(crate) fn is_connected_on(&self, id: SessionId) -> bool {
        let core = self.core.lock();
        core.state == ConnectionState::Connected && core.is_current(id)
    }

    /// Builds the callback handed to a new session.
    fn session_handler(self: &Arc<Self>) -> SessionEventHandler {
        let weak = Arc::downgrade(self);
        Box::new(move |id, event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_session_event(id, event);
            }
        })
    }

    /// Applies one session event to the state machine.
    fn handle_session_event(self: &Arc<Self>, id: SessionId, event: SessionEvent) {
        match event {
            SessionEvent::Opened => {
                {
                    let mut core = self.core.lock();
                    if !core.is_current(id) {
                        debug!(session = %id, "Ignoring open of superseded session");
                        return;
                    }
                    core.state = ConnectionState::Connected;
                }

                info!(session = %id, "Connected");
                self.emit(ClientEvent::ConnectionStatusChanged(true));

                if self.options.query_status_on_open {
                    let _ = self.send_command(Command::STATUS);
                }

                policy::schedule_auto_start(self, id);
            }

            SessionEvent::Message(text) => {
                if !self.core.lock().is_current(id) {
                    trace!(session = %id, "Ignoring message from superseded session");
                    return;
                }

                if let Some(event) = route_message(&text) {
                    self.emit(event);
                }
            }

            SessionEvent::Closed(reason) => {
                if !self.end_session(id) {
                    return;
                }

                info!(session = %id, %reason, "Disconnected");
                self.emit(ClientEvent::ConnectionStatusChanged(false));
                policy::schedule_reconnect(self);
            }

            SessionEvent::Error(e) => {
                if !self.end_session(id) {
                    return;
                }

                warn!(session = %id, error = %e, "Disconnected by transport error");
                self.emit(ClientEvent::ConnectionStatusChanged(false));
                self.emit(ClientEvent::Error(e.to_string()));
                policy::schedule_reconnect(self);
            }
        }
    }

    /// Moves to `Disconnected` if `id` is the live session.
    ///
    /// Returns `false` for events of superseded sessions.
    fn end_session(&self, id: SessionId) -> bool {
        let ended = {
            let mut core = self.core.lock();
            if !core.is_current(id) {
                debug!(session = %id, "Ignoring close of superseded session");
                return false;
            }
            core.state = ConnectionState::Disconnected;
            core.session.take()
        };
        drop(ended);
        true
    }

    /// Delivers an event to the host.
    pub(crate) fn emit(&self, event: ClientEvent) {
        if self.events.send(event).is_err() {
            trace!("Event receiver dropped, event discarded");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
