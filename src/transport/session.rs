//! WebSocket session and event loop.
//!
//! A [`Session`] owns one client-side WebSocket connection. Opening it spawns
//! a tokio task that performs the handshake and then handles:
//!
//! - Incoming text frames, raised as [`SessionEvent::Message`]
//! - Outgoing text frames queued by [`Session::send`]
//! - Keepalive pings and the idle timeout
//! - Graceful shutdown requested by [`Session::close`]
//!
//! # Event Guarantees
//!
//! Events are raised from the session task in wire order. Every session
//! raises at most one [`SessionEvent::Opened`] and exactly one terminal
//! event, either [`SessionEvent::Closed`] or [`SessionEvent::Error`].
//! [`Session::is_open`] is updated before the matching event is raised.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until, timeout};
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;

use super::address;

// ============================================================================
// Constants
// ============================================================================

/// Default idle window before the connection is considered lost.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time allowed for the WebSocket handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Types
// ============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

/// Session event callback type.
///
/// Called from the session task for every lifecycle event, in order.
pub type SessionEventHandler = Box<dyn Fn(SessionId, SessionEvent) + Send + Sync>;

// ============================================================================
// SessionConfig
// ============================================================================

/// Timing parameters for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Close the session when no inbound traffic is seen for this long.
    ///
    /// Pings go out every half window, so a live peer always answers in time.
    pub idle_timeout: Duration,
    /// Maximum duration of the WebSocket handshake.
    pub handshake_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

// ============================================================================
// SessionEvent
// ============================================================================

/// Raw lifecycle event raised by a session.
#[derive(Debug)]
pub enum SessionEvent {
    /// Handshake completed.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// The connection ended without an I/O failure.
    Closed(CloseReason),
    /// The handshake or the connection failed.
    Error(Error),
}

// ============================================================================
// CloseReason
// ============================================================================

/// Why a session closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer sent a close frame.
    Remote {
        /// Close code (1005 when the peer sent none).
        code: u16,
        /// Close reason text.
        reason: String,
    },
    /// [`Session::close`] was called.
    Local,
    /// No inbound traffic within the idle window.
    IdleTimeout,
    /// The stream ended without a close frame.
    StreamEnded,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { code, reason } if reason.is_empty() => {
                write!(f, "closed by remote (code {code})")
            }
            Self::Remote { code, reason } => write!(f, "closed by remote (code {code}): {reason}"),
            Self::Local => f.write_str("closed locally"),
            Self::IdleTimeout => f.write_str("idle timeout"),
            Self::StreamEnded => f.write_str("stream ended"),
        }
    }
}

// ============================================================================
// SessionCommand
// ============================================================================

/// Internal commands for the event loop.
enum SessionCommand {
    /// Write a text frame.
    Send(String),
    /// Close the connection.
    Close,
}

// ============================================================================
// Session
// ============================================================================

/// One WebSocket connection to the streaming relay.
///
/// Dropping a `Session` closes it.
pub struct Session {
    id: SessionId,
    url: Url,
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    /// Shared with the event loop.
    open: Arc<AtomicBool>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("open", &self.is_open())
            .finish()
    }
}

impl Session {
    /// Starts connecting to `url`.
    ///
    /// Returns immediately; the outcome of the handshake is reported to
    /// `handler` as [`SessionEvent::Opened`] or [`SessionEvent::Error`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `url` is not a `ws`/`wss` URL
    /// with a host.
    pub fn open(
        id: SessionId,
        url: Url,
        config: SessionConfig,
        runtime: &Handle,
        handler: SessionEventHandler,
    ) -> Result<Self> {
        address::validate(url.as_str(), &url)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        debug!(session = %id, url = %url, "Opening session");

        runtime.spawn(Self::run(
            id,
            url.clone(),
            config,
            command_rx,
            Arc::clone(&open),
            handler,
        ));

        Ok(Self {
            id,
            url,
            command_tx,
            open,
        })
    }

    /// Returns the session ID.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the URL this session connects to.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns `true` between the opened event and the terminal event.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Queues a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the session is not open.
    pub fn send(&self, text: impl Into<String>) -> Result<()> {
        if !self.is_open() {
            warn!(session = %self.id, "Cannot send, session not open");
            return Err(Error::NotConnected);
        }

        self.command_tx
            .send(SessionCommand::Send(text.into()))
            .map_err(|_| Error::NotConnected)
    }

    /// Closes the session gracefully. Closing twice is a no-op.
    pub fn close(&self) {
        if self.command_tx.send(SessionCommand::Close).is_ok() {
            debug!(session = %self.id, "Close requested");
        }
    }

    /// Session task: handshake, then the event loop.
    async fn run(
        id: SessionId,
        url: Url,
        config: SessionConfig,
        mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
        open: Arc<AtomicBool>,
        handler: SessionEventHandler,
    ) {
        let handshake = tokio::select! {
            result = timeout(config.handshake_timeout, connect_async(url.as_str())) => result,
            _ = Self::wait_for_close(&mut command_rx) => {
                debug!(session = %id, "Closed before handshake completed");
                handler(id, SessionEvent::Closed(CloseReason::Local));
                return;
            }
        };

        let ws_stream = match handshake {
            Ok(Ok((ws_stream, response))) => {
                info!(session = %id, status = %response.status(), "WebSocket connected");
                ws_stream
            }
            Ok(Err(e)) => {
                error!(session = %id, error = %e, "WebSocket handshake failed");
                handler(id, SessionEvent::Error(Error::WebSocket(e)));
                return;
            }
            Err(_) => {
                let timeout_ms = config.handshake_timeout.as_millis() as u64;
                error!(session = %id, timeout_ms, "WebSocket handshake timed out");
                handler(id, SessionEvent::Error(Error::connection_timeout(timeout_ms)));
                return;
            }
        };

        open.store(true, Ordering::Release);
        handler(id, SessionEvent::Opened);

        let terminal = Self::run_event_loop(id, ws_stream, &config, &mut command_rx, &handler).await;

        open.store(false, Ordering::Release);
        match &terminal {
            SessionEvent::Closed(reason) => info!(session = %id, %reason, "WebSocket closed"),
            SessionEvent::Error(e) => error!(session = %id, error = %e, "WebSocket failed"),
            _ => {}
        }
        handler(id, terminal);
    }

    /// Resolves when a close is requested or every handle is gone.
    async fn wait_for_close(command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                SessionCommand::Close => return,
                SessionCommand::Send(_) => trace!("Dropping send queued before open"),
            }
        }
    }

    /// Event loop over an established connection.
    ///
    /// Returns the terminal event instead of raising it, so the caller can
    /// flip the open flag first.
    async fn run_event_loop(
        id: SessionId,
        ws_stream: WsStream,
        config: &SessionConfig,
        command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>,
        handler: &SessionEventHandler,
    ) -> SessionEvent {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let keepalive_period = (config.idle_timeout / 2).max(Duration::from_millis(1));
        let mut keepalive = interval_at(Instant::now() + keepalive_period, keepalive_period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Pushed back on every inbound frame.
        let idle = sleep_until(Instant::now() + config.idle_timeout);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                // Incoming frames from the relay
                message = ws_read.next() => {
                    idle.as_mut().reset(Instant::now() + config.idle_timeout);
                    if let Some(terminal) = Self::handle_incoming(id, message, handler) {
                        return terminal;
                    }
                }

                // Commands from the client
                command = command_rx.recv() => {
                    match command {
                        Some(SessionCommand::Send(text)) => {
                            trace!(session = %id, len = text.len(), "Sending text frame");
                            if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                                return Self::write_failure(e);
                            }
                        }

                        Some(SessionCommand::Close) | None => {
                            Self::shutdown(&mut ws_write, &mut ws_read).await;
                            return SessionEvent::Closed(CloseReason::Local);
                        }
                    }
                }

                // Liveness
                () = &mut idle => {
                    let idle_ms = config.idle_timeout.as_millis() as u64;
                    warn!(session = %id, idle_ms, "No traffic within idle window");
                    let _ = timeout(Duration::from_secs(1), ws_write.close()).await;
                    return SessionEvent::Closed(CloseReason::IdleTimeout);
                }

                _ = keepalive.tick() => {
                    if let Err(e) = ws_write.send(Message::Ping(Default::default())).await {
                        return Self::write_failure(e);
                    }
                    trace!(session = %id, "Ping sent");
                }
            }
        }
    }

    /// Handles one read result. Returns the terminal event when the
    /// connection is over.
    fn handle_incoming(
        id: SessionId,
        message: Option<std::result::Result<Message, WsError>>,
        handler: &SessionEventHandler,
    ) -> Option<SessionEvent> {
        match message {
            Some(Ok(Message::Text(text))) => {
                trace!(session = %id, len = text.len(), "Text frame received");
                handler(id, SessionEvent::Message(text.to_string()));
                None
            }

            Some(Ok(Message::Binary(data))) => {
                debug!(session = %id, len = data.len(), "Ignoring binary frame");
                None
            }

            Some(Ok(Message::Close(frame))) => {
                let (code, reason) = frame
                    .map(|f| (u16::from(f.code), f.reason.to_string()))
                    .unwrap_or((1005, String::new()));
                Some(SessionEvent::Closed(CloseReason::Remote { code, reason }))
            }

            // Ping, Pong and raw frames only count as traffic
            Some(Ok(_)) => None,

            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                Some(SessionEvent::Closed(CloseReason::StreamEnded))
            }

            Some(Err(e)) => Some(SessionEvent::Error(Error::WebSocket(e))),
        }
    }

    /// Sends a close frame and waits briefly for the peer's reply.
    async fn shutdown(ws_write: &mut WsWrite, ws_read: &mut WsRead) {
        if ws_write.close().await.is_err() {
            return;
        }

        let drain = async {
            while let Some(Ok(message)) = ws_read.next().await {
                if message.is_close() {
                    break;
                }
            }
        };
        let _ = timeout(Duration::from_secs(1), drain).await;
    }

    fn write_failure(e: WsError) -> SessionEvent {
        match e {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                SessionEvent::Closed(CloseReason::StreamEnded)
            }
            other => SessionEvent::Error(Error::WebSocket(other)),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// Tests
// ============================================================================
