//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`StreamClient`]
//! instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use video_stream_client::StreamClient;
//!
//! # fn example() -> video_stream_client::Result<()> {
//! let (client, events) = StreamClient::builder()
//!     .reconnect_delay(Duration::from_secs(5))
//!     .auto_start("start_stream", Duration::from_millis(500))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{Error, Result};

use super::core::StreamClient;
use super::event::EventReceiver;
use super::options::ClientOptions;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`StreamClient`].
///
/// Use [`StreamClient::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    options: ClientOptions,
    /// Runtime driving sessions and timers.
    runtime: Option<Handle>,
}

impl ClientBuilder {
    /// Creates a builder with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the tokio runtime used for sessions and timers.
    ///
    /// Required when building from a thread that is not inside a runtime,
    /// such as a UI thread.
    #[inline]
    #[must_use]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Sets the idle timeout.
    #[inline]
    #[must_use]
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_idle_timeout(timeout);
        self
    }

    /// Sets the reconnect delay.
    #[inline]
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.options = self.options.with_reconnect_delay(delay);
        self
    }

    /// Disables reconnecting.
    #[inline]
    #[must_use]
    pub fn without_reconnect(mut self) -> Self {
        self.options = self.options.without_reconnect();
        self
    }

    /// Sets the command sent automatically after connecting.
    #[inline]
    #[must_use]
    pub fn auto_start(mut self, command: impl Into<String>, delay: Duration) -> Self {
        self.options = self.options.with_auto_start(command, delay);
        self
    }

    /// Disables the automatic command.
    #[inline]
    #[must_use]
    pub fn without_auto_start(mut self) -> Self {
        self.options = self.options.without_auto_start();
        self
    }

    /// Builds the client and its event receiver.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the options are invalid
    /// - [`Error::Config`] if no runtime was given and the caller is not
    ///   inside a tokio runtime
    pub fn build(self) -> Result<(StreamClient, EventReceiver)> {
        self.options.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| {
                Error::config("No tokio runtime; build inside a runtime or pass one with .runtime()")
            })?,
        };

        Ok(StreamClient::from_parts(self.options, runtime))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_forwards_options() {
        let builder = ClientBuilder::new()
            .idle_timeout(Duration::from_secs(10))
            .without_reconnect()
            .auto_start("status", Duration::from_millis(5));

        assert_eq!(builder.options.idle_timeout, Duration::from_secs(10));
        assert!(!builder.options.auto_reconnect);
        assert_eq!(builder.options.auto_start_command.as_deref(), Some("status"));
    }

    #[test]
    fn test_build_rejects_invalid_options() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = ClientBuilder::new()
            .runtime(runtime.handle().clone())
            .idle_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_build_with_explicit_runtime_outside_async() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (client, _events) = ClientBuilder::new()
            .runtime(runtime.handle().clone())
            .build()
            .expect("explicit runtime");
        assert!(!client.is_connected());
    }

    #[test]
    fn test_build_without_runtime_fails() {
        assert!(matches!(
            ClientBuilder::new().build(),
            Err(Error::Config { .. })
        ));
    }
}
