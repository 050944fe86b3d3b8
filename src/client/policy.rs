//! Reconnect and auto-start timers.
//!
//! Both timers are fire-and-forget tasks holding a `Weak` reference to the
//! client. When one fires it re-checks the client state and does nothing if
//! the situation it was scheduled for no longer holds, so stale timers never
//! need to be cancelled.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::identifiers::SessionId;

use super::core::Shared;

/// Schedules a reconnect to the current target after the reconnect delay.
///
/// Fires only if the client is still disconnected and still has a target.
pub(crate) fn schedule_reconnect(shared: &Arc<Shared>) {
    if !shared.options.auto_reconnect {
        return;
    }

    let delay = shared.options.reconnect_delay;
    let weak = Arc::downgrade(shared);
    debug!(delay_ms = delay.as_millis() as u64, "Reconnect scheduled");

    shared.runtime.spawn(async move {
        sleep(delay).await;

        let Some(shared) = weak.upgrade() else {
            return;
        };

        let Some(url) = shared.reconnect_target() else {
            debug!("Reconnect no longer needed");
            return;
        };

        info!(url = %url, "Attempting reconnect");
        // Failures are reported through events by `connect_to`.
        let _ = shared.connect_to(url);
    });
}

/// Schedules the auto-start command for session `id`.
///
/// Fires only if `id` is still the open session.
pub(crate) fn schedule_auto_start(shared: &Arc<Shared>, id: SessionId) {
    let Some(command) = shared.options.auto_start_command.clone() else {
        return;
    };

    let delay = shared.options.auto_start_delay;
    let weak = Arc::downgrade(shared);
    debug!(session = %id, %command, delay_ms = delay.as_millis() as u64, "Auto-start scheduled");

    shared.runtime.spawn(async move {
        sleep(delay).await;

        let Some(shared) = weak.upgrade() else {
            return;
        };

        if !shared.is_connected_on(id) {
            debug!(session = %id, "Auto-start skipped, session no longer open");
            return;
        }

        info!(session = %id, %command, "Auto-starting stream");
        let _ = shared.send_command(&command);
    });
}
