//! # LogWriter: notifications as `tracing` events.
//!
//! ## Example output
//! ```text
//! INFO  streamvisor: status mount="cam-1" session=3 status=Live
//! WARN  streamvisor: restart scheduled mount="cam-1" session=3 after_ms=8000 restarts=0
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Notification, NotificationKind};
use crate::subscribers::Subscribe;

/// Logging subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_notification(&self, n: &Notification) {
        let mount = &*n.mount;
        let session = n.session;
        match n.kind {
            NotificationKind::ChannelLive
            | NotificationKind::ChannelOffline
            | NotificationKind::ChannelConnecting => {
                info!(mount, session, status = ?n.status, "status");
            }
            NotificationKind::Progress => {
                debug!(mount, session, progress = ?n.progress, "progress");
            }
            NotificationKind::SessionStarted => info!(mount, session, "session started"),
            NotificationKind::SessionDestroyed => info!(mount, session, "session destroyed"),
            NotificationKind::StallDetected => {
                info!(mount, session, after_ms = ?n.timeout_ms, "stall detected");
            }
            NotificationKind::RestartScheduled => {
                warn!(mount, session, after_ms = ?n.timeout_ms, restarts = ?n.restarts, "restart scheduled");
            }
            NotificationKind::RestartSuppressed => {
                warn!(mount, session, restarts = ?n.restarts, "restart suppressed by policy");
            }
            NotificationKind::PlaybackRejected => {
                warn!(mount, session, reason = ?n.message, "playback rejected");
            }
            NotificationKind::MountNotFound | NotificationKind::EngineFailed => {
                error!(mount, session, kind = n.kind.name(), reason = ?n.message, "session failed");
            }
            NotificationKind::SubscriberOverflow | NotificationKind::SubscriberPanicked => {
                warn!(subscriber = mount, kind = n.kind.name(), info = ?n.message, "subscriber trouble");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
