//! # Notifications emitted by playback controllers.
//!
//! [`NotificationKind`] has two groups:
//! - **Named notifications**: the four kinds hosts subscribe to by name
//!   (`progress`, `channelLive`, `channelOffline`, `channelConnecting`).
//! - **Lifecycle notifications**: session bookkeeping published on the bus for
//!   logging and diagnostics.
//!
//! ## Ordering guarantees
//! Each notification carries a process-wide monotonically increasing `seq`.
//!
//! ## Example
//! ```rust
//! use streamvisor::{ChannelStatus, Notification, NotificationKind};
//!
//! let n = Notification::status("player-1", ChannelStatus::Live).with_session(7);
//!
//! assert_eq!(n.kind, NotificationKind::ChannelLive);
//! assert_eq!(n.message.as_deref(), Some("Channel is Live"));
//! assert_eq!(n.kind.name(), "channelLive");
//! ```

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::PlayerError;
use crate::core::status::ChannelStatus;
use crate::engine::Progress;

static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    // === Named notifications ===
    /// Engine reported forward progress.
    ///
    /// Sets: `progress`
    Progress,
    /// Status changed to `Live`.
    ///
    /// Sets: `status`, `message`
    ChannelLive,
    /// Status changed to `Offline`.
    ///
    /// Sets: `status`, `message`
    ChannelOffline,
    /// Status changed to `Connecting`.
    ///
    /// Sets: `status`, `message`
    ChannelConnecting,

    // === Lifecycle ===
    /// Engine acquired, listeners attached, first `play()` issued.
    SessionStarted,
    /// The host could not resolve the mount point.
    ///
    /// Sets: `message`
    MountNotFound,
    /// Engine capability missing or construction failed.
    ///
    /// Sets: `message`
    EngineFailed,
    /// `play()` was rejected; the retry scheduler has been re-armed.
    ///
    /// Sets: `message`
    PlaybackRejected,
    /// Watchdog expired: no media signal within `timeout_ms`.
    ///
    /// Sets: `timeout_ms`
    StallDetected,
    /// Retry scheduler expired; the controller is being rebuilt.
    ///
    /// Sets: `timeout_ms`, `restarts`
    RestartScheduled,
    /// Retry scheduler expired but the restart policy forbids another restart.
    ///
    /// Sets: `restarts`
    RestartSuppressed,
    /// Controller torn down.
    SessionDestroyed,

    // === Subscriber plumbing ===
    /// A subscriber panicked while handling a notification.
    ///
    /// Sets: `mount` (subscriber name), `message`
    SubscriberPanicked,
    /// A subscriber queue was full or closed; the notification was dropped for it.
    ///
    /// Sets: `mount` (subscriber name), `message`
    SubscriberOverflow,
}

impl NotificationKind {
    /// Name hosts use with `on`/`off`.
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::Progress => "progress",
            NotificationKind::ChannelLive => "channelLive",
            NotificationKind::ChannelOffline => "channelOffline",
            NotificationKind::ChannelConnecting => "channelConnecting",
            NotificationKind::SessionStarted => "sessionStarted",
            NotificationKind::MountNotFound => "mountNotFound",
            NotificationKind::EngineFailed => "engineFailed",
            NotificationKind::PlaybackRejected => "playbackRejected",
            NotificationKind::StallDetected => "stallDetected",
            NotificationKind::RestartScheduled => "restartScheduled",
            NotificationKind::RestartSuppressed => "restartSuppressed",
            NotificationKind::SessionDestroyed => "sessionDestroyed",
            NotificationKind::SubscriberPanicked => "subscriberPanicked",
            NotificationKind::SubscriberOverflow => "subscriberOverflow",
        }
    }

    /// Kind announcing entry into `status`.
    pub fn for_status(status: ChannelStatus) -> Self {
        match status {
            ChannelStatus::Connecting => NotificationKind::ChannelConnecting,
            ChannelStatus::Live => NotificationKind::ChannelLive,
            ChannelStatus::Offline => NotificationKind::ChannelOffline,
        }
    }

    const ALL: [NotificationKind; 14] = [
        NotificationKind::Progress,
        NotificationKind::ChannelLive,
        NotificationKind::ChannelOffline,
        NotificationKind::ChannelConnecting,
        NotificationKind::SessionStarted,
        NotificationKind::MountNotFound,
        NotificationKind::EngineFailed,
        NotificationKind::PlaybackRejected,
        NotificationKind::StallDetected,
        NotificationKind::RestartScheduled,
        NotificationKind::RestartSuppressed,
        NotificationKind::SessionDestroyed,
        NotificationKind::SubscriberPanicked,
        NotificationKind::SubscriberOverflow,
    ];
}

impl FromStr for NotificationKind {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or(PlayerError::InvalidArgument {
                what: "known notification name",
            })
    }
}

/// Notification with optional metadata.
#[derive(Clone, Debug)]
pub struct Notification {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Classification.
    pub kind: NotificationKind,
    /// Mount point the notification belongs to (subscriber name for plumbing kinds).
    pub mount: Arc<str>,
    /// Session generation that produced it (`0` when not session-bound).
    pub session: u64,
    /// Human-readable message.
    pub message: Option<Arc<str>>,
    /// Status entered (status kinds only).
    pub status: Option<ChannelStatus>,
    /// Engine payload (`Progress` only).
    pub progress: Option<Progress>,
    /// Interval involved, in milliseconds.
    pub timeout_ms: Option<u32>,
    /// Consecutive restarts of this mount so far.
    pub restarts: Option<u32>,
}

impl Notification {
    /// Creates a notification with the current timestamp and next sequence number.
    pub fn new(kind: NotificationKind, mount: impl Into<Arc<str>>) -> Self {
        Self {
            seq: NOTIFICATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            mount: mount.into(),
            session: 0,
            message: None,
            status: None,
            progress: None,
            timeout_ms: None,
            restarts: None,
        }
    }

    /// Status-change notification carrying `"Channel is <status>"`.
    pub fn status(mount: impl Into<Arc<str>>, status: ChannelStatus) -> Self {
        let mut n = Self::new(NotificationKind::for_status(status), mount)
            .with_message(status.message());
        n.status = Some(status);
        n
    }

    /// Engine progress notification.
    pub fn progress(mount: impl Into<Arc<str>>, progress: Progress) -> Self {
        let mut n = Self::new(NotificationKind::Progress, mount);
        n.progress = Some(progress);
        n
    }

    #[inline]
    pub fn with_session(mut self, session: u64) -> Self {
        self.session = session;
        self
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches an interval (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    #[inline]
    pub fn with_restarts(mut self, n: u32) -> Self {
        self.restarts = Some(n);
        self
    }

    /// Subscriber overflow notification.
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Self::new(NotificationKind::SubscriberOverflow, subscriber)
            .with_message(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Subscriber panic notification.
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Self::new(NotificationKind::SubscriberPanicked, subscriber).with_message(info)
    }

    /// Whether this is one of the four kinds hosts subscribe to by name.
    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(
            self.kind,
            NotificationKind::Progress
                | NotificationKind::ChannelLive
                | NotificationKind::ChannelOffline
                | NotificationKind::ChannelConnecting
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in NotificationKind::ALL {
            assert_eq!(kind.name().parse::<NotificationKind>(), Ok(kind));
        }
        assert!("channelonline".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn sequence_is_monotonic() {
        let a = Notification::new(NotificationKind::Progress, "m");
        let b = Notification::new(NotificationKind::Progress, "m");
        assert!(b.seq > a.seq);
    }

    #[test]
    fn status_notification_carries_status() {
        let n = Notification::status("m", ChannelStatus::Offline);
        assert_eq!(n.kind, NotificationKind::ChannelOffline);
        assert_eq!(n.status, Some(ChannelStatus::Offline));
        assert!(n.is_named());
        assert!(!Notification::new(NotificationKind::SessionStarted, "m").is_named());
    }
}
