//! # Latest status per mount point.
//!
//! [`StatusTracker`] keeps the most recent [`ChannelStatus`] of every mount,
//! using notification sequence numbers to discard out-of-order deliveries.
//!
//! ## Rules
//! - Only status notifications and `SessionDestroyed` change state.
//! - Notifications with `seq <= last_seq` for a mount are rejected (stale).
//! - `SessionDestroyed` forgets the mount's status.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Subscribe;
use crate::core::status::ChannelStatus;
use crate::events::{Notification, NotificationKind};

#[derive(Debug, Clone, Copy)]
struct MountState {
    last_seq: u64,
    status: Option<ChannelStatus>,
}

/// Thread-safe tracker of channel status per mount.
#[derive(Default)]
pub struct StatusTracker {
    state: RwLock<HashMap<String, MountState>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a notification. Returns `true` if the tracked status changed.
    pub async fn update(&self, n: &Notification) -> bool {
        let next = match n.kind {
            NotificationKind::SessionDestroyed => None,
            _ => match n.status {
                Some(s) => Some(s),
                None => return false,
            },
        };

        let mut state = self.state.write().await;
        let entry = state.entry(n.mount.to_string()).or_insert(MountState {
            last_seq: 0,
            status: None,
        });
        if n.seq <= entry.last_seq {
            return false;
        }
        entry.last_seq = n.seq;
        let changed = entry.status != next;
        entry.status = next;
        changed
    }

    /// Latest known status of `mount`.
    pub async fn status_of(&self, mount: &str) -> Option<ChannelStatus> {
        self.state.read().await.get(mount).and_then(|s| s.status)
    }

    /// Sorted `(mount, status)` pairs for every mount with a known status.
    pub async fn snapshot(&self) -> Vec<(String, ChannelStatus)> {
        let state = self.state.read().await;
        let mut out: Vec<(String, ChannelStatus)> = state
            .iter()
            .filter_map(|(m, s)| s.status.map(|st| (m.clone(), st)))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Sorted list of mounts currently `Live`.
    pub async fn live_mounts(&self) -> Vec<String> {
        self.snapshot()
            .await
            .into_iter()
            .filter(|(_, s)| s.is_live())
            .map(|(m, _)| m)
            .collect()
    }
}

#[async_trait]
impl Subscribe for StatusTracker {
    async fn on_notification(&self, n: &Notification) {
        self.update(n).await;
    }

    fn name(&self) -> &'static str {
        "status-tracker"
    }

    fn queue_capacity(&self) -> usize {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stale_notifications_are_rejected() {
        let tracker = StatusTracker::new();
        let older = Notification::status("a", ChannelStatus::Connecting);
        let newer = Notification::status("a", ChannelStatus::Live);

        assert!(tracker.update(&newer).await);
        assert!(!tracker.update(&older).await);
        assert_eq!(tracker.status_of("a").await, Some(ChannelStatus::Live));
    }

    #[tokio::test]
    async fn live_mounts_are_sorted_and_filtered() {
        let tracker = StatusTracker::new();
        tracker.update(&Notification::status("b", ChannelStatus::Live)).await;
        tracker.update(&Notification::status("a", ChannelStatus::Live)).await;
        tracker.update(&Notification::status("c", ChannelStatus::Offline)).await;
        assert_eq!(tracker.live_mounts().await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn destroy_forgets_mount() {
        let tracker = StatusTracker::new();
        tracker.update(&Notification::status("a", ChannelStatus::Live)).await;
        tracker
            .update(&Notification::new(NotificationKind::SessionDestroyed, "a"))
            .await;
        assert_eq!(tracker.status_of("a").await, None);
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn progress_does_not_touch_state() {
        let tracker = StatusTracker::new();
        let n = Notification::progress("a", Default::default());
        assert!(!tracker.update(&n).await);
    }
}
