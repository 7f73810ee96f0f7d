//! # Notification bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] shared by all
//! controllers of one registry.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: a single ring buffer stores recent notifications for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: notifications are lost if nobody is subscribed at send time.

use tokio::sync::broadcast;

use super::notification::Notification;

/// Broadcast channel for notifications.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Notification>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Notification>(capacity.max(1));
        Self { tx }
    }

    /// Publishes a notification to all active receivers.
    pub fn publish(&self, n: Notification) {
        let _ = self.tx.send(n);
    }

    /// Creates a receiver that observes subsequent notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotificationKind;

    #[tokio::test]
    async fn receivers_only_see_later_notifications() {
        let bus = Bus::new(4);
        bus.publish(Notification::new(NotificationKind::Progress, "early"));

        let mut rx = bus.subscribe();
        bus.publish(Notification::new(NotificationKind::ChannelLive, "late"));

        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind, NotificationKind::ChannelLive);
        assert_eq!(&*got.mount, "late");
    }
}
