//! # SubscriberSet: non-blocking fan-out over multiple subscribers.
//!
//! ## What it guarantees
//! - `emit(&Notification)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and reported on the bus.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow.
//!
//! ```text
//!    emit(&Notification)
//!        ├────────► [queue S1] ─► worker S1 ─► on_notification()
//!        └────────► [queue SN] ─► worker SN ─► on_notification()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use super::Subscribe;
use crate::events::{Bus, Notification, NotificationKind};

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Notification>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, rx) = mpsc::channel::<Arc<Notification>>(sub.queue_capacity().max(1));
            workers.push(tokio::spawn(run_worker(sub, rx, bus.clone())));
            channels.push(SubscriberChannel { name, sender: tx });
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one notification to all subscribers (non-blocking).
    pub fn emit(&self, notification: &Notification) {
        // No overflow-on-overflow.
        let is_overflow = notification.kind == NotificationKind::SubscriberOverflow;

        let n = Arc::new(notification.clone());
        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&n)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow {
                tracing::warn!(subscriber = channel.name, reason, "notification dropped");
                self.bus
                    .publish(Notification::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

async fn run_worker(
    sub: Arc<dyn Subscribe>,
    mut rx: mpsc::Receiver<Arc<Notification>>,
    bus: Bus,
) {
    while let Some(n) = rx.recv().await {
        let fut = sub.on_notification(n.as_ref());
        if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = panic.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            tracing::error!(subscriber = sub.name(), %info, "subscriber panicked");
            bus.publish(Notification::subscriber_panicked(sub.name(), info));
        }
    }
}
