//! # Subscriber trait.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `SubscriberPanicked`)
//!
//! ## Overflow behavior
//! 1) The new notification is **dropped** for this subscriber only.
//! 2) A `SubscriberOverflow` notification is published.
//! 3) Other subscribers are unaffected.

use async_trait::async_trait;

use crate::events::Notification;

/// Notification subscriber.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single notification, in FIFO order per subscriber.
    async fn on_notification(&self, notification: &Notification);

    /// Name used in overflow/panic notifications.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to at least 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
