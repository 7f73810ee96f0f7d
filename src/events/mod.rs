//! Notifications: types and broadcast bus.
//!
//! This module groups the notification **data model** and the **bus** every
//! controller publishes to.
//!
//! ## Contents
//! - [`NotificationKind`], [`Notification`] classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `PlaybackController` (status changes, progress, lifecycle),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the registry's fan-out listener (feeds `SubscriberSet`),
//!   and anyone holding a receiver from [`Registry::subscribe`](crate::Registry::subscribe).
//!
//! Per-controller `on`/`off` handlers are dispatched synchronously by the
//! controller itself and see the same [`Notification`] values.

mod bus;
mod notification;

pub use bus::Bus;
pub use notification::{Notification, NotificationKind};
