//! # Notification subscribers.
//!
//! Subscribers observe every notification published on a registry's
//! [`Bus`](crate::Bus), across all mount points and sessions.
//!
//! ## Architecture
//! ```text
//! PlaybackController ── publish(Notification) ──► Bus ──► registry fan-out listener
//!                                                              │
//!                                                              ▼
//!                                                        SubscriberSet
//!                                                   ┌──────────┼──────────┐
//!                                                   ▼          ▼          ▼
//!                                             StatusTracker LogWriter   Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use streamvisor::{Notification, NotificationKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct OfflineAlerts;
//!
//! #[async_trait]
//! impl Subscribe for OfflineAlerts {
//!     async fn on_notification(&self, n: &Notification) {
//!         if n.kind == NotificationKind::ChannelOffline {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "offline-alerts" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;
mod tracker;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
pub use tracker::StatusTracker;
