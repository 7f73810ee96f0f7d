//! # streamvisor
//!
//! **Streamvisor** keeps embedded live-video players healthy. It drives a
//! media engine, watches the signals it produces, shows a
//! `Connecting` / `Live` / `Offline` badge and rebuilds the whole playback
//! session when the engine stops making progress.
//!
//! The crate does not decode or transport media. The engine, the page that
//! hosts the player and the video element are collaborators behind traits
//! ([`MediaEngine`], [`Host`], [`MountPoint`], [`VideoSurface`]).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  application
//!      │ get(mount) / setup / play / pause / stop / restart / destroy / on / off
//!      ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Registry (one controller per mount id, restart counters)        │
//! └──────┬──────────────────────────┬────────────────────────────────┘
//!        ▼                          ▼
//! ┌────────────────────┐   ┌────────────────────┐
//! │ PlaybackController │   │ PlaybackController │  ...
//! │  StatusMachine     │   │                    │
//! │  Watchdog          │   │                    │
//! │  RetryScheduler    │   │                    │
//! └─┬───────▲──────────┘   └────────────────────┘
//!   │       │ SignalSink (session-bound)
//!   │       ├── engine progress
//!   │       ├── media element: Progress / Waiting / Playing / Paused / Error
//!   │       └── page visibility
//!   │
//!   ├─► StatusIndicator (badge on the mount point)
//!   ├─► on/off handlers
//!   ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                   Bus (broadcast notifications)                  │
//! │                (capacity: Config::bus_capacity)                  │
//! └─────────────────────────────────┬────────────────────────────────┘
//!                                   ▼
//!                            SubscriberSet
//!                    ┌──────────────┼──────────────┐
//!                    ▼              ▼              ▼
//!              StatusTracker    LogWriter      your Subscribe
//! ```
//!
//! ### Recovery
//! ```text
//! play() ──► RetryScheduler armed (8s)
//!   ├─ engine progress ──► re-armed
//!   ├─ media Playing   ──► cancelled
//!   └─ expiry ──► RestartPolicy allows?
//!                  ├─ yes ──► destroy ──► registry.get(mount) ──► setup(same params)
//!                  └─ no  ──► RestartSuppressed, status non-live, wait for restart()
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------|---------------------------------------------|
//! | **Controllers**   | Per-mount session lifecycle and status.                   | [`Registry`], [`PlaybackController`]        |
//! | **Collaborators** | Engine, host page, mount point and video element.         | [`MediaEngine`], [`EngineProvider`], [`Host`] |
//! | **Notifications** | Named and lifecycle notifications, bus and subscribers.   | [`Notification`], [`Subscribe`]             |
//! | **Policies**      | Retry interval and automatic restart budget.              | [`BackoffPolicy`], [`RestartPolicy`]        |
//! | **Errors**        | Typed errors for controllers and engines.                 | [`PlayerError`], [`EngineError`]            |
//! | **Configuration** | Runtime settings and per-session option bags.             | [`Config`], [`SessionOptions`]              |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that renders notifications through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use streamvisor::{
//!     Badge, DisplayConfig, EngineError, EngineRef, Host, Layout, ListenerId, MediaEngine,
//!     MountPoint, MountRef, Provided, Registry, SessionOptions, SignalSink, SurfaceRef,
//!     VideoSurface,
//! };
//!
//! struct Page;
//! struct Slot;
//! struct Video;
//! struct Engine;
//!
//! impl Host for Page {
//!     fn find_mount(&self, _id: &str) -> Option<MountRef> { Some(Arc::new(Slot)) }
//!     fn watch_visibility(&self, _sink: SignalSink) -> ListenerId { ListenerId(1) }
//!     fn unwatch_visibility(&self, _id: ListenerId) {}
//! }
//!
//! impl MountPoint for Slot {
//!     fn render(&self, _layout: &Layout) -> SurfaceRef { Arc::new(Video) }
//!     fn show_status(&self, badge: &Badge) { println!("badge: {}", badge.label) }
//!     fn clear(&self) {}
//! }
//!
//! impl VideoSurface for Video {
//!     fn set_muted(&self, _muted: bool) {}
//!     fn set_controls(&self, _visible: bool) {}
//!     fn is_paused(&self) -> bool { false }
//!     fn pause(&self) {}
//!     fn resume(&self) {}
//!     fn attach(&self, _sink: SignalSink) {}
//!     fn detach(&self) {}
//!     fn release(&self) {}
//! }
//!
//! #[async_trait]
//! impl MediaEngine for Engine {
//!     async fn play(&self) -> Result<(), EngineError> { Ok(()) }
//!     fn pause(&self) {}
//!     fn stop(&self) {}
//!     fn set_progress_sink(&self, _sink: Option<SignalSink>) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engines = Provided::arc(|_v: SurfaceRef, _src: &str, _o: &SessionOptions| {
//!         Ok::<EngineRef, EngineError>(Arc::new(Engine))
//!     });
//!     let registry = Registry::builder(Arc::new(Page), engines).build();
//!
//!     let player = registry.get_or_create("camera-1")?;
//!     player.setup("wss://cams.example/1", SessionOptions::default(), DisplayConfig::default())?;
//!
//!     registry.shutdown();
//!     Ok(())
//! }
//! ```

mod core;
mod engine;
mod error;
mod events;
mod options;
mod policies;
mod subscribers;
mod surface;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use crate::core::{
    ChannelStatus, Config, Handler, HandlerId, MediaSignal, Phase, PlaybackController, Registry,
    RegistryBuilder, SignalSink, StatusMachine, Visibility,
};
pub use engine::{
    CapabilityLoader, EngineFactory, EngineProvider, EngineRef, Fetched, LoaderStrategy,
    MediaEngine, Progress, Provided, Transport,
};
pub use error::{EngineError, PlayerError};
pub use events::{Bus, Notification, NotificationKind};
pub use options::{Budget, DEFAULT_PROGRESS_UPDATE, Dimension, DisplayConfig, SessionOptions, Size};
pub use policies::{BackoffPolicy, JitterPolicy, RestartPolicy};
pub use subscribers::{StatusTracker, Subscribe, SubscriberSet};
pub use surface::{
    Badge, Host, Layout, ListenerId, MountPoint, MountRef, StatusIndicator, StyleMap, SurfaceRef,
    VideoSurface,
};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
