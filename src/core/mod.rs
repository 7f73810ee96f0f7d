//! Runtime core: controllers, their registry and the timers that drive them.
//!
//! The public API from this module is [`Registry`] (built with
//! [`RegistryBuilder`]) and the [`PlaybackController`]s it hands out.
//!
//! Internal modules:
//! - [`controller`]: one playback session per mount point;
//! - [`registry`]: per-mount instances and restart counters;
//! - [`status`]: `Connecting` / `Live` / `Offline` transitions;
//! - [`watchdog`], [`retry`]: single-slot timers over [`timer`];
//! - [`sink`]: session-bound signal delivery;
//! - [`listeners`]: `on` / `off` handlers.

mod builder;
mod config;
mod controller;
mod listeners;
mod registry;
mod retry;
mod sink;
pub(crate) mod status;
mod timer;
mod watchdog;

pub use builder::RegistryBuilder;
pub use config::Config;
pub use controller::{Phase, PlaybackController};
pub use listeners::{Handler, HandlerId};
pub use registry::Registry;
pub use sink::{MediaSignal, SignalSink, Visibility};
pub use status::{ChannelStatus, StatusMachine};
