//! # Media engine capability.
//!
//! The engine is a black box: it owns the transport to the stream origin,
//! buffering and decode, and feeds a [`VideoSurface`](crate::VideoSurface).
//! The controller only drives it through [`MediaEngine`].
//!
//! Engines are obtained through an [`EngineProvider`] resolved once when the
//! registry is built:
//! - [`Provided`]: the engine constructor is already available.
//! - [`Fetched`]: the constructor must first be obtained through a
//!   [`CapabilityLoader`] (downloaded, linked, ...). The loaded capability is
//!   cached; a failed load is retried on the next acquisition.

#[allow(clippy::module_inception)]
mod engine;
mod provider;

pub use engine::{EngineRef, MediaEngine, Progress, Transport};
pub use provider::{
    CapabilityLoader, EngineFactory, EngineProvider, Fetched, LoaderStrategy, Provided,
};
