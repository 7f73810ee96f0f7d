//! # Presentation surface.
//!
//! The host page owns the DOM; the controller only sees it through three
//! traits:
//! - [`Host`]: resolves mount points and reports page visibility.
//! - [`MountPoint`]: receives the rendered [`Layout`] and the status [`Badge`].
//! - [`VideoSurface`]: the media element the engine renders into.
//!
//! [`StatusIndicator`] turns a [`ChannelStatus`](crate::ChannelStatus) into a badge.

mod host;
mod indicator;
mod layout;

pub use host::{Host, ListenerId, MountPoint, MountRef, SurfaceRef, VideoSurface};
pub use indicator::{Badge, StatusIndicator};
pub use layout::{Layout, StyleMap};
