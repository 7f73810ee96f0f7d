//! # Host-side collaborator traits.
//!
//! ```text
//! Host::find_mount(id) ──► MountPoint::render(layout) ──► VideoSurface
//!                              │                             │
//!                              └─ show_status(badge)         └─ attach(sink): media events
//! Host::watch_visibility(sink) ──► Visibility::{Hidden, Visible}
//! ```

use std::sync::Arc;

use crate::core::SignalSink;

use super::indicator::Badge;
use super::layout::Layout;

pub type MountRef = Arc<dyn MountPoint>;
pub type SurfaceRef = Arc<dyn VideoSurface>;

/// Handle for a visibility subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The embedding page.
pub trait Host: Send + Sync + 'static {
    /// Resolves a mount point by id.
    fn find_mount(&self, mount_id: &str) -> Option<MountRef>;

    /// Starts delivering visibility changes to `sink`.
    fn watch_visibility(&self, sink: SignalSink) -> ListenerId;

    /// Stops a visibility subscription. Unknown ids are ignored.
    fn unwatch_visibility(&self, id: ListenerId);
}

/// Container element the widget renders into.
pub trait MountPoint: Send + Sync + 'static {
    /// Injects the status and video elements, applies `layout`, returns the video element.
    fn render(&self, layout: &Layout) -> SurfaceRef;

    /// Updates the status element.
    fn show_status(&self, badge: &Badge);

    /// Removes everything `render` injected.
    fn clear(&self);
}

/// Media element.
pub trait VideoSurface: Send + Sync + 'static {
    fn set_muted(&self, muted: bool);

    fn set_controls(&self, visible: bool);

    fn is_paused(&self) -> bool;

    fn pause(&self);

    /// Resumes playback of the element itself (not the engine).
    fn resume(&self);

    /// Starts delivering media events (`progress`, `waiting`, `playing`, ...) to `sink`.
    fn attach(&self, sink: SignalSink);

    /// Stops delivering media events.
    fn detach(&self);

    /// Drops the media source.
    fn release(&self);
}
