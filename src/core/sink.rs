//! # Signal delivery into a controller.
//!
//! A [`SignalSink`] is bound to one controller instance and one session. The
//! engine, the media element and the host hold clones of it; once the session
//! ends (destroy, restart, re-setup) every call on it is ignored, so a late
//! callback from a previous generation can never touch the current one.

use std::fmt;
use std::sync::{Arc, Weak};

use super::controller::PlaybackController;
use crate::engine::Progress;

/// Events of the media element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaSignal {
    /// The element received media data.
    Progress,
    /// Playback stopped because the next frame is not available.
    Waiting,
    /// Playback is actually running.
    Playing,
    /// Playback was paused.
    Paused,
    /// The element reported an error.
    Error(Arc<str>),
}

/// Page visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Session-bound handle for feeding signals to a controller.
#[derive(Clone)]
pub struct SignalSink {
    target: Weak<PlaybackController>,
    session: u64,
}

impl SignalSink {
    pub(crate) fn new(target: Weak<PlaybackController>, session: u64) -> Self {
        Self { target, session }
    }

    /// Session this sink belongs to.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Engine progress callback.
    pub fn progress(&self, progress: Progress) {
        if let Some(ctrl) = self.target.upgrade() {
            ctrl.on_engine_progress(self.session, progress);
        }
    }

    /// Media element event.
    pub fn media(&self, signal: MediaSignal) {
        if let Some(ctrl) = self.target.upgrade() {
            ctrl.on_media(self.session, signal);
        }
    }

    /// Page visibility change.
    pub fn visibility(&self, visibility: Visibility) {
        if let Some(ctrl) = self.target.upgrade() {
            ctrl.on_visibility(self.session, visibility);
        }
    }

    /// Whether signals sent through this sink still reach a running session.
    pub fn is_current(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|ctrl| ctrl.accepts(self.session))
    }
}

impl fmt::Debug for SignalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSink")
            .field("session", &self.session)
            .field("current", &self.is_current())
            .finish()
    }
}
