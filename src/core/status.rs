//! # Channel status state machine.
//!
//! ```text
//!              first media tick after playback started
//!   Connecting ───────────────────────────────────────► Live
//!       ▲                                               │  ▲
//!       │ watchdog (not started)     watchdog (started) ▼  │ media tick
//!       └──────────────────────────                  Offline
//! ```
//!
//! ## Rules
//! - `Connecting` is only reachable while `playback_started == false`.
//! - `Offline` is only reachable once `playback_started == true`.
//! - `playback_started` flips false→true once per session.
//! - Re-entering the current status returns `None`: callers only notify on `Some`.

use std::fmt;

/// Health of the stream as shown to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelStatus {
    /// Session started, no playback observed yet.
    Connecting,
    /// Media is flowing.
    Live,
    /// Playback had started but has stalled.
    Offline,
}

impl ChannelStatus {
    /// Label rendered by the status indicator.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelStatus::Connecting => "Connecting",
            ChannelStatus::Live => "Live",
            ChannelStatus::Offline => "Offline",
        }
    }

    /// Message carried by the status notification.
    pub fn message(&self) -> String {
        format!("Channel is {}", self.label())
    }

    /// Whether this status means media is flowing.
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, ChannelStatus::Live)
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status plus the `playback_started` latch it depends on.
#[derive(Debug, Default, Clone)]
pub struct StatusMachine {
    status: Option<ChannelStatus>,
    playback_started: bool,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status; `None` before the first transition of a session.
    pub fn status(&self) -> Option<ChannelStatus> {
        self.status
    }

    pub fn playback_started(&self) -> bool {
        self.playback_started
    }

    /// Records an engine progress callback.
    ///
    /// Returns `true` only for the first one of the session.
    pub fn record_progress(&mut self) -> bool {
        !std::mem::replace(&mut self.playback_started, true)
    }

    /// Handles a media-element progress tick: promotes to `Live` once started.
    pub fn media_tick(&mut self) -> Option<ChannelStatus> {
        if !self.playback_started {
            return None;
        }
        self.enter(ChannelStatus::Live)
    }

    /// Demotes to `Offline` (started) or `Connecting` (not started).
    pub fn demote(&mut self) -> Option<ChannelStatus> {
        let target = if self.playback_started {
            ChannelStatus::Offline
        } else {
            ChannelStatus::Connecting
        };
        self.enter(target)
    }

    /// Starts a new session: `playback_started = false`, status kept until the next transition.
    pub fn begin_session(&mut self) {
        self.playback_started = false;
    }

    /// Forgets everything (teardown).
    pub fn clear(&mut self) {
        self.status = None;
        self.playback_started = false;
    }

    fn enter(&mut self, next: ChannelStatus) -> Option<ChannelStatus> {
        if self.status == Some(next) {
            return None;
        }
        self.status = Some(next);
        Some(next)
    }
}
