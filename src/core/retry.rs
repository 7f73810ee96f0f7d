//! # RetryScheduler: rebuilds a session that never makes progress.
//!
//! Armed on every `play()` attempt and re-armed on every engine progress
//! callback. If it expires, the controller performs a full restart (subject
//! to the [`RestartPolicy`](crate::RestartPolicy)).

use std::time::Duration;

use super::timer::TimerSlot;

/// Progress deadline for the high-level engine.
#[derive(Debug, Default)]
pub(crate) struct RetryScheduler {
    slot: TimerSlot,
    interval: Duration,
}

impl RetryScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Interval of the most recent arming.
    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re-)arms the deadline `interval` from now.
    pub(crate) fn arm<F>(&mut self, interval: Duration, on_expiry: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.interval = interval;
        self.slot.arm(interval, on_expiry)
    }

    pub(crate) fn cancel(&mut self) -> bool {
        self.slot.cancel()
    }

    pub(crate) fn expired(&mut self, ticket: u64) -> bool {
        self.slot.fired(ticket)
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.slot.is_armed()
    }
}
