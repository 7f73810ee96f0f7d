//! # Watchdog: demotes the status when the media element goes quiet.
//!
//! Armed on `Waiting` and re-armed on every media progress tick; cancelled on
//! `Playing`. On expiry the controller demotes the status to non-live.

use std::time::Duration;

use super::timer::TimerSlot;

/// Stall detector for lower-level media signals.
#[derive(Debug)]
pub(crate) struct Watchdog {
    slot: TimerSlot,
    timeout: Duration,
}

impl Watchdog {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            slot: TimerSlot::new(),
            timeout,
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Applies a new interval (new session); cancels any pending expiry.
    pub(crate) fn reset(&mut self, timeout: Duration) {
        self.slot.cancel();
        self.timeout = timeout;
    }

    /// (Re-)arms the watchdog; `on_expiry` receives the arming ticket.
    pub(crate) fn arm<F>(&mut self, on_expiry: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.slot.arm(self.timeout, on_expiry)
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
