//! # Single-slot cancellable timer.
//!
//! [`TimerSlot`] holds at most one pending timer. Arming always cancels the
//! previous one first, so two outstanding timers of the same kind can never
//! race to fire the same transition.
//!
//! ```text
//! arm(d, f) ──► cancel(prev) ──► ticket += 1 ──► spawn { select! { cancelled | sleep(d) → f(ticket) } }
//! ```
//!
//! The callback receives the ticket it was armed with; the owner calls
//! [`TimerSlot::fired`] to check that the firing belongs to the current arming
//! before acting on it.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// At most one pending timer.
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    pending: Option<CancellationToken>,
    ticket: u64,
}

impl TimerSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending timer and arms a new one.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn arm<F>(&mut self, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.ticket = self.ticket.wrapping_add(1);
        let ticket = self.ticket;

        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = time::sleep(delay) => on_fire(ticket),
            }
        });

        self.pending = Some(token);
        ticket
    }

    /// Cancels the pending timer, if any. Returns whether one was pending.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Consumes a firing: returns `true` and disarms if `ticket` is the current arming.
    pub(crate) fn fired(&mut self, ticket: u64) -> bool {
        if self.ticket == ticket && self.pending.is_some() {
            self.pending = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rearm_cancels_previous() {
        let hits = Arc::new(AtomicU64::new(0));
        let mut slot = TimerSlot::new();

        let h = hits.clone();
        slot.arm(Duration::from_millis(100), move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let h = hits.clone();
        slot.arm(Duration::from_millis(100), move |_| {
            h.fetch_add(10, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(150)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let hits = Arc::new(AtomicU64::new(0));
        let mut slot = TimerSlot::new();
        let h = hits.clone();
        slot.arm(Duration::from_millis(50), move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert!(slot.cancel());
        assert!(!slot.cancel());

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!slot.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_ticket_is_rejected() {
        let mut slot = TimerSlot::new();
        let first = slot.arm(Duration::from_secs(1), |_| {});
        let second = slot.arm(Duration::from_secs(1), |_| {});
        assert!(!slot.fired(first));
        assert!(slot.is_armed());
        assert!(slot.fired(second));
        assert!(!slot.is_armed());
    }
}
