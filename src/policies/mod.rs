//! Restart and retry-interval policies.
//!
//! This module groups the knobs that control **whether** a wedged session is
//! rebuilt and **how long** the retry scheduler waits for forward progress.
//!
//! ## Contents
//! - [`RestartPolicy`] whether a retry expiry may rebuild the controller
//! - [`BackoffPolicy`] how the retry interval evolves across consecutive restarts
//! - [`JitterPolicy`]  randomization to keep many widgets from reconnecting in lockstep
//!
//! ## Quick wiring
//! ```text
//! Config { retry: BackoffPolicy, restart: RestartPolicy, .. }
//!      └─► PlaybackController uses:
//!           - retry.delay_for(restarts) when arming the RetryScheduler
//!           - restart.allows(restarts) when the RetryScheduler expires
//! ```
//!
//! ## Defaults
//! - `RestartPolicy::Unbounded` (restart forever).
//! - `BackoffPolicy::default()` → constant 8s, max=60s, jitter=None.

mod backoff;
mod jitter;
mod restart;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use restart::RestartPolicy;
