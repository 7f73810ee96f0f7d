//! # Runtime configuration.
//!
//! [`Config`] is owned by the [`Registry`](crate::Registry) and shared by every
//! controller it creates. Per-session knobs live in
//! [`SessionOptions`](crate::SessionOptions) instead.
//!
//! ## Sentinel values
//! - `watchdog_timeout = 0s` → twice the session's `progress_update_time`

use std::time::Duration;

use crate::SessionOptions;
use crate::policies::{BackoffPolicy, RestartPolicy};

/// Global configuration for the playback runtime.
///
/// ## Field semantics
/// - `watchdog_timeout`: silence on the media element before demoting to non-live (`0s` = derived)
/// - `retry`: how long to wait for engine progress before rebuilding the session
/// - `restart`: whether a retry expiry may rebuild the session
/// - `resume_delay`: grace period before resuming playback when a tab becomes visible
/// - `bus_capacity`: notification bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Watchdog interval; `Duration::ZERO` derives it from the session cadence.
    pub watchdog_timeout: Duration,

    /// Retry interval policy for the retry scheduler.
    pub retry: BackoffPolicy,

    /// Automatic restart policy.
    pub restart: RestartPolicy,

    /// Delay before a visibility-triggered resume.
    pub resume_delay: Duration,

    /// Capacity of the notification bus.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the watchdog interval for a session.
    ///
    /// ```
    /// use std::time::Duration;
    /// use streamvisor::{Config, SessionOptions};
    ///
    /// let cfg = Config::default();
    /// assert_eq!(cfg.watchdog_for(&SessionOptions::default()), Duration::from_millis(1500));
    /// ```
    #[inline]
    pub fn watchdog_for(&self, options: &SessionOptions) -> Duration {
        if self.watchdog_timeout == Duration::ZERO {
            options.progress_update_time.saturating_mul(2)
        } else {
            self.watchdog_timeout
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `watchdog_timeout = 0s` (1500ms with default session options)
    /// - `retry = BackoffPolicy::default()` (constant 8s)
    /// - `restart = RestartPolicy::Unbounded`
    /// - `resume_delay = 200ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            watchdog_timeout: Duration::ZERO,
            retry: BackoffPolicy::default(),
            restart: RestartPolicy::default(),
            resume_delay: Duration::from_millis(200),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_watchdog_wins_over_cadence() {
        let cfg = Config {
            watchdog_timeout: Duration::from_millis(900),
            ..Config::default()
        };
        let opts = SessionOptions {
            progress_update_time: Duration::from_secs(5),
            ..SessionOptions::default()
        };
        assert_eq!(cfg.watchdog_for(&opts), Duration::from_millis(900));
    }

    #[test]
    fn derived_watchdog_tracks_cadence() {
        let opts = SessionOptions {
            progress_update_time: Duration::from_millis(400),
            ..SessionOptions::default()
        };
        assert_eq!(
            Config::default().watchdog_for(&opts),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn bus_capacity_never_zero() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
