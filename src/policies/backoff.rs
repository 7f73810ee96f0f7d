//! # Retry interval policy.
//!
//! [`BackoffPolicy`] yields how long the retry scheduler waits for forward
//! progress before rebuilding a session. The interval for the `n`-th
//! consecutive restart is `first × factor^n`, clamped to `max`, then jittered.
//!
//! The default is a constant 8s: a fresh session gets the same patience as
//! one that has already been rebuilt a hundred times.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use streamvisor::{BackoffPolicy, JitterPolicy};
//!
//! let retry = BackoffPolicy {
//!     first: Duration::from_secs(8),
//!     max: Duration::from_secs(30),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(retry.delay_for(0), Duration::from_secs(8));
//! assert_eq!(retry.delay_for(1), Duration::from_secs(16));
//! assert_eq!(retry.delay_for(5), Duration::from_secs(30));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry interval policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Interval for a session that has not been restarted yet.
    pub first: Duration,
    /// Upper bound for the interval.
    pub max: Duration,
    /// Growth per consecutive restart (`1.0` = constant).
    pub factor: f64,
    /// Randomization applied after clamping.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// `first = 8s`, `factor = 1.0`, `max = 60s`, no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(8),
            max: Duration::from_secs(60),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Returns the retry interval after `restarts` consecutive restarts.
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn delay_for(&self, restarts: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = restarts.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_constant_eight_seconds() {
        let retry = BackoffPolicy::default();
        for n in [0, 1, 7, 1000] {
            assert_eq!(retry.delay_for(n), Duration::from_secs(8));
        }
    }

    #[test]
    fn growth_is_capped() {
        let retry = BackoffPolicy {
            first: Duration::from_millis(500),
            max: Duration::from_secs(4),
            factor: 2.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(retry.delay_for(2), Duration::from_secs(2));
        assert_eq!(retry.delay_for(3), Duration::from_secs(4));
        assert_eq!(retry.delay_for(u32::MAX), Duration::from_secs(4));
    }

    #[test]
    fn first_above_max_is_clamped() {
        let retry = BackoffPolicy {
            first: Duration::from_secs(90),
            ..BackoffPolicy::default()
        };
        assert_eq!(retry.delay_for(0), Duration::from_secs(60));
    }

    #[test]
    fn jitter_never_exceeds_base() {
        let retry = BackoffPolicy {
            jitter: JitterPolicy::Full,
            ..BackoffPolicy::default()
        };
        for n in 0..50 {
            assert!(retry.delay_for(n) <= Duration::from_secs(8));
        }
    }
}
