//! # Jitter for retry intervals.
//!
//! A page with many widgets that lose the same origin at the same moment
//! would otherwise rebuild all of them on the same tick.
//!
//! - [`JitterPolicy::None`] exact interval
//! - [`JitterPolicy::Full`] random in `[0, interval]`
//! - [`JitterPolicy::Equal`] `interval/2 + random[0, interval/2]`

use rand::Rng;
use std::time::Duration;

/// Randomization applied to a computed retry interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the interval as computed.
    #[default]
    None,
    /// Uniform in `[0, interval]`.
    Full,
    /// Uniform in `[interval/2, interval]`.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to `interval`.
    pub fn apply(&self, interval: Duration) -> Duration {
        let ms = interval.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        match self {
            JitterPolicy::None => interval,
            JitterPolicy::Full => Duration::from_millis(rng.random_range(0..=ms)),
            JitterPolicy::Equal => {
                let half = ms / 2;
                Duration::from_millis(half + rng.random_range(0..=ms - half))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(8000);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn equal_stays_in_upper_half() {
        let d = Duration::from_millis(1001);
        for _ in 0..200 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_millis(500), "{j:?}");
            assert!(j <= d, "{j:?}");
        }
    }

    #[test]
    fn full_never_exceeds_interval() {
        let d = Duration::from_millis(300);
        for _ in 0..200 {
            assert!(JitterPolicy::Full.apply(d) <= d);
        }
    }

    #[test]
    fn zero_interval_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
    }
}
