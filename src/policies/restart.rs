//! # Restart policy for wedged sessions.
//!
//! [`RestartPolicy`] decides what happens when the retry scheduler expires
//! without having seen forward progress.
//!
//! ```text
//! RestartPolicy::Unbounded         → always rebuild (default)
//! RestartPolicy::Limited { max }   → rebuild until `max` consecutive restarts
//! RestartPolicy::Never             → stay non-live, wait for an explicit restart()
//! ```
//!
//! The counter is kept per mount point by the registry and resets as soon as
//! a session reports progress, so `Limited` bounds *consecutive* failures.

/// Policy controlling automatic restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never restart automatically.
    Never,
    /// Restart after every stall, without limit (default).
    #[default]
    Unbounded,
    /// Restart at most `max` times in a row.
    Limited { max: u32 },
}

impl RestartPolicy {
    /// Returns `true` if another restart is permitted after `restarts` consecutive ones.
    ///
    /// ```
    /// use streamvisor::RestartPolicy;
    ///
    /// let p = RestartPolicy::Limited { max: 2 };
    /// assert!(p.allows(1));
    /// assert!(!p.allows(2));
    /// assert!(RestartPolicy::Unbounded.allows(u32::MAX));
    /// ```
    pub fn allows(&self, restarts: u32) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::Unbounded => true,
            RestartPolicy::Limited { max } => restarts < *max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_forbids_first_restart() {
        assert!(!RestartPolicy::Never.allows(0));
    }

    #[test]
    fn limited_zero_behaves_like_never() {
        assert!(!RestartPolicy::Limited { max: 0 }.allows(0));
    }
}
