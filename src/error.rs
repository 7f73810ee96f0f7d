//! Error types used by the playback controller, the registry and media engines.
//!
//! - [`PlayerError`]: failures seen by the controller. Only
//!   [`PlayerError::InvalidArgument`] ever crosses the public API; every other
//!   variant is absorbed and turned into a status change or a scheduled restart.
//! - [`EngineError`]: failures reported by an [`EngineProvider`](crate::EngineProvider)
//!   or by [`MediaEngine::play`](crate::MediaEngine::play).
//!
//! Both provide `as_label` (stable snake_case for logs) and `as_message`.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a playback controller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// A required argument (mount id, stream source) was empty or absent.
    #[error("invalid argument: {what} is required")]
    InvalidArgument {
        /// Name of the missing argument.
        what: &'static str,
    },

    /// The mount point could not be resolved by the host.
    #[error("mount point {mount_id:?} not found")]
    MountNotFound {
        /// Identifier that was looked up.
        mount_id: String,
    },

    /// The media engine could not be obtained or constructed.
    #[error("engine initialization failed: {error}")]
    EngineInitFailure {
        /// Underlying engine error message.
        error: String,
    },

    /// The engine rejected a `play()` request.
    #[error("playback rejected: {error}")]
    PlaybackRejected {
        /// Underlying engine error message.
        error: String,
    },

    /// No forward progress was seen within the retry interval.
    #[error("no progress within {timeout:?}")]
    StallTimeout {
        /// Interval that elapsed without progress.
        timeout: Duration,
    },
}

impl PlayerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use streamvisor::PlayerError;
    ///
    /// let err = PlayerError::InvalidArgument { what: "stream source" };
    /// assert_eq!(err.as_label(), "invalid_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PlayerError::InvalidArgument { .. } => "invalid_argument",
            PlayerError::MountNotFound { .. } => "mount_not_found",
            PlayerError::EngineInitFailure { .. } => "engine_init_failure",
            PlayerError::PlaybackRejected { .. } => "playback_rejected",
            PlayerError::StallTimeout { .. } => "stall_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PlayerError::InvalidArgument { what } => format!("missing {what}"),
            PlayerError::MountNotFound { mount_id } => format!("no mount point {mount_id:?}"),
            PlayerError::EngineInitFailure { error } => format!("engine: {error}"),
            PlayerError::PlaybackRejected { error } => format!("play: {error}"),
            PlayerError::StallTimeout { timeout } => format!("stalled for {timeout:?}"),
        }
    }

    /// Whether this error is returned to the caller rather than absorbed.
    ///
    /// ```
    /// use streamvisor::PlayerError;
    ///
    /// assert!(PlayerError::InvalidArgument { what: "mount id" }.is_propagated());
    /// assert!(!PlayerError::PlaybackRejected { error: "autoplay".into() }.is_propagated());
    /// ```
    pub fn is_propagated(&self) -> bool {
        matches!(self, PlayerError::InvalidArgument { .. })
    }
}

/// # Errors reported by media engines and engine providers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine capability could not be obtained (e.g. loader failed).
    #[error("engine capability unavailable: {reason}")]
    Unavailable {
        /// Why the capability is missing.
        reason: String,
    },

    /// The capability exists but constructing an engine failed.
    #[error("engine construction failed: {reason}")]
    Construct {
        /// Construction failure message.
        reason: String,
    },

    /// `play()` was rejected (autoplay policy, aborted load, ...).
    #[error("play rejected: {reason}")]
    Rejected {
        /// Rejection message.
        reason: String,
    },
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::Unavailable { .. } => "engine_unavailable",
            EngineError::Construct { .. } => "engine_construct",
            EngineError::Rejected { .. } => "engine_rejected",
        }
    }
}

impl From<EngineError> for PlayerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unavailable { .. } | EngineError::Construct { .. } => {
                PlayerError::EngineInitFailure {
                    error: err.to_string(),
                }
            }
            EngineError::Rejected { .. } => PlayerError::PlaybackRejected {
                error: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_player_taxonomy() {
        let init: PlayerError = EngineError::Unavailable {
            reason: "loader 404".into(),
        }
        .into();
        assert_eq!(init.as_label(), "engine_init_failure");

        let rejected: PlayerError = EngineError::Rejected {
            reason: "NotAllowedError".into(),
        }
        .into();
        assert_eq!(rejected.as_label(), "playback_rejected");
        assert!(!rejected.is_propagated());
    }

    #[test]
    fn stall_timeout_message_mentions_interval() {
        let err = PlayerError::StallTimeout {
            timeout: Duration::from_secs(8),
        };
        assert_eq!(err.as_message(), "stalled for 8s");
    }
}
