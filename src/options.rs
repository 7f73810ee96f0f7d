//! # Per-session options.
//!
//! [`SessionOptions`] is handed to the media engine; [`DisplayConfig`] shapes the
//! presentation surface. Both are immutable for the lifetime of one session and
//! are captured verbatim when the controller restarts itself.
//!
//! Hosts that receive loosely-typed option bags (e.g. from a page script) can
//! deserialize them directly: missing keys fall back to the defaults, so a bag
//! only needs to name what it overrides.
//!
//! ```rust
//! use std::time::Duration;
//! use streamvisor::{Budget, SessionOptions};
//!
//! let opts: SessionOptions = serde_json::from_str(r#"{ "progressUpdateTime": 500 }"#).unwrap();
//! assert_eq!(opts.progress_update_time, Duration::from_millis(500));
//! assert_eq!(opts.connection_retries, Budget::Unbounded);
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default cadence of engine progress callbacks.
pub const DEFAULT_PROGRESS_UPDATE: Duration = Duration::from_millis(750);

/// A count limit that may be unbounded.
///
/// Serialized as `null` (unbounded) or a non-negative integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Budget {
    /// No limit.
    #[default]
    Unbounded,
    /// At most `n`.
    Limited(u32),
}

impl From<Option<u32>> for Budget {
    fn from(v: Option<u32>) -> Self {
        v.map_or(Budget::Unbounded, Budget::Limited)
    }
}

impl From<Budget> for Option<u32> {
    fn from(b: Budget) -> Self {
        match b {
            Budget::Unbounded => None,
            Budget::Limited(n) => Some(n),
        }
    }
}

/// Options passed through to the media engine.
///
/// The controller reads only `progress_update_time` (it sizes the derived
/// watchdog). Both budgets are enforced by the engine, not by the controller;
/// automatic restarts are bounded by [`RestartPolicy`](crate::RestartPolicy).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    /// How often the engine should report progress.
    #[serde(with = "millis")]
    pub progress_update_time: Duration,
    /// Transport-level reconnection attempts the engine may make on its own.
    pub connection_retries: Budget,
    /// Decode/transport errors the engine tolerates before stopping.
    pub errors_before_stop: Budget,
}

impl Default for SessionOptions {
    /// `progress_update_time = 750ms`, both budgets unbounded.
    fn default() -> Self {
        Self {
            progress_update_time: DEFAULT_PROGRESS_UPDATE,
            connection_retries: Budget::Unbounded,
            errors_before_stop: Budget::Unbounded,
        }
    }
}

/// Presentation settings for the mount point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show native playback controls on the video surface.
    pub controls: bool,
    /// Explicit size; `None` renders a responsive 16:9 box.
    pub size: Option<Size>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            controls: true,
            size: None,
        }
    }
}

/// Explicit container size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

/// A CSS length: either a pixel count or a verbatim CSS value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Css(String),
}

impl Default for Dimension {
    /// `100%`.
    fn default() -> Self {
        Dimension::Css("100%".to_string())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(n) => write!(f, "{n}px"),
            Dimension::Css(s) => f.write_str(s),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bags_merge_to_defaults() {
        let opts: SessionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SessionOptions::default());

        let display: DisplayConfig = serde_json::from_str("{}").unwrap();
        assert!(display.controls);
        assert!(display.size.is_none());
    }

    #[test]
    fn budgets_accept_null_and_numbers() {
        let opts: SessionOptions =
            serde_json::from_str(r#"{ "connectionRetries": 3, "errorsBeforeStop": null }"#)
                .unwrap();
        assert_eq!(opts.connection_retries, Budget::Limited(3));
        assert_eq!(opts.errors_before_stop, Budget::Unbounded);
    }

    #[test]
    fn dimensions_render_as_css() {
        let display: DisplayConfig = serde_json::from_str(
            r#"{ "controls": false, "size": { "width": 640, "height": "50vh" } }"#,
        )
        .unwrap();
        let size = display.size.unwrap();
        assert_eq!(size.width.to_string(), "640px");
        assert_eq!(size.height.to_string(), "50vh");
        assert!(!display.controls);
    }

    #[test]
    fn missing_dimension_defaults_to_full() {
        let size: Size = serde_json::from_str(r#"{ "width": 320 }"#).unwrap();
        assert_eq!(size.height.to_string(), "100%");
    }
}
