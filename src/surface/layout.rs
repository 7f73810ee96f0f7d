//! # Layout of the injected elements.

use crate::options::{DisplayConfig, Size};

/// Ordered CSS declarations.
pub type StyleMap = Vec<(&'static str, String)>;

/// Class added to the mount point while the widget is rendered.
pub const CONTAINER_CLASS: &str = "streamvisor-container";
/// Class of the status element.
pub const STATUS_CLASS: &str = "streamvisor-status";
/// Class of the video element.
pub const VIDEO_CLASS: &str = "streamvisor-video";

/// Styles for the container, the video element and the status badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub container_class: &'static str,
    pub status_class: &'static str,
    pub video_class: &'static str,
    pub container: StyleMap,
    pub video: StyleMap,
    pub status: StyleMap,
}

impl Layout {
    /// Computes the layout for a display configuration.
    ///
    /// ```
    /// use streamvisor::{DisplayConfig, Layout};
    ///
    /// let layout = Layout::for_display(&DisplayConfig::default());
    /// assert_eq!(layout.container_style("padding-top"), Some("56.25%"));
    /// ```
    pub fn for_display(display: &DisplayConfig) -> Self {
        let mut container: StyleMap = vec![
            ("position", "relative".into()),
            ("overflow", "hidden".into()),
            ("background-color", "#000".into()),
        ];
        match &display.size {
            None => {
                container.push(("width", "100%".into()));
                container.push(("padding-top", "56.25%".into()));
            }
            Some(Size { width, height }) => {
                container.push(("width", width.to_string()));
                container.push(("height", height.to_string()));
            }
        }

        let video = vec![
            ("position", "absolute".into()),
            ("top", "0".into()),
            ("left", "0".into()),
            ("width", "100%".into()),
            ("height", "100%".into()),
            ("border", "none".into()),
        ];

        let status = vec![
            ("position", "absolute".into()),
            ("top", "10px".into()),
            ("right", "10px".into()),
            ("z-index", "9999".into()),
            ("padding", "3px 6px".into()),
            ("border-radius", "4px".into()),
            ("font-family", "Arial, sans-serif".into()),
            ("font-size", "12px".into()),
            ("font-weight", "bold".into()),
        ];

        Self {
            container_class: CONTAINER_CLASS,
            status_class: STATUS_CLASS,
            video_class: VIDEO_CLASS,
            container,
            video,
            status,
        }
    }

    pub fn container_style(&self, prop: &str) -> Option<&str> {
        lookup(&self.container, prop)
    }

    pub fn video_style(&self, prop: &str) -> Option<&str> {
        lookup(&self.video, prop)
    }
}

fn lookup<'a>(styles: &'a StyleMap, prop: &str) -> Option<&'a str> {
    styles
        .iter()
        .rev()
        .find(|(k, _)| *k == prop)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Dimension;

    #[test]
    fn explicit_size_replaces_aspect_box() {
        let display = DisplayConfig {
            controls: true,
            size: Some(Size {
                width: Dimension::Pixels(640),
                height: Dimension::Css("360px".into()),
            }),
        };
        let layout = Layout::for_display(&display);
        assert_eq!(layout.container_style("width"), Some("640px"));
        assert_eq!(layout.container_style("height"), Some("360px"));
        assert_eq!(layout.container_style("padding-top"), None);
    }

    #[test]
    fn video_fills_container() {
        let layout = Layout::for_display(&DisplayConfig::default());
        assert_eq!(layout.video_style("position"), Some("absolute"));
        assert_eq!(layout.video_style("width"), Some("100%"));
        assert_eq!(layout.container_class, CONTAINER_CLASS);
        assert_eq!(layout.video_class, VIDEO_CLASS);
        assert_eq!(layout.status_class, STATUS_CLASS);
    }
}
