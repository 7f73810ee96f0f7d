//! # Status badge rendering.

use crate::core::status::ChannelStatus;

use super::host::MountRef;

/// Rendered status element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub background: &'static str,
    pub color: &'static str,
}

impl Badge {
    pub fn for_status(status: ChannelStatus) -> Self {
        match status {
            ChannelStatus::Live => Self {
                label: status.label(),
                background: "#ffffff8e",
                color: "#ff0000",
            },
            ChannelStatus::Connecting | ChannelStatus::Offline => Self {
                label: status.label(),
                background: "#0000008e",
                color: "#ffffff",
            },
        }
    }
}

/// Draws the status badge on a mount point. Holds no state of its own.
#[derive(Clone)]
pub struct StatusIndicator {
    mount: MountRef,
}

impl StatusIndicator {
    pub fn new(mount: MountRef) -> Self {
        Self { mount }
    }

    pub fn show(&self, status: ChannelStatus) {
        self.mount.show_status(&Badge::for_status(status));
    }
}
