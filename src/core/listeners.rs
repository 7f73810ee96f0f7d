//! # Per-controller notification handlers (`on` / `off`).
//!
//! Handlers are invoked synchronously, in registration order, after the
//! controller has released its state lock; a handler may call back into the
//! controller.

use std::sync::Arc;

use crate::events::{Notification, NotificationKind};

/// Notification handler.
pub type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Token returned by `on`, used to `off` the same handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<(NotificationKind, HandlerId, Handler)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: NotificationKind, handler: Handler) -> HandlerId {
        self.next += 1;
        let id = HandlerId(self.next);
        self.entries.push((kind, id, handler));
        id
    }

    pub(crate) fn remove(&mut self, kind: NotificationKind, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, i, _)| !(*k == kind && *i == id));
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn matching(&self, kind: NotificationKind) -> Vec<Handler> {
        self.entries
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, _, h)| Arc::clone(h))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Arc::new(|_n: &Notification| {})
    }

    #[test]
    fn off_requires_matching_kind() {
        let mut l = Listeners::default();
        let id = l.add(NotificationKind::ChannelLive, noop());
        assert!(!l.remove(NotificationKind::ChannelOffline, id));
        assert!(l.remove(NotificationKind::ChannelLive, id));
        assert!(!l.remove(NotificationKind::ChannelLive, id));
        assert_eq!(l.len(), 0);
    }

    #[test]
    fn matching_filters_by_kind() {
        let mut l = Listeners::default();
        l.add(NotificationKind::Progress, noop());
        l.add(NotificationKind::ChannelLive, noop());
        l.add(NotificationKind::Progress, noop());
        assert_eq!(l.matching(NotificationKind::Progress).len(), 2);
        l.clear();
        assert!(l.matching(NotificationKind::Progress).is_empty());
    }
}
