//! # Registry: one playback controller per mount point.
//!
//! The registry is an explicit context object owned by the embedding
//! application. It hands out controllers, remembers them by mount id and keeps
//! the per-mount restart counters that outlive individual controllers.
//!
//! ## Architecture
//! ```text
//! get(mount) ──► existing? ──yes──► Arc<PlaybackController>
//!                   └─no──► PlaybackController::new ──► insert ──► Arc<..>
//!
//! controller.destroy() ──► forget(mount, self)   (only if still registered)
//!
//! Bus ──► fan-out listener ──► SubscriberSet ──► StatusTracker, user subscribers
//! ```
//!
//! ## Rules
//! - The registry never stops an engine; controllers release their own
//!   resources before asking to be forgotten.
//! - The registry lock is never held while calling into a controller.
//! - `forget` removes an entry only if it still points at the calling
//!   instance, so a stale controller cannot evict its replacement.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::builder::RegistryBuilder;
use super::config::Config;
use super::controller::PlaybackController;
use crate::engine::EngineProvider;
use crate::error::PlayerError;
use crate::events::{Bus, Notification};
use crate::subscribers::StatusTracker;
use crate::surface::Host;

/// Shared by the registry and every controller it creates.
pub(crate) struct Context {
    pub(crate) cfg: Config,
    pub(crate) host: Arc<dyn Host>,
    pub(crate) engines: Arc<dyn EngineProvider>,
    pub(crate) bus: Bus,
}

/// Per-mount controller registry.
pub struct Registry {
    ctx: Arc<Context>,
    players: Mutex<HashMap<String, Arc<PlaybackController>>>,
    restarts: Mutex<HashMap<String, u32>>,
    tracker: Arc<StatusTracker>,
    runtime_token: CancellationToken,
    me: Weak<Registry>,
}

impl Registry {
    /// Shorthand for [`RegistryBuilder::new`].
    pub fn builder(host: Arc<dyn Host>, engines: Arc<dyn EngineProvider>) -> RegistryBuilder {
        RegistryBuilder::new(host, engines)
    }

    pub(crate) fn new_internal(
        ctx: Arc<Context>,
        tracker: Arc<StatusTracker>,
        runtime_token: CancellationToken,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            ctx,
            players: Mutex::new(HashMap::new()),
            restarts: Mutex::new(HashMap::new()),
            tracker,
            runtime_token,
            me: me.clone(),
        })
    }

    fn players(&self) -> MutexGuard<'_, HashMap<String, Arc<PlaybackController>>> {
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn restart_counts(&self) -> MutexGuard<'_, HashMap<String, u32>> {
        self.restarts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up or creates the controller for `mount_id`.
    ///
    /// An empty `mount_id` returns an arbitrary existing controller (no
    /// ordering guarantee), or `None` when the registry is empty.
    pub fn get(&self, mount_id: &str) -> Option<Arc<PlaybackController>> {
        if mount_id.is_empty() {
            return self.players().values().next().cloned();
        }
        self.get_or_create(mount_id).ok()
    }

    /// Looks up or creates the controller for `mount_id`.
    ///
    /// # Errors
    /// [`PlayerError::InvalidArgument`] if `mount_id` is empty.
    pub fn get_or_create(&self, mount_id: &str) -> Result<Arc<PlaybackController>, PlayerError> {
        let mut players = self.players();
        if let Some(existing) = players.get(mount_id) {
            return Ok(Arc::clone(existing));
        }
        let ctrl = PlaybackController::new(mount_id, Arc::clone(&self.ctx), self.me.clone())?;
        players.insert(mount_id.to_string(), Arc::clone(&ctrl));
        debug!(mount = mount_id, "controller created");
        Ok(ctrl)
    }

    /// Removes the entry for `mount_id` without touching the controller.
    /// Returns whether an entry was removed.
    pub fn destroy(&self, mount_id: &str) -> bool {
        self.players().remove(mount_id).is_some()
    }

    pub(crate) fn forget(&self, mount_id: &str, ctrl: &PlaybackController) {
        let mut players = self.players();
        let registered = players
            .get(mount_id)
            .is_some_and(|existing| std::ptr::eq(Arc::as_ptr(existing), ctrl));
        if registered {
            players.remove(mount_id);
            debug!(mount = mount_id, "controller forgotten");
        }
    }

    pub fn contains(&self, mount_id: &str) -> bool {
        self.players().contains_key(mount_id)
    }

    pub fn len(&self) -> usize {
        self.players().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players().is_empty()
    }

    /// Sorted list of registered mount ids.
    pub fn list(&self) -> Vec<String> {
        let mut mounts: Vec<String> = self.players().keys().cloned().collect();
        mounts.sort_unstable();
        mounts
    }

    /// Automatic restarts for `mount_id` since its last session made progress.
    pub fn restarts(&self, mount_id: &str) -> u32 {
        self.restart_counts().get(mount_id).copied().unwrap_or(0)
    }

    pub(crate) fn note_restart(&self, mount_id: &str) -> u32 {
        let mut counts = self.restart_counts();
        let n = counts.entry(mount_id.to_string()).or_insert(0);
        *n = n.saturating_add(1);
        *n
    }

    pub(crate) fn reset_restarts(&self, mount_id: &str) {
        self.restart_counts().remove(mount_id);
    }

    /// Notification bus shared by all controllers.
    pub fn bus(&self) -> &Bus {
        &self.ctx.bus
    }

    /// Subscribes to every notification of every controller.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.ctx.bus.subscribe()
    }

    /// Latest status per mount, fed from the bus.
    pub fn tracker(&self) -> &Arc<StatusTracker> {
        &self.tracker
    }

    pub fn config(&self) -> &Config {
        &self.ctx.cfg
    }

    /// Destroys every controller and stops the subscriber fan-out.
    pub fn shutdown(&self) {
        let all: Vec<Arc<PlaybackController>> = self.players().values().cloned().collect();
        for ctrl in all {
            ctrl.destroy();
        }
        self.players().clear();
        self.runtime_token.cancel();
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}
