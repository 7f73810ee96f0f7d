use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::config::Config;
use super::registry::{Context, Registry};
use crate::engine::EngineProvider;
use crate::events::Bus;
use crate::subscribers::{StatusTracker, Subscribe, SubscriberSet};
use crate::surface::Host;

/// Builder for a [`Registry`].
pub struct RegistryBuilder {
    cfg: Config,
    host: Arc<dyn Host>,
    engines: Arc<dyn EngineProvider>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RegistryBuilder {
    /// Creates a builder with the default [`Config`].
    pub fn new(host: Arc<dyn Host>, engines: Arc<dyn EngineProvider>) -> Self {
        Self {
            cfg: Config::default(),
            host,
            engines,
            subscribers: Vec::new(),
        }
    }

    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets notification subscribers.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue. A
    /// [`StatusTracker`] is always installed in addition to these.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry and starts the subscriber fan-out.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Arc<Registry> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let tracker = Arc::new(StatusTracker::new());

        let mut subs: Vec<Arc<dyn Subscribe>> = Vec::with_capacity(self.subscribers.len() + 1);
        subs.push(tracker.clone());
        subs.extend(self.subscribers);
        let set = SubscriberSet::new(subs, bus.clone());

        let runtime_token = CancellationToken::new();
        spawn_fanout(&bus, set, runtime_token.clone());

        let ctx = Arc::new(Context {
            cfg: self.cfg,
            host: self.host,
            engines: self.engines,
            bus,
        });
        Registry::new_internal(ctx, tracker, runtime_token)
    }
}

fn spawn_fanout(bus: &Bus, set: SubscriberSet, token: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(n) => set.emit(&n),
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber fan-out lagged");
                        continue;
                    }
                }
            }
        }
        set.shutdown().await;
    });
}
