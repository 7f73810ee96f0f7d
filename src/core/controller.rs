//! # PlaybackController: one playback session per mount point.
//!
//! ```text
//! setup(source) ──► Mounting ──(mount missing)──► Uninitialized (inert)
//!                      │
//!                      ├─(engine failed)──► Degraded: status Connecting, awaits restart()
//!                      ▼
//!                   Playing: muted, controls, Connecting, play()
//!                      │
//!   engine progress ───┼─► playback_started, `progress`, retry re-armed
//!   media Progress ────┼─► Live (once started), watchdog re-armed
//!   media Waiting ─────┼─► watchdog armed
//!   media Playing ─────┼─► watchdog + retry cancelled
//!   watchdog expiry ───┼─► Offline / Connecting
//!   retry expiry ──────┴─► restart(): destroy ─► registry.get(mount) ─► setup(same params)
//! ```
//!
//! ## Rules
//! - Every session has a process-wide unique number. Timers, asynchronous
//!   `play()` outcomes, engine acquisition and [`SignalSink`] calls carry the
//!   session they were created for and are ignored once it is no longer current.
//! - State is guarded by one mutex. Notifications are queued while it is held
//!   and delivered (bus, then `on` handlers) after it is released, so handlers
//!   may call back into the controller.
//! - Calls that may make a collaborator emit signals synchronously
//!   (installing the sink, `play`, `pause`, `stop`, `resume`, teardown) are
//!   made without the lock.
//! - Lock order is controller, then registry. The registry never calls into a
//!   controller while holding its own lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, error, warn};

use super::listeners::{Handler, HandlerId, Listeners};
use super::registry::{Context, Registry};
use super::retry::RetryScheduler;
use super::sink::{MediaSignal, SignalSink, Visibility};
use super::status::{ChannelStatus, StatusMachine};
use super::timer::TimerSlot;
use super::watchdog::Watchdog;
use crate::engine::{EngineRef, Progress};
use crate::error::{EngineError, PlayerError};
use crate::events::{Notification, NotificationKind};
use crate::options::{DisplayConfig, SessionOptions};
use crate::surface::{Host, Layout, ListenerId, MountRef, StatusIndicator, SurfaceRef};

static SESSION_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_session() -> u64 {
    SESSION_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Lifecycle phase of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created by the registry, never set up (or the mount point was missing).
    Uninitialized,
    /// Mount resolved, waiting for the engine.
    Mounting,
    /// Engine could not be obtained; status is non-live until a restart.
    Degraded,
    /// Engine attached and driven by the controller.
    Playing,
    /// Torn down. Terminal.
    Destroyed,
}

struct Inner {
    phase: Phase,
    session: u64,

    source: Option<Arc<str>>,
    options: SessionOptions,
    display: DisplayConfig,

    mount: Option<MountRef>,
    video: Option<SurfaceRef>,
    indicator: Option<StatusIndicator>,
    engine: Option<EngineRef>,

    status: StatusMachine,
    watchdog: Watchdog,
    retry: RetryScheduler,
    resume: TimerSlot,
    was_visibly_playing: bool,

    engine_sink: bool,
    media_sink: bool,
    visibility: Option<ListenerId>,
    handlers: Listeners,

    outbox: Vec<Notification>,
}

impl Inner {
    fn new(watchdog: Watchdog) -> Self {
        Self {
            phase: Phase::Uninitialized,
            session: 0,
            source: None,
            options: SessionOptions::default(),
            display: DisplayConfig::default(),
            mount: None,
            video: None,
            indicator: None,
            engine: None,
            status: StatusMachine::new(),
            watchdog,
            retry: RetryScheduler::new(),
            resume: TimerSlot::new(),
            was_visibly_playing: false,
            engine_sink: false,
            media_sink: false,
            visibility: None,
            handlers: Listeners::default(),
            outbox: Vec::new(),
        }
    }

    /// Signals are only honoured for the running session.
    fn is_current(&self, session: u64) -> bool {
        self.session == session && self.phase == Phase::Playing
    }

    /// Steps 1 to 4 of teardown that need the lock: flags, timers, ownership.
    /// External calls happen in [`Detached::release`].
    fn detach(&mut self) -> Detached {
        let engine = self.engine.take();
        let detached = Detached {
            engine_sink: std::mem::take(&mut self.engine_sink),
            media_sink: std::mem::take(&mut self.media_sink),
            visibility: self.visibility.take(),
            engine,
            video: self.video.take(),
            mount: self.mount.take(),
        };

        self.watchdog.cancel();
        self.retry.cancel();
        self.resume.cancel();

        self.indicator = None;
        self.status.clear();
        self.was_visibly_playing = false;
        detached
    }
}

/// Resources taken out of a session, released outside the lock.
struct Detached {
    engine_sink: bool,
    media_sink: bool,
    visibility: Option<ListenerId>,
    engine: Option<EngineRef>,
    video: Option<SurfaceRef>,
    mount: Option<MountRef>,
}

impl Detached {
    fn release(self, host: &dyn Host) {
        // subscriptions
        if self.engine_sink {
            if let Some(engine) = &self.engine {
                engine.set_progress_sink(None);
            }
        }
        if self.media_sink {
            if let Some(video) = &self.video {
                video.detach();
            }
        }
        if let Some(id) = self.visibility {
            host.unwatch_visibility(id);
        }

        // engine
        if let Some(engine) = &self.engine {
            release_engine(engine);
        }

        // presentation
        if let Some(mount) = &self.mount {
            mount.clear();
        }
        if let Some(video) = &self.video {
            video.release();
        }
    }
}

fn release_engine(engine: &EngineRef) {
    engine.stop();
    if let Some(transport) = engine.transport() {
        transport.destroy();
    }
}

/// Playback controller bound to one mount point.
///
/// Obtained from [`Registry::get`]; never constructed directly. Cheap to share
/// (`Arc`); all methods take `&self`.
pub struct PlaybackController {
    mount_id: Arc<str>,
    ctx: Arc<Context>,
    registry: Weak<Registry>,
    me: Weak<PlaybackController>,
    inner: Mutex<Inner>,
}

impl PlaybackController {
    pub(crate) fn new(
        mount_id: &str,
        ctx: Arc<Context>,
        registry: Weak<Registry>,
    ) -> Result<Arc<Self>, PlayerError> {
        if mount_id.is_empty() {
            return Err(PlayerError::InvalidArgument { what: "mount id" });
        }
        let watchdog = Watchdog::new(ctx.cfg.watchdog_for(&SessionOptions::default()));
        Ok(Arc::new_cyclic(|me| Self {
            mount_id: Arc::from(mount_id),
            ctx,
            registry,
            me: me.clone(),
            inner: Mutex::new(Inner::new(watchdog)),
        }))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Binds the controller to `source` and starts a session.
    ///
    /// Only an empty `source` is an error; a missing mount point or a failing
    /// engine is logged, notified and absorbed. Calling `setup` again replaces
    /// the running session. On a destroyed controller it does nothing.
    pub fn setup(
        &self,
        source: &str,
        options: SessionOptions,
        display: DisplayConfig,
    ) -> Result<(), PlayerError> {
        if source.is_empty() {
            return Err(PlayerError::InvalidArgument {
                what: "stream source",
            });
        }

        let previous = {
            let mut inner = self.lock();
            match inner.phase {
                Phase::Destroyed => {
                    warn!(mount = %self.mount_id, "setup on a destroyed controller ignored");
                    return Ok(());
                }
                Phase::Uninitialized => None,
                _ => Some(inner.detach()),
            }
        };
        if let Some(previous) = previous {
            previous.release(self.ctx.host.as_ref());
        }

        let mut inner = self.lock();
        if inner.phase == Phase::Destroyed {
            return Ok(());
        }
        inner.session = next_session();
        let session = inner.session;
        inner.source = Some(Arc::from(source));
        let watchdog = self.ctx.cfg.watchdog_for(&options);
        inner.watchdog.reset(watchdog);
        inner.options = options;
        inner.display = display;
        inner.phase = Phase::Mounting;

        let Some(mount) = self.ctx.host.find_mount(&self.mount_id) else {
            let err = PlayerError::MountNotFound {
                mount_id: self.mount_id.to_string(),
            };
            error!(mount = %self.mount_id, session, error = %err, "cannot set up player");
            inner.phase = Phase::Uninitialized;
            let n = Notification::new(NotificationKind::MountNotFound, self.mount_id.clone())
                .with_message(err.as_message());
            self.notify(&mut inner, n);
            self.flush(inner);
            return Ok(());
        };

        let video = mount.render(&Layout::for_display(&inner.display));
        inner.indicator = Some(StatusIndicator::new(mount.clone()));
        inner.mount = Some(mount);
        inner.video = Some(video.clone());
        let options = inner.options.clone();
        drop(inner);

        debug!(mount = %self.mount_id, session, source, "acquiring engine");
        let engines = Arc::clone(&self.ctx.engines);
        let source = source.to_string();
        let me = self.me.clone();
        tokio::spawn(async move {
            let acquired = engines.acquire(video, &source, &options).await;
            match me.upgrade() {
                Some(ctrl) => ctrl.engine_ready(session, acquired),
                None => {
                    if let Ok(engine) = acquired {
                        release_engine(&engine);
                    }
                }
            }
        });
        Ok(())
    }

    fn engine_ready(&self, session: u64, acquired: Result<EngineRef, EngineError>) {
        let mut inner = self.lock();
        if inner.session != session || inner.phase != Phase::Mounting {
            drop(inner);
            if let Ok(engine) = acquired {
                release_engine(&engine);
            }
            return;
        }

        let engine = match acquired {
            Ok(engine) => engine,
            Err(e) => {
                let err = PlayerError::from(e);
                error!(mount = %self.mount_id, session, error = %err, "engine unavailable");
                inner.phase = Phase::Degraded;
                let n = Notification::new(NotificationKind::EngineFailed, self.mount_id.clone())
                    .with_message(err.as_message());
                self.notify(&mut inner, n);
                self.demote(&mut inner);
                self.flush(inner);
                return;
            }
        };

        let video = inner.video.clone();
        let controls = inner.display.controls;
        inner.media_sink = video.is_some();
        inner.engine_sink = true;
        inner.engine = Some(engine.clone());
        inner.status.begin_session();
        inner.phase = Phase::Playing;

        debug!(mount = %self.mount_id, session, "session started");
        let n = Notification::new(NotificationKind::SessionStarted, self.mount_id.clone());
        self.notify(&mut inner, n);
        self.demote(&mut inner);
        self.flush(inner);

        // Collaborators may report through the sink before these calls return.
        let sink = SignalSink::new(self.me.clone(), session);
        if let Some(video) = &video {
            video.set_muted(true);
            video.set_controls(controls);
            video.attach(sink.clone());
        }
        engine.set_progress_sink(Some(sink.clone()));
        let watch = self.ctx.host.watch_visibility(sink);

        let mut inner = self.lock();
        if !inner.is_current(session) {
            drop(inner);
            // Torn down while attaching: undo the late subscriptions.
            self.ctx.host.unwatch_visibility(watch);
            engine.set_progress_sink(None);
            if let Some(video) = &video {
                video.detach();
            }
            return;
        }
        inner.visibility = Some(watch);
        drop(inner);

        self.play();
    }

    /// Issues `play()` on the engine and arms the retry scheduler.
    pub fn play(&self) {
        let mut inner = self.lock();
        if inner.phase != Phase::Playing {
            return;
        }
        let Some(engine) = inner.engine.clone() else {
            return;
        };
        self.arm_retry(&mut inner);
        let session = inner.session;
        drop(inner);

        let me = self.me.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.play().await {
                if let Some(ctrl) = me.upgrade() {
                    ctrl.play_rejected(session, e);
                }
            }
        });
    }

    fn play_rejected(&self, session: u64, e: EngineError) {
        let mut inner = self.lock();
        if !inner.is_current(session) {
            return;
        }
        let err = PlayerError::from(e);
        warn!(mount = %self.mount_id, session, error = %err, "play rejected");
        self.arm_retry(&mut inner);
        let n = Notification::new(NotificationKind::PlaybackRejected, self.mount_id.clone())
            .with_message(err.as_message());
        self.notify(&mut inner, n);
        let video = inner.video.clone();
        self.flush(inner);

        if let Some(video) = video {
            video.pause();
        }
    }

    /// Pauses the engine. The retry scheduler is cancelled so a paused
    /// session is not restarted.
    pub fn pause(&self) {
        if let Some(engine) = self.quiesce() {
            engine.pause();
        }
    }

    /// Stops the engine. Like [`pause`](Self::pause), cancels the retry scheduler.
    pub fn stop(&self) {
        if let Some(engine) = self.quiesce() {
            engine.stop();
        }
    }

    fn quiesce(&self) -> Option<EngineRef> {
        let mut inner = self.lock();
        let engine = inner.engine.clone()?;
        inner.retry.cancel();
        Some(engine)
    }

    /// Tears this controller down and sets up a fresh one for the same mount
    /// with the same source, options and display.
    ///
    /// Returns the new controller, or `None` if this one was already
    /// destroyed or the registry is gone.
    pub fn restart(&self) -> Option<Arc<PlaybackController>> {
        let (source, options, display) = {
            let inner = self.lock();
            if inner.phase == Phase::Destroyed {
                warn!(mount = %self.mount_id, "restart on a destroyed controller ignored");
                return None;
            }
            (
                inner.source.clone(),
                inner.options.clone(),
                inner.display.clone(),
            )
        };

        warn!(mount = %self.mount_id, "restarting player");
        self.destroy();

        let registry = self.registry.upgrade()?;
        let next = registry.get(&self.mount_id)?;
        if let Some(source) = source {
            if let Err(err) = next.setup(&source, options, display) {
                warn!(mount = %self.mount_id, error = %err, "restart setup failed");
            }
        }
        Some(next)
    }

    /// Tears the session down and removes the controller from the registry.
    ///
    /// Subscriptions are removed first, then timers are cancelled, the engine
    /// and its transport are released, the mount point is cleared and finally
    /// the registry entry is dropped. Idempotent.
    pub fn destroy(&self) {
        let mut inner = self.lock();
        if inner.phase == Phase::Destroyed {
            return;
        }
        let had_session = inner.source.is_some();
        let detached = inner.detach();
        inner.handlers.clear();

        if had_session {
            let n = Notification::new(NotificationKind::SessionDestroyed, self.mount_id.clone());
            self.notify(&mut inner, n);
            debug!(mount = %self.mount_id, session = inner.session, "session destroyed");
        }
        inner.phase = Phase::Destroyed;
        inner.session = next_session();
        self.flush(inner);

        detached.release(self.ctx.host.as_ref());
        if let Some(registry) = self.registry.upgrade() {
            registry.forget(&self.mount_id, self);
        }
    }

    /// Registers a handler for `kind`.
    pub fn on<F>(&self, kind: NotificationKind, handler: F) -> HandlerId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.lock().handlers.add(kind, handler)
    }

    /// Removes a handler registered with [`on`](Self::on). Returns whether it was found.
    pub fn off(&self, kind: NotificationKind, id: HandlerId) -> bool {
        self.lock().handlers.remove(kind, id)
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Current session number (changes on every setup and on destroy).
    pub fn session(&self) -> u64 {
        self.lock().session
    }

    pub fn status(&self) -> Option<ChannelStatus> {
        self.lock().status.status()
    }

    pub fn playback_started(&self) -> bool {
        self.lock().status.playback_started()
    }

    pub fn stream_source(&self) -> Option<String> {
        self.lock().source.as_deref().map(str::to_string)
    }

    pub fn options(&self) -> SessionOptions {
        self.lock().options.clone()
    }

    pub fn display(&self) -> DisplayConfig {
        self.lock().display.clone()
    }

    pub fn has_engine(&self) -> bool {
        self.lock().engine.is_some()
    }

    /// Armed timers (watchdog, retry, visibility resume).
    pub fn pending_timers(&self) -> usize {
        let inner = self.lock();
        [
            inner.watchdog.is_armed(),
            inner.retry.is_armed(),
            inner.resume.is_armed(),
        ]
        .into_iter()
        .filter(|armed| *armed)
        .count()
    }

    /// Sinks handed to collaborators plus `on` handlers.
    pub fn attached_listeners(&self) -> usize {
        let inner = self.lock();
        usize::from(inner.engine_sink)
            + usize::from(inner.media_sink)
            + usize::from(inner.visibility.is_some())
            + inner.handlers.len()
    }

    pub(crate) fn accepts(&self, session: u64) -> bool {
        self.lock().is_current(session)
    }

    pub(crate) fn on_engine_progress(&self, session: u64, progress: Progress) {
        let mut inner = self.lock();
        if !inner.is_current(session) {
            return;
        }
        if inner.status.record_progress() {
            debug!(mount = %self.mount_id, session, "playback started");
            if let Some(registry) = self.registry.upgrade() {
                registry.reset_restarts(&self.mount_id);
            }
        }
        let n = Notification::progress(self.mount_id.clone(), progress);
        self.notify(&mut inner, n);
        self.arm_retry(&mut inner);
        self.flush(inner);
    }

    pub(crate) fn on_media(&self, session: u64, signal: MediaSignal) {
        let mut inner = self.lock();
        if !inner.is_current(session) {
            return;
        }
        match signal {
            MediaSignal::Progress => {
                if !inner.status.playback_started() {
                    return;
                }
                self.arm_watchdog(&mut inner);
                let next = inner.status.media_tick();
                self.apply_status(&mut inner, next);
            }
            MediaSignal::Waiting => self.arm_watchdog(&mut inner),
            MediaSignal::Playing => {
                inner.was_visibly_playing = true;
                inner.watchdog.cancel();
                inner.retry.cancel();
            }
            MediaSignal::Paused => {}
            MediaSignal::Error(message) => {
                warn!(mount = %self.mount_id, session, %message, "media element error");
            }
        }
        self.flush(inner);
    }

    pub(crate) fn on_visibility(&self, session: u64, visibility: Visibility) {
        let mut inner = self.lock();
        if !inner.is_current(session) {
            return;
        }
        let Some(video) = inner.video.clone() else {
            return;
        };
        let paused = video.is_paused();
        match visibility {
            Visibility::Hidden => inner.was_visibly_playing = !paused,
            Visibility::Visible => {
                if inner.status.playback_started() && inner.was_visibly_playing && paused {
                    debug!(mount = %self.mount_id, session, "resuming after tab became visible");
                    let me = self.me.clone();
                    inner.resume.arm(self.ctx.cfg.resume_delay, move |ticket| {
                        if let Some(ctrl) = me.upgrade() {
                            ctrl.resume_due(session, ticket);
                        }
                    });
                }
                inner.was_visibly_playing = !paused;
            }
        }
    }

    fn resume_due(&self, session: u64, ticket: u64) {
        let mut inner = self.lock();
        if !inner.is_current(session) || !inner.resume.fired(ticket) {
            return;
        }
        let video = inner.video.clone();
        drop(inner);
        if let Some(video) = video {
            video.resume();
        }
    }

    fn arm_watchdog(&self, inner: &mut Inner) {
        let me = self.me.clone();
        let session = inner.session;
        inner.watchdog.arm(move |ticket| {
            if let Some(ctrl) = me.upgrade() {
                ctrl.watchdog_expired(session, ticket);
            }
        });
    }

    fn watchdog_expired(&self, session: u64, ticket: u64) {
        let mut inner = self.lock();
        if !inner.is_current(session) || !inner.watchdog.expired(ticket) {
            return;
        }
        let timeout = inner.watchdog.timeout();
        debug!(mount = %self.mount_id, session, ?timeout, "media element went quiet");
        let n = Notification::new(NotificationKind::StallDetected, self.mount_id.clone())
            .with_timeout(timeout);
        self.notify(&mut inner, n);
        self.demote(&mut inner);
        self.flush(inner);
    }

    fn arm_retry(&self, inner: &mut Inner) {
        let restarts = self.restarts();
        let interval = self.ctx.cfg.retry.delay_for(restarts);
        let me = self.me.clone();
        let session = inner.session;
        inner.retry.arm(interval, move |ticket| {
            if let Some(ctrl) = me.upgrade() {
                ctrl.retry_expired(session, ticket);
            }
        });
    }

    fn retry_expired(&self, session: u64, ticket: u64) {
        let mut inner = self.lock();
        if !inner.is_current(session) || !inner.retry.expired(ticket) {
            return;
        }
        let err = PlayerError::StallTimeout {
            timeout: inner.retry.interval(),
        };
        let restarts = self.restarts();

        if !self.ctx.cfg.restart.allows(restarts) {
            warn!(mount = %self.mount_id, session, restarts, error = %err, "restart budget exhausted");
            let n = Notification::new(NotificationKind::RestartSuppressed, self.mount_id.clone())
                .with_message(err.as_message())
                .with_restarts(restarts);
            self.notify(&mut inner, n);
            self.demote(&mut inner);
            self.flush(inner);
            return;
        }

        warn!(mount = %self.mount_id, session, restarts, error = %err, "no progress from engine");
        let n = Notification::new(NotificationKind::RestartScheduled, self.mount_id.clone())
            .with_message(err.as_message())
            .with_timeout(inner.retry.interval())
            .with_restarts(restarts.saturating_add(1));
        self.notify(&mut inner, n);
        self.flush(inner);

        if let Some(registry) = self.registry.upgrade() {
            registry.note_restart(&self.mount_id);
        }
        self.restart();
    }

    fn restarts(&self) -> u32 {
        self.registry
            .upgrade()
            .map_or(0, |registry| registry.restarts(&self.mount_id))
    }

    fn demote(&self, inner: &mut Inner) {
        let next = inner.status.demote();
        self.apply_status(inner, next);
    }

    fn apply_status(&self, inner: &mut Inner, next: Option<ChannelStatus>) {
        let Some(status) = next else {
            return;
        };
        if let Some(indicator) = &inner.indicator {
            indicator.show(status);
        }
        debug!(mount = %self.mount_id, session = inner.session, %status, "status changed");
        let n = Notification::status(self.mount_id.clone(), status);
        self.notify(inner, n);
    }

    fn notify(&self, inner: &mut Inner, n: Notification) {
        let n = n.with_session(inner.session);
        inner.outbox.push(n);
    }

    /// Releases the lock, then publishes queued notifications and runs handlers.
    fn flush(&self, mut inner: MutexGuard<'_, Inner>) {
        if inner.outbox.is_empty() {
            return;
        }
        let outbox = std::mem::take(&mut inner.outbox);
        let deliveries: Vec<(Notification, Vec<Handler>)> = outbox
            .into_iter()
            .map(|n| {
                let handlers = inner.handlers.matching(n.kind);
                (n, handlers)
            })
            .collect();
        drop(inner);

        for (n, handlers) in deliveries {
            self.ctx.bus.publish(n.clone());
            for handler in handlers {
                handler(&n);
            }
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("PlaybackController")
            .field("mount_id", &self.mount_id)
            .field("phase", &inner.phase)
            .field("session", &inner.session)
            .field("status", &inner.status.status())
            .finish()
    }
}
