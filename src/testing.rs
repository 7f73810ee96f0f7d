//! In-memory collaborators for tests. They record what the controller does to them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::{MediaSignal, SignalSink, Visibility};
use crate::engine::{EngineProvider, EngineRef, LoaderStrategy, MediaEngine, Progress, Transport};
use crate::error::EngineError;
use crate::options::SessionOptions;
use crate::surface::{Badge, Host, Layout, ListenerId, MountPoint, MountRef, SurfaceRef, VideoSurface};

/// Lets spawned tasks run to quiescence. Advances a paused clock by 1ms.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[derive(Default)]
pub(crate) struct FakeHost {
    mounts: Mutex<HashMap<String, Arc<FakeMount>>>,
    watchers: Mutex<HashMap<u64, SignalSink>>,
    next: AtomicU64,
    report_on_watch: Mutex<Option<Visibility>>,
}

impl FakeHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_mount(&self, id: &str) -> Arc<FakeMount> {
        let mount = Arc::new(FakeMount::default());
        self.mounts
            .lock()
            .unwrap()
            .insert(id.to_string(), mount.clone());
        mount
    }

    pub(crate) fn set_visibility(&self, v: Visibility) {
        let sinks: Vec<SignalSink> = self.watchers.lock().unwrap().values().cloned().collect();
        for sink in sinks {
            sink.visibility(v);
        }
    }

    /// Makes `watch_visibility` report `v` through the sink before it returns.
    pub(crate) fn report_on_watch(&self, v: Visibility) {
        *self.report_on_watch.lock().unwrap() = Some(v);
    }

    pub(crate) fn watchers(&self) -> usize {
        self.watchers.lock().unwrap().len()
    }
}

impl Host for FakeHost {
    fn find_mount(&self, mount_id: &str) -> Option<MountRef> {
        let mount: MountRef = self.mounts.lock().unwrap().get(mount_id).cloned()?;
        Some(mount)
    }

    fn watch_visibility(&self, sink: SignalSink) -> ListenerId {
        let current = *self.report_on_watch.lock().unwrap();
        if let Some(v) = current {
            sink.visibility(v);
        }
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        self.watchers.lock().unwrap().insert(id, sink);
        ListenerId(id)
    }

    fn unwatch_visibility(&self, id: ListenerId) {
        self.watchers.lock().unwrap().remove(&id.0);
    }
}

#[derive(Default)]
pub(crate) struct FakeMount {
    layout: Mutex<Option<Layout>>,
    badges: Mutex<Vec<Badge>>,
    video: Mutex<Option<Arc<FakeVideo>>>,
    clears: AtomicU32,
}

impl FakeMount {
    pub(crate) fn video(&self) -> Option<Arc<FakeVideo>> {
        self.video.lock().unwrap().clone()
    }

    pub(crate) fn layout(&self) -> Option<Layout> {
        self.layout.lock().unwrap().clone()
    }

    pub(crate) fn labels(&self) -> Vec<&'static str> {
        self.badges.lock().unwrap().iter().map(|b| b.label).collect()
    }

    pub(crate) fn clears(&self) -> u32 {
        self.clears.load(Ordering::SeqCst)
    }
}

impl MountPoint for FakeMount {
    fn render(&self, layout: &Layout) -> SurfaceRef {
        let video = FakeVideo::new();
        *self.layout.lock().unwrap() = Some(layout.clone());
        *self.video.lock().unwrap() = Some(video.clone());
        video
    }

    fn show_status(&self, badge: &Badge) {
        self.badges.lock().unwrap().push(badge.clone());
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.layout.lock().unwrap() = None;
    }
}

pub(crate) struct FakeVideo {
    muted: AtomicBool,
    controls: AtomicBool,
    paused: AtomicBool,
    pauses: AtomicU32,
    resumes: AtomicU32,
    released: AtomicBool,
    sink: Mutex<Option<SignalSink>>,
}

impl FakeVideo {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            muted: AtomicBool::new(false),
            controls: AtomicBool::new(false),
            paused: AtomicBool::new(true),
            pauses: AtomicU32::new(0),
            resumes: AtomicU32::new(0),
            released: AtomicBool::new(false),
            sink: Mutex::new(None),
        })
    }

    /// Delivers a media event the way the browser would.
    pub(crate) fn emit(&self, signal: MediaSignal) {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink.media(signal);
        }
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub(crate) fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub(crate) fn has_controls(&self) -> bool {
        self.controls.load(Ordering::SeqCst)
    }

    pub(crate) fn pauses(&self) -> u32 {
        self.pauses.load(Ordering::SeqCst)
    }

    pub(crate) fn resumes(&self) -> u32 {
        self.resumes.load(Ordering::SeqCst)
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl VideoSurface for FakeVideo {
    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn set_controls(&self, visible: bool) {
        self.controls.store(visible, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }

    fn attach(&self, sink: SignalSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn detach(&self) {
        *self.sink.lock().unwrap() = None;
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    destroyed: AtomicU32,
}

impl FakeTransport {
    pub(crate) fn destroyed(&self) -> u32 {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl Transport for FakeTransport {
    fn destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct FakeEngine {
    sink: Mutex<Option<SignalSink>>,
    plays: AtomicU32,
    pauses: AtomicU32,
    stops: AtomicU32,
    reject: AtomicBool,
    report_on_attach: AtomicBool,
    transport: Arc<FakeTransport>,
}

impl FakeEngine {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reports forward progress through the installed sink.
    pub(crate) fn progress(&self) {
        if let Some(sink) = self.sink() {
            sink.progress(Progress {
                media_time: Duration::from_millis(500),
                bytes: 4096,
            });
        }
    }

    pub(crate) fn sink(&self) -> Option<SignalSink> {
        self.sink.lock().unwrap().clone()
    }

    pub(crate) fn plays(&self) -> u32 {
        self.plays.load(Ordering::SeqCst)
    }

    pub(crate) fn pauses(&self) -> u32 {
        self.pauses.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }

    pub(crate) fn transport_handle(&self) -> Arc<FakeTransport> {
        self.transport.clone()
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn play(&self) -> Result<(), EngineError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.reject.load(Ordering::SeqCst) {
            return Err(EngineError::Rejected {
                reason: "NotAllowedError".into(),
            });
        }
        Ok(())
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn set_progress_sink(&self, sink: Option<SignalSink>) {
        let attached = sink.is_some();
        *self.sink.lock().unwrap() = sink;
        if attached && self.report_on_attach.load(Ordering::SeqCst) {
            self.progress();
        }
    }

    fn transport(&self) -> Option<Arc<dyn Transport>> {
        let transport: Arc<dyn Transport> = self.transport.clone();
        Some(transport)
    }
}

/// Hands out [`FakeEngine`]s and keeps them for inspection.
#[derive(Default)]
pub(crate) struct FakeProvider {
    engines: Mutex<Vec<Arc<FakeEngine>>>,
    fail: AtomicBool,
    reject_play: AtomicBool,
    report_on_attach: AtomicBool,
}

impl FakeProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn reject_play(&self, reject: bool) {
        self.reject_play.store(reject, Ordering::SeqCst);
    }

    /// Engines handed out from now on replay progress as soon as a sink is installed.
    pub(crate) fn report_on_attach(&self, eager: bool) {
        self.report_on_attach.store(eager, Ordering::SeqCst);
    }

    pub(crate) fn engines(&self) -> Vec<Arc<FakeEngine>> {
        self.engines.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> Option<Arc<FakeEngine>> {
        self.engines.lock().unwrap().last().cloned()
    }

    pub(crate) fn count(&self) -> usize {
        self.engines.lock().unwrap().len()
    }
}

#[async_trait]
impl EngineProvider for FakeProvider {
    async fn acquire(
        &self,
        _surface: SurfaceRef,
        _source: &str,
        _options: &SessionOptions,
    ) -> Result<EngineRef, EngineError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Unavailable {
                reason: "engine script failed to load".into(),
            });
        }
        let engine = FakeEngine::new();
        engine
            .reject
            .store(self.reject_play.load(Ordering::SeqCst), Ordering::SeqCst);
        engine
            .report_on_attach
            .store(self.report_on_attach.load(Ordering::SeqCst), Ordering::SeqCst);
        self.engines.lock().unwrap().push(engine.clone());
        let engine: EngineRef = engine;
        Ok(engine)
    }

    fn strategy(&self) -> LoaderStrategy {
        LoaderStrategy::Provided
    }
}
