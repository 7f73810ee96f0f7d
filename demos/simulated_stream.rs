//! # Example: simulated_stream
//!
//! Drives a controller with an in-memory page and a fake engine that stalls.
//!
//! Shows how to:
//! - Implement [`Host`], [`MountPoint`], [`VideoSurface`] and [`MediaEngine`].
//! - Build a [`Registry`] with a [`LogWriter`] subscriber and a custom [`Config`].
//! - Watch the controller go `Connecting → Live → Offline`, restart itself and
//!   come back `Live`.
//!
//! ## Flow
//! ```text
//! setup ──► engine #1 ──► 4 ticks ──► silence
//!              ├─► watchdog (1.5s)  ──► Offline
//!              └─► retry (3s)       ──► restart ──► engine #2 ──► ticks ──► Live
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example simulated_stream --features logging
//! ```

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use streamvisor::{
    Badge, BackoffPolicy, Config, DisplayConfig, EngineError, EngineRef, Host, Layout,
    ListenerId, LogWriter, MediaEngine, MediaSignal, MountPoint, MountRef, Progress, Provided,
    Registry, SessionOptions, SignalSink, Subscribe, SurfaceRef, VideoSurface,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const TICK: Duration = Duration::from_millis(750);

#[derive(Default)]
struct Page {
    video: Mutex<Option<Arc<DemoVideo>>>,
    listeners: AtomicU64,
}

impl Page {
    fn video(&self) -> Option<Arc<DemoVideo>> {
        self.video
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

struct Mount {
    page: Arc<Page>,
}

/// Resolves the single slot of a [`Page`].
struct PageHost(Arc<Page>);

impl Host for PageHost {
    fn find_mount(&self, mount_id: &str) -> Option<MountRef> {
        (mount_id == "camera-1").then(|| {
            let mount: MountRef = Arc::new(Mount {
                page: self.0.clone(),
            });
            mount
        })
    }

    fn watch_visibility(&self, _sink: SignalSink) -> ListenerId {
        ListenerId(self.0.listeners.fetch_add(1, Ordering::Relaxed))
    }

    fn unwatch_visibility(&self, _id: ListenerId) {}
}

impl MountPoint for Mount {
    fn render(&self, _layout: &Layout) -> SurfaceRef {
        let video = Arc::new(DemoVideo::default());
        *self
            .page
            .video
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(video.clone());
        video
    }

    fn show_status(&self, badge: &Badge) {
        println!("[page] badge: {} ({} on {})", badge.label, badge.color, badge.background);
    }

    fn clear(&self) {
        println!("[page] mount cleared");
    }
}

#[derive(Default)]
struct DemoVideo {
    sink: Mutex<Option<SignalSink>>,
}

impl DemoVideo {
    fn emit(&self, signal: MediaSignal) {
        let sink = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(sink) = sink {
            sink.media(signal);
        }
    }
}

impl VideoSurface for DemoVideo {
    fn set_muted(&self, _muted: bool) {}
    fn set_controls(&self, _visible: bool) {}
    fn is_paused(&self) -> bool {
        false
    }
    fn pause(&self) {}
    fn resume(&self) {}
    fn attach(&self, sink: SignalSink) {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }
    fn detach(&self) {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
    fn release(&self) {}
}

/// Delivers `ticks` progress callbacks (forever if `None`), then goes silent.
struct DemoEngine {
    video: Option<Arc<DemoVideo>>,
    ticks: Option<u32>,
    sink: Mutex<Option<SignalSink>>,
    stop: CancellationToken,
}

#[async_trait]
impl MediaEngine for DemoEngine {
    async fn play(&self) -> Result<(), EngineError> {
        let sink = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let (Some(sink), Some(video)) = (sink, self.video.clone()) else {
            return Err(EngineError::Rejected {
                reason: "not attached".into(),
            });
        };
        let ticks = self.ticks;
        let stop = self.stop.clone();
        tokio::spawn(async move {
            let mut sent = 0u32;
            let mut interval = tokio::time::interval(TICK);
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = interval.tick() => {}
                }
                if ticks.is_some_and(|limit| sent >= limit) {
                    continue;
                }
                sent += 1;
                sink.progress(Progress {
                    media_time: TICK * sent,
                    bytes: u64::from(sent) * 64 * 1024,
                });
                video.emit(MediaSignal::Progress);
            }
        });
        Ok(())
    }

    fn pause(&self) {}

    fn stop(&self) {
        self.stop.cancel();
    }

    fn set_progress_sink(&self, sink: Option<SignalSink>) {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = sink;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let page = Arc::new(Page::default());
    let built = Arc::new(AtomicU32::new(0));

    let engines = {
        let page = page.clone();
        Provided::arc(move |_v: SurfaceRef, _src: &str, _o: &SessionOptions| {
            let n = built.fetch_add(1, Ordering::Relaxed);
            let engine: EngineRef = Arc::new(DemoEngine {
                video: page.video(),
                ticks: (n == 0).then_some(4),
                sink: Mutex::new(None),
                stop: CancellationToken::new(),
            });
            Ok::<EngineRef, EngineError>(engine)
        })
    };

    let cfg = Config {
        retry: BackoffPolicy {
            first: Duration::from_secs(3),
            ..BackoffPolicy::default()
        },
        ..Config::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let registry = Registry::builder(Arc::new(PageHost(page)), engines)
        .with_config(cfg)
        .with_subscribers(subs)
        .build();

    let player = registry.get_or_create("camera-1")?;
    player.setup(
        "wss://cams.example/1",
        SessionOptions::default(),
        DisplayConfig::default(),
    )?;

    tokio::time::sleep(Duration::from_secs(10)).await;

    println!(
        "[demo] restarts={} status={:?}",
        registry.restarts("camera-1"),
        registry.tracker().status_of("camera-1").await
    );
    registry.shutdown();
    Ok(())
}
