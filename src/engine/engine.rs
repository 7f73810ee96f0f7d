//! # Engine trait and progress payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::SignalSink;
use crate::error::EngineError;

/// Shared handle to an engine instance.
pub type EngineRef = Arc<dyn MediaEngine>;

/// Payload of an engine progress callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Media time delivered so far.
    pub media_time: Duration,
    /// Bytes received so far.
    pub bytes: u64,
}

/// # Media engine driven by a playback controller.
///
/// Implementations report forward data delivery through the sink installed
/// with [`set_progress_sink`](MediaEngine::set_progress_sink). Calls on a sink
/// from a torn-down session are ignored, but engines should still drop the
/// sink when `None` is installed.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use streamvisor::{EngineError, MediaEngine, SignalSink};
///
/// struct Silent;
///
/// #[async_trait]
/// impl MediaEngine for Silent {
///     async fn play(&self) -> Result<(), EngineError> { Ok(()) }
///     fn pause(&self) {}
///     fn stop(&self) {}
///     fn set_progress_sink(&self, _sink: Option<SignalSink>) {}
/// }
/// ```
#[async_trait]
pub trait MediaEngine: Send + Sync + 'static {
    /// Starts or resumes playback; resolves once the engine accepted the request.
    async fn play(&self) -> Result<(), EngineError>;

    /// Pauses playback.
    fn pause(&self);

    /// Stops playback and closes the stream.
    fn stop(&self);

    /// Installs (`Some`) or removes (`None`) the progress sink.
    fn set_progress_sink(&self, sink: Option<SignalSink>);

    /// Transport sub-resource (e.g. a socket worker) that must be released on teardown.
    fn transport(&self) -> Option<Arc<dyn Transport>> {
        None
    }
}

/// Transport owned by an engine.
pub trait Transport: Send + Sync + 'static {
    /// Releases the transport. Must tolerate repeated calls.
    fn destroy(&self);
}
