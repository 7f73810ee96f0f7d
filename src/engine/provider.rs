//! # Engine providers.
//!
//! ```text
//! Registry ──► EngineProvider::acquire(surface, source, options)
//!                 ├─ Provided: factory.create(..)
//!                 └─ Fetched:  loader.load() (once, cached) ──► factory.create(..)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::engine::EngineRef;
use crate::SessionOptions;
use crate::error::EngineError;
use crate::surface::SurfaceRef;

/// How a provider obtains the engine capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderStrategy {
    /// Constructor available up front.
    Provided,
    /// Constructor obtained on demand.
    Fetched,
}

/// Synchronous engine constructor.
///
/// Implemented for any `Fn(SurfaceRef, &str, &SessionOptions) -> Result<EngineRef, EngineError>`.
pub trait EngineFactory: Send + Sync + 'static {
    fn create(
        &self,
        surface: SurfaceRef,
        source: &str,
        options: &SessionOptions,
    ) -> Result<EngineRef, EngineError>;
}

impl<F> EngineFactory for F
where
    F: Fn(SurfaceRef, &str, &SessionOptions) -> Result<EngineRef, EngineError>
        + Send
        + Sync
        + 'static,
{
    fn create(
        &self,
        surface: SurfaceRef,
        source: &str,
        options: &SessionOptions,
    ) -> Result<EngineRef, EngineError> {
        self(surface, source, options)
    }
}

/// Capability provider resolved once per registry.
#[async_trait]
pub trait EngineProvider: Send + Sync + 'static {
    /// Creates an engine bound to `surface` and `source`.
    async fn acquire(
        &self,
        surface: SurfaceRef,
        source: &str,
        options: &SessionOptions,
    ) -> Result<EngineRef, EngineError>;

    /// Loader strategy, for diagnostics.
    fn strategy(&self) -> LoaderStrategy;
}

/// Provider over an already-available factory.
pub struct Provided<F> {
    factory: F,
}

impl<F: EngineFactory> Provided<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Convenience: wraps into an `Arc<dyn EngineProvider>`.
    pub fn arc(factory: F) -> Arc<dyn EngineProvider> {
        Arc::new(Self::new(factory))
    }
}

#[async_trait]
impl<F: EngineFactory> EngineProvider for Provided<F> {
    async fn acquire(
        &self,
        surface: SurfaceRef,
        source: &str,
        options: &SessionOptions,
    ) -> Result<EngineRef, EngineError> {
        self.factory.create(surface, source, options)
    }

    fn strategy(&self) -> LoaderStrategy {
        LoaderStrategy::Provided
    }
}

/// Obtains an engine factory on demand.
#[async_trait]
pub trait CapabilityLoader: Send + Sync + 'static {
    async fn load(&self) -> Result<Arc<dyn EngineFactory>, EngineError>;
}

/// Provider that loads the factory on first use and caches it.
pub struct Fetched<L> {
    loader: L,
    factory: OnceCell<Arc<dyn EngineFactory>>,
}

impl<L: CapabilityLoader> Fetched<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            factory: OnceCell::new(),
        }
    }

    pub fn arc(loader: L) -> Arc<dyn EngineProvider> {
        Arc::new(Self::new(loader))
    }

    /// Whether the capability has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.factory.initialized()
    }
}

#[async_trait]
impl<L: CapabilityLoader> EngineProvider for Fetched<L> {
    async fn acquire(
        &self,
        surface: SurfaceRef,
        source: &str,
        options: &SessionOptions,
    ) -> Result<EngineRef, EngineError> {
        let factory = self
            .factory
            .get_or_try_init(|| self.loader.load())
            .await?;
        factory.create(surface, source, options)
    }

    fn strategy(&self) -> LoaderStrategy {
        LoaderStrategy::Fetched
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::testing::{FakeEngine, FakeVideo};

    struct FlakyLoader {
        calls: AtomicU32,
    }

    #[async_trait]
    impl CapabilityLoader for FlakyLoader {
        async fn load(&self) -> Result<Arc<dyn EngineFactory>, EngineError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(EngineError::Unavailable {
                    reason: "script failed to load".into(),
                });
            }
            let factory = |_s: SurfaceRef, _src: &str, _o: &SessionOptions| {
                Ok::<EngineRef, EngineError>(FakeEngine::new())
            };
            Ok(Arc::new(factory))
        }
    }

    #[tokio::test]
    async fn fetched_retries_failed_load_then_caches() {
        let provider = Fetched::new(FlakyLoader {
            calls: AtomicU32::new(0),
        });
        let surface: SurfaceRef = FakeVideo::new();
        let opts = SessionOptions::default();

        let first = provider.acquire(surface.clone(), "ws://x", &opts).await;
        assert!(matches!(first, Err(EngineError::Unavailable { .. })));
        assert!(!provider.is_loaded());

        assert!(provider.acquire(surface.clone(), "ws://x", &opts).await.is_ok());
        assert!(provider.acquire(surface, "ws://x", &opts).await.is_ok());
        assert_eq!(provider.loader.calls.load(Ordering::SeqCst), 2);
        assert_eq!(provider.strategy(), LoaderStrategy::Fetched);
    }

    #[tokio::test]
    async fn provided_surfaces_construct_errors() {
        let provider = Provided::new(|_s: SurfaceRef, _src: &str, _o: &SessionOptions| {
            Err::<EngineRef, _>(EngineError::Construct {
                reason: "codec".into(),
            })
        });
        let res = provider
            .acquire(FakeVideo::new(), "ws://x", &SessionOptions::default())
            .await;
        assert!(matches!(res, Err(EngineError::Construct { .. })));
    }
}
