use std::sync::Arc;
use std::time::Duration;

use candela_core::provider::SeriesProvider;
use candela_core::{CacheConfig, CandelaConfig, CandelaError};

use crate::cache::RetrievalCache;

/// Orchestrator that sequences retrieval across the configured sources.
pub struct Candela {
    pub(crate) primary: Arc<dyn SeriesProvider>,
    pub(crate) secondary: Option<Arc<dyn SeriesProvider>>,
    pub(crate) cfg: CandelaConfig,
    pub(crate) cache: RetrievalCache,
}

/// Builder for constructing a [`Candela`] orchestrator.
pub struct CandelaBuilder {
    primary: Option<Arc<dyn SeriesProvider>>,
    secondary: Option<Arc<dyn SeriesProvider>>,
    cfg: CandelaConfig,
}

impl Default for CandelaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CandelaBuilder {
    /// Create a builder with default configuration: fallback enabled, 5s
    /// per-source timeout, 5-minute result cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            primary: None,
            secondary: None,
            cfg: CandelaConfig::default(),
        }
    }

    /// Register the primary source. Required.
    #[must_use]
    pub fn with_primary(mut self, source: Arc<dyn SeriesProvider>) -> Self {
        self.primary = Some(source);
        self
    }

    /// Register the fallback source, tried only after an eligible primary
    /// failure.
    #[must_use]
    pub fn with_fallback(mut self, source: Arc<dyn SeriesProvider>) -> Self {
        self.secondary = Some(source);
        self
    }

    /// Enable or disable the primary→secondary hop. When disabled, the
    /// primary's failure is surfaced as-is even if a fallback is registered.
    #[must_use]
    pub const fn use_fallback(mut self, yes: bool) -> Self {
        self.cfg.use_fallback = yes;
        self
    }

    /// Set the per-source request timeout. Exceeding it counts as a
    /// transient failure for fallback purposes.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Configure the result cache. A zero TTL disables caching entirely.
    #[must_use]
    pub fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cfg.cache = cfg;
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: CandelaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns [`CandelaError::InvalidArg`] if no primary source was
    /// registered.
    pub fn build(self) -> Result<Candela, CandelaError> {
        let Some(primary) = self.primary else {
            return Err(CandelaError::InvalidArg(
                "no primary source registered; add one via with_primary(...)".to_string(),
            ));
        };
        let cache = RetrievalCache::new(&self.cfg.cache);
        Ok(Candela {
            primary,
            secondary: self.secondary,
            cfg: self.cfg,
            cache,
        })
    }
}

impl Candela {
    /// Start building a new orchestrator.
    #[must_use]
    pub fn builder() -> CandelaBuilder {
        CandelaBuilder::new()
    }

    /// Wrap a source future with the configured timeout, mapping expiry to
    /// the timeout error kind.
    pub(crate) async fn source_call_with_timeout<T, Fut>(
        source_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, CandelaError>
    where
        Fut: core::future::Future<Output = Result<T, CandelaError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(CandelaError::timeout(source_name)))
    }
}
