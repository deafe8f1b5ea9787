use std::sync::Arc;

use moka::future::Cache;

use candela_core::{CacheConfig, Series, SeriesRequest, SymbolId, Timeframe};

/// Identity of one retrieval: request inputs plus the provider-selection
/// input that changes which sources may answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    symbol: SymbolId,
    timeframe: Timeframe,
    lookback_days: u32,
    use_fallback: bool,
}

impl CacheKey {
    pub(crate) fn new(req: &SeriesRequest, use_fallback: bool) -> Self {
        Self {
            symbol: req.symbol.clone(),
            timeframe: req.timeframe,
            lookback_days: req.lookback_days,
            use_fallback,
        }
    }
}

/// Short-lived, read-through result cache.
///
/// Concurrent misses for one key may each run the full retrieval; fetches
/// are idempotent and side-effect-free, so deduplicating them is an
/// efficiency concern, not a correctness one. A zero TTL disables caching.
pub(crate) struct RetrievalCache {
    inner: Option<Cache<CacheKey, Arc<Series>>>,
}

impl RetrievalCache {
    pub(crate) fn new(cfg: &CacheConfig) -> Self {
        let inner = if cfg.ttl.is_zero() {
            None
        } else {
            Some(
                Cache::builder()
                    .max_capacity(cfg.capacity)
                    .time_to_live(cfg.ttl)
                    .build(),
            )
        };
        Self { inner }
    }

    pub(crate) async fn get(&self, key: &CacheKey) -> Option<Arc<Series>> {
        match &self.inner {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    pub(crate) async fn insert(&self, key: CacheKey, series: Arc<Series>) {
        if let Some(cache) = &self.inner {
            cache.insert(key, series).await;
        }
    }
}
