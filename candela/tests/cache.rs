use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use candela::{
    CacheConfig, Candela, CandelaError, Series, SeriesProvider, SeriesRequest, SymbolId, Timeframe,
};
use candela_mock::MockProvider;

/// Counts how often the inner source is actually invoked.
struct CountingProvider {
    inner: MockProvider,
    count: Arc<AtomicUsize>,
}

impl CountingProvider {
    fn new(count: Arc<AtomicUsize>) -> Self {
        Self {
            inner: MockProvider::serving("counting"),
            count,
        }
    }
}

#[async_trait]
impl SeriesProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn supports_symbol(&self, symbol: &SymbolId) -> bool {
        self.inner.supports_symbol(symbol)
    }

    fn supported_timeframes(&self) -> &'static [Timeframe] {
        self.inner.supported_timeframes()
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<Series, CandelaError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_series(req).await
    }
}

fn cache_cfg(ttl_ms: u64) -> CacheConfig {
    CacheConfig {
        ttl: Duration::from_millis(ttl_ms),
        capacity: 16,
    }
}

#[tokio::test]
async fn repeated_requests_hit_the_cache() {
    let count = Arc::new(AtomicUsize::new(0));
    let candela = Candela::builder()
        .with_primary(Arc::new(CountingProvider::new(count.clone())))
        .build()
        .unwrap();

    let first = candela
        .get_series("BTC/USDT", Timeframe::H1, 3)
        .await
        .unwrap();
    let second = candela
        .get_series("BTC/USDT", Timeframe::H1, 3)
        .await
        .unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    // The cached snapshot is shared, not refetched.
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn distinct_request_inputs_miss_the_cache() {
    let count = Arc::new(AtomicUsize::new(0));
    let candela = Candela::builder()
        .with_primary(Arc::new(CountingProvider::new(count.clone())))
        .build()
        .unwrap();

    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 3).await;
    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 5).await;
    let _ = candela.get_series("BTC/USDT", Timeframe::H4, 3).await;
    let _ = candela.get_series("ETH/USDT", Timeframe::H1, 3).await;

    assert_eq!(count.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn ttl_expiry_causes_refetch() {
    let count = Arc::new(AtomicUsize::new(0));
    let candela = Candela::builder()
        .with_primary(Arc::new(CountingProvider::new(count.clone())))
        .cache(cache_cfg(50))
        .build()
        .unwrap();

    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 3).await;
    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 3).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 3).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_ttl_disables_caching() {
    let count = Arc::new(AtomicUsize::new(0));
    let candela = Candela::builder()
        .with_primary(Arc::new(CountingProvider::new(count.clone())))
        .cache(cache_cfg(0))
        .build()
        .unwrap();

    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 3).await;
    let _ = candela.get_series("BTC/USDT", Timeframe::H1, 3).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_are_not_cached() {
    struct FlakyOnce {
        count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SeriesProvider for FlakyOnce {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn supports_symbol(&self, _symbol: &SymbolId) -> bool {
            true
        }
        fn supported_timeframes(&self) -> &'static [Timeframe] {
            &[Timeframe::H1]
        }
        async fn fetch_series(&self, req: &SeriesRequest) -> Result<Series, CandelaError> {
            if self.count.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CandelaError::transient("flaky", "first call fails"))
            } else {
                MockProvider::serving("flaky").fetch_series(req).await
            }
        }
    }

    let count = Arc::new(AtomicUsize::new(0));
    let candela = Candela::builder()
        .with_primary(Arc::new(FlakyOnce {
            count: count.clone(),
        }))
        .use_fallback(false)
        .build()
        .unwrap();

    assert!(candela.get_series("BTC/USDT", Timeframe::H1, 1).await.is_err());
    assert!(candela.get_series("BTC/USDT", Timeframe::H1, 1).await.is_ok());
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
