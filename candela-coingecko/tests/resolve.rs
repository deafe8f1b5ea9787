use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use candela_coingecko::{AssetResolver, ChartTransport, CoinListing, MarketChart};
use candela_core::CandelaError;

struct CountingCatalog {
    listings: Vec<CoinListing>,
    calls: AtomicUsize,
}

impl CountingCatalog {
    fn new(listings: Vec<CoinListing>) -> Self {
        Self {
            listings,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChartTransport for CountingCatalog {
    async fn coins_list(&self) -> Result<Vec<CoinListing>, CandelaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listings.clone())
    }

    async fn market_chart(
        &self,
        _asset_id: &str,
        _vs_currency: &str,
        _days: u32,
    ) -> Result<MarketChart, CandelaError> {
        unreachable!("resolution tests never fetch charts")
    }
}

fn listing(id: &str, symbol: &str, name: &str) -> CoinListing {
    CoinListing {
        id: id.into(),
        symbol: symbol.into(),
        name: name.into(),
    }
}

#[tokio::test]
async fn static_table_hits_skip_the_catalog() {
    let transport = Arc::new(CountingCatalog::new(vec![]));
    let resolver = AssetResolver::new(transport.clone());

    assert_eq!(resolver.resolve("BTC").await.unwrap(), "bitcoin");
    assert_eq!(resolver.resolve("eth").await.unwrap(), "ethereum");
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn catalog_scan_is_case_insensitive_and_memoized() {
    let transport = Arc::new(CountingCatalog::new(vec![
        listing("pepe", "pepe", "Pepe"),
        listing("wojak-coin", "wojak", "Wojak"),
    ]));
    let resolver = AssetResolver::new(transport.clone());

    assert_eq!(resolver.resolve("WOJAK").await.unwrap(), "wojak-coin");
    assert_eq!(resolver.resolve("Pepe").await.unwrap(), "pepe");
    // Two misses on the static table, one catalog download.
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unresolved_tickers_are_symbol_not_found() {
    let transport = Arc::new(CountingCatalog::new(vec![listing("pepe", "pepe", "Pepe")]));
    let resolver = AssetResolver::new(transport);

    let err = resolver.resolve("NOTACOIN").await.unwrap_err();
    assert!(matches!(err, CandelaError::SymbolNotFound { .. }));
    assert!(!err.triggers_fallback());
}

#[tokio::test]
async fn catalog_transport_failures_pass_through() {
    struct FailingCatalog;

    #[async_trait]
    impl ChartTransport for FailingCatalog {
        async fn coins_list(&self) -> Result<Vec<CoinListing>, CandelaError> {
            Err(CandelaError::transient("candela-coingecko", "timeout"))
        }

        async fn market_chart(
            &self,
            _asset_id: &str,
            _vs_currency: &str,
            _days: u32,
        ) -> Result<MarketChart, CandelaError> {
            unreachable!()
        }
    }

    let resolver = AssetResolver::new(Arc::new(FailingCatalog));
    let err = resolver.resolve("NOTACOIN").await.unwrap_err();
    assert!(matches!(err, CandelaError::Transient { .. }));
}
