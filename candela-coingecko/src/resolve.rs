use std::sync::Arc;

use tokio::sync::OnceCell;

use candela_core::CandelaError;

use crate::transport::{ChartTransport, CoinListing};

/// Static ticker → asset-id table for common assets, so the usual case
/// never pays for a catalog download.
pub const STATIC_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("LTC", "litecoin"),
    ("LINK", "chainlink"),
    ("AVAX", "avalanche-2"),
    ("TRX", "tron"),
];

/// Resolves base-asset tickers to provider asset ids.
///
/// Misses on the static table fall back to a one-time catalog listing fetch
/// and a case-insensitive linear scan; the catalog is memoized for the
/// resolver's lifetime.
pub struct AssetResolver {
    transport: Arc<dyn ChartTransport>,
    catalog: OnceCell<Vec<CoinListing>>,
}

impl AssetResolver {
    /// Build a resolver over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ChartTransport>) -> Self {
        Self {
            transport,
            catalog: OnceCell::new(),
        }
    }

    /// Resolve a ticker (case-insensitive) to the provider's asset id.
    ///
    /// # Errors
    /// Returns [`CandelaError::SymbolNotFound`] for tickers absent from both
    /// the static table and the catalog; transport failures pass through
    /// unchanged.
    pub async fn resolve(&self, ticker: &str) -> Result<String, CandelaError> {
        let upper = ticker.to_ascii_uppercase();
        if let Some((_, id)) = STATIC_IDS.iter().find(|(t, _)| *t == upper) {
            return Ok((*id).to_string());
        }

        tracing::debug!(ticker, "ticker not in static table, scanning catalog");
        let catalog = self
            .catalog
            .get_or_try_init(|| self.transport.coins_list())
            .await?;
        catalog
            .iter()
            .find(|c| c.symbol.eq_ignore_ascii_case(ticker))
            .map(|c| c.id.clone())
            .ok_or_else(|| CandelaError::not_found(ticker))
    }
}
