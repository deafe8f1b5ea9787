//! candela-coingecko
//!
//! `SeriesProvider` connector for the CoinGecko aggregator. Index prices and
//! volumes arrive as irregular samples; the connector resolves the base
//! ticker to a provider asset id, joins the two sample streams, and
//! resamples them into fixed-interval bars before handing the series to the
//! orchestrator.
#![warn(missing_docs)]

mod join;
/// Ticker → asset-id resolution.
pub mod resolve;
/// Wire transport for the aggregator endpoint.
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use candela_core::provider::{SeriesProvider, SourceKey};
use candela_core::{
    CandelaError, ProxyConfig, Series, SeriesRequest, SymbolId, Timeframe, resample_raw,
};

pub use resolve::{AssetResolver, STATIC_IDS};
pub use transport::{AGGREGATOR_API_BASE, ChartTransport, CoinListing, HttpTransport, MarketChart};

/// Aggregator/index connector; the pipeline's fallback source.
pub struct CoinGecko {
    transport: Arc<dyn ChartTransport>,
    resolver: AssetResolver,
}

impl CoinGecko {
    /// Static source key for orchestrator configuration.
    pub const KEY: SourceKey = SourceKey::new("candela-coingecko");

    /// Build a connector with the production HTTP transport.
    ///
    /// # Errors
    /// Returns [`CandelaError::InvalidArg`] when the HTTP client cannot be
    /// built (e.g. malformed proxy URL).
    pub fn new(proxy: &ProxyConfig, timeout: Duration) -> Result<Self, CandelaError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(
            proxy, timeout,
        )?)))
    }

    /// Build a connector over an explicit transport (tests, custom hosts).
    #[must_use]
    pub fn with_transport(transport: Arc<dyn ChartTransport>) -> Self {
        let resolver = AssetResolver::new(transport.clone());
        Self {
            transport,
            resolver,
        }
    }

    /// Index prices are quoted in fiat; dollar-pegged quotes map onto the
    /// dollar index. Anything else has no index here.
    fn vs_currency(quote: &str) -> Result<&'static str, CandelaError> {
        match quote {
            "USDT" | "USD" => Ok("usd"),
            other => Err(CandelaError::not_found(format!(
                "no index price quoted in {other}"
            ))),
        }
    }
}

#[async_trait]
impl SeriesProvider for CoinGecko {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "CoinGecko"
    }

    fn supports_symbol(&self, symbol: &SymbolId) -> bool {
        matches!(symbol, SymbolId::Pair { quote, .. } if quote == "USDT" || quote == "USD")
    }

    fn supported_timeframes(&self) -> &'static [Timeframe] {
        &[Timeframe::H1, Timeframe::H4, Timeframe::D1]
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<Series, CandelaError> {
        let SymbolId::Pair { base, quote } = &req.symbol else {
            return Err(CandelaError::not_found(req.symbol.to_string()));
        };
        let vs = Self::vs_currency(quote)?;
        let asset_id = self.resolver.resolve(base).await?;

        tracing::debug!(
            asset_id,
            vs_currency = vs,
            days = req.lookback_days,
            "fetching aggregator chart"
        );
        let chart = self
            .transport
            .market_chart(&asset_id, vs, req.lookback_days)
            .await?;
        let raw = join::join_chart(chart)?;
        if raw.is_empty() {
            return Err(CandelaError::no_data(self.name()));
        }

        let candles = resample_raw(raw, req.timeframe);
        Ok(Series {
            symbol: req.symbol.clone(),
            timeframe: req.timeframe,
            lookback_days: req.lookback_days,
            source: self.key(),
            fetched_at: Utc::now(),
            fallback_note: None,
            candles,
        })
    }
}
