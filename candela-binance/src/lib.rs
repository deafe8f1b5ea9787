//! candela-binance
//!
//! `SeriesProvider` connector for Binance USDT-margined perpetual futures.
//! All traffic is pinned to the futures host; the usual market-catalog
//! discovery call is replaced by a locally-constructed [`ContractSpec`], and
//! requests are paced to the endpoint's documented rate limit.
#![warn(missing_docs)]

/// Contract shape validation in place of market-catalog discovery.
pub mod contract;
/// Wire transport for the futures market-data endpoint.
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use candela_core::provider::{SeriesProvider, SourceKey};
use candela_core::timeseries::ensure_well_formed;
use candela_core::{
    Candle, CandelaError, ProxyConfig, Series, SeriesRequest, SymbolId, Timeframe, since_millis,
};

pub use contract::{ContractKind, ContractSpec};
pub use transport::{FUTURES_API_BASE, HttpTransport, KlineRow, KlineTransport};

/// The kline route rejects limits above this.
const MAX_KLINE_LIMIT: u32 = 1_500;

/// Perpetual-futures connector; the pipeline's primary source.
pub struct BinanceFutures {
    transport: Arc<dyn KlineTransport>,
}

impl BinanceFutures {
    /// Static source key for orchestrator configuration.
    pub const KEY: SourceKey = SourceKey::new("candela-binance");

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
    pub fn with_transport(transport: Arc<dyn KlineTransport>) -> Self {
        Self { transport }
    }

    /// Connectivity probe: fetch the endpoint's clock.
    ///
    /// # Errors
    /// Propagates the transport failure unchanged.
    pub async fn ping(&self) -> Result<DateTime<Utc>, CandelaError> {
        self.transport.server_time().await
    }
}

#[async_trait]
impl SeriesProvider for BinanceFutures {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Binance USDT-M Futures"
    }

    fn supports_symbol(&self, symbol: &SymbolId) -> bool {
        matches!(symbol, SymbolId::Pair { quote, .. } if quote == ContractSpec::QUOTE)
    }

    fn supported_timeframes(&self) -> &'static [Timeframe] {
        &[Timeframe::H1, Timeframe::H4, Timeframe::D1]
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<Series, CandelaError> {
        let spec = ContractSpec::linear_perpetual(&req.symbol)?;
        let since = since_millis(Utc::now(), req.lookback_days);
        let expected = req.lookback_days.saturating_mul(req.timeframe.bars_per_day());
        let limit = expected.clamp(1, MAX_KLINE_LIMIT);

        tracing::debug!(
            market_id = spec.market_id(),
            timeframe = %req.timeframe,
            lookback_days = req.lookback_days,
            "fetching futures klines"
        );
        let rows = self
            .transport
            .klines(spec.market_id(), req.timeframe.as_str(), since, limit)
            .await?;
        if rows.is_empty() {
            return Err(CandelaError::no_data(self.name()));
        }

        let candles: Vec<Candle> = rows
            .into_iter()
            .map(|r| Candle {
                ts: r.open_time,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: Some(r.volume),
            })
            .collect();
        ensure_well_formed(&candles, self.name())?;

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
