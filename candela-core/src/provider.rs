use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CandelaError;
use crate::types::{Series, SeriesRequest, SymbolId, Timeframe};

/// Stable identity of a data source, used for provenance tagging and
/// orchestrator configuration (e.g. `"candela-binance"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceKey(&'static str);

impl SourceKey {
    /// Wrap a static source name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The underlying name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Capability trait implemented by every OHLCV data source.
///
/// The orchestrator depends only on this contract; provider quirks (endpoint
/// pinning, identifier resolution, resampling of irregular samples) stay
/// inside the implementations.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// A stable identifier used in provenance tags and priority config.
    fn name(&self) -> &'static str;

    /// Canonical source key constructed from the static name.
    fn key(&self) -> SourceKey {
        SourceKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this source *claims* it can serve the given symbol shape.
    ///
    /// A claim is not a guarantee: the fetch may still fail with
    /// `SymbolNotFound` once the provider-native mapping is attempted.
    fn supports_symbol(&self, symbol: &SymbolId) -> bool;

    /// Exact granularities this source can serve, natively or by
    /// resampling its own raw data.
    fn supported_timeframes(&self) -> &'static [Timeframe];

    /// Fetch a normalized series for the request.
    ///
    /// Implementations tag the returned [`Series`] with their own
    /// [`SourceKey`] and never swallow upstream failures silently.
    ///
    /// # Errors
    /// One of the [`CandelaError`] kinds; the orchestrator maps kinds to its
    /// fallback policy.
    async fn fetch_series(&self, req: &SeriesRequest) -> Result<Series, CandelaError>;
}
