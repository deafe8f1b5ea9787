//! Common data structures for OHLCV retrieval.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CandelaError;
use crate::provider::SourceKey;

/// Canonical identifier for a tradable instrument.
///
/// Either a `BASE/QUOTE` pair (crypto markets) or a bare numeric security
/// code (listing-based markets). Each provider maps this to its own native
/// identifier; that mapping is provider-specific and may fail with
/// [`CandelaError::SymbolNotFound`], which is distinct from a network failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolId {
    /// A base/quote pair, stored upper-case (e.g. `BTC`/`USDT`).
    Pair {
        /// Base asset ticker.
        base: String,
        /// Quote asset ticker.
        quote: String,
    },
    /// A bare numeric security code (e.g. `600519`).
    Code(String),
}

impl SymbolId {
    /// Parse a free-form user input into a canonical identifier.
    ///
    /// Accepts `base/quote` (case-insensitive) and bare 6-digit numeric
    /// codes. 6-digit codes are accepted speculatively even when unknown;
    /// the provider rejects them at fetch time if invalid.
    ///
    /// # Errors
    /// Returns [`CandelaError::SymbolNotFound`] for anything else.
    pub fn parse(input: &str) -> Result<Self, CandelaError> {
        let trimmed = input.trim();
        if let Some((base, quote)) = trimmed.split_once('/') {
            let base = base.trim();
            let quote = quote.trim();
            let well_formed = |s: &str| !s.is_empty() && s.chars().all(char::is_alphanumeric);
            if well_formed(base) && well_formed(quote) {
                return Ok(Self::pair(base, quote));
            }
            return Err(CandelaError::not_found(trimmed));
        }
        if Self::looks_like_code(trimmed) {
            return Ok(Self::Code(trimmed.to_string()));
        }
        Err(CandelaError::not_found(trimmed))
    }

    /// Build a pair identifier, canonicalizing tickers to upper-case.
    #[must_use]
    pub fn pair(base: &str, quote: &str) -> Self {
        Self::Pair {
            base: base.to_ascii_uppercase(),
            quote: quote.to_ascii_uppercase(),
        }
    }

    /// Whether a string is shaped like a bare security code.
    #[must_use]
    pub fn looks_like_code(s: &str) -> bool {
        s.len() == 6 && s.chars().all(|c| c.is_ascii_digit())
    }

    /// Base ticker for pair identifiers.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        match self {
            Self::Pair { base, .. } => Some(base),
            Self::Code(_) => None,
        }
    }

    /// Quote ticker for pair identifiers.
    #[must_use]
    pub fn quote(&self) -> Option<&str> {
        match self {
            Self::Pair { quote, .. } => Some(quote),
            Self::Code(_) => None,
        }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair { base, quote } => write!(f, "{base}/{quote}"),
            Self::Code(code) => f.write_str(code),
        }
    }
}

/// Fixed bar granularity a series can be requested at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// One-hour bars.
    H1,
    /// Four-hour bars.
    H4,
    /// Daily bars.
    D1,
}

impl Timeframe {
    /// Bucket width in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::H1 => 3_600,
            Self::H4 => 14_400,
            Self::D1 => 86_400,
        }
    }

    /// Bucket width in milliseconds.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.seconds() * 1_000
    }

    /// Number of bars per calendar day at this granularity.
    #[must_use]
    pub const fn bars_per_day(self) -> u32 {
        match self {
            Self::H1 => 24,
            Self::H4 => 6,
            Self::D1 => 1,
        }
    }

    /// Canonical label, matching the inbound request vocabulary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
        }
    }

    /// Parse a canonical label.
    ///
    /// # Errors
    /// Returns [`CandelaError::InvalidArg`] for labels outside `1h`/`4h`/`1d`.
    pub fn parse(s: &str) -> Result<Self, CandelaError> {
        match s {
            "1h" => Ok(Self::H1),
            "4h" => Ok(Self::H4),
            "1d" => Ok(Self::D1),
            other => Err(CandelaError::InvalidArg(format!(
                "unknown timeframe: {other}"
            ))),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed-interval OHLCV bar.
///
/// Invariants: `low <= min(open, close)`, `max(open, close) <= high`, and
/// `volume >= 0` when present. Within a series, timestamps strictly increase
/// and sit on bucket boundaries of the declared timeframe; buckets with no
/// trades are dropped, never zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start instant (UTC).
    pub ts: DateTime<Utc>,
    /// First traded price in the bucket.
    pub open: Decimal,
    /// Highest traded price in the bucket.
    pub high: Decimal,
    /// Lowest traded price in the bucket.
    pub low: Decimal,
    /// Last traded price in the bucket.
    pub close: Decimal,
    /// Total traded volume; `None` when the provider reports none.
    pub volume: Option<Decimal>,
}

/// One irregular sample from an aggregator-style provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Sample instant (UTC); providers emit these at uneven spacing.
    pub ts: DateTime<Utc>,
    /// Index price at the sample instant.
    pub price: Decimal,
    /// Volume joined onto this sample, when a nearby volume sample exists.
    pub volume: Option<Decimal>,
}

/// Irregular price/volume samples awaiting resampling into bars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSeries {
    /// Samples in ascending timestamp order.
    pub points: Vec<RawPoint>,
}

impl RawSeries {
    /// Wrap a sample vector.
    #[must_use]
    pub const fn new(points: Vec<RawPoint>) -> Self {
        Self { points }
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A normalized retrieval request: what to fetch, at which granularity,
/// reaching how far back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesRequest {
    /// Instrument to fetch.
    pub symbol: SymbolId,
    /// Requested bar granularity.
    pub timeframe: Timeframe,
    /// Lookback window, in days (trading days for listing-based providers).
    pub lookback_days: u32,
}

/// An ordered OHLCV series for one (symbol, timeframe) pair.
///
/// Constructed fresh per retrieval and treated as an immutable snapshot
/// afterwards; provenance records which source ultimately answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Instrument the series describes.
    pub symbol: SymbolId,
    /// Bar granularity of `candles`.
    pub timeframe: Timeframe,
    /// Lookback the caller requested, in days.
    pub lookback_days: u32,
    /// Which source produced the data.
    pub source: SourceKey,
    /// When the retrieval completed.
    pub fetched_at: DateTime<Utc>,
    /// Informational note set when a fallback source served the request.
    pub fallback_note: Option<String>,
    /// Bars in ascending timestamp order.
    pub candles: Vec<Candle>,
}

impl Series {
    /// Close price of the most recent bar, if any.
    #[must_use]
    pub fn latest_close(&self) -> Option<Decimal> {
        self.candles.last().map(|c| c.close)
    }
}
