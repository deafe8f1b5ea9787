//! Candela retrieves normalized OHLCV series across multiple market data
//! providers.
//!
//! Overview
//! - One inbound call, [`Candela::get_series`], resolves a free-form symbol,
//!   checks a short-lived result cache, and runs the retrieval sequence.
//! - Providers implement the `candela_core::SeriesProvider` contract; the
//!   orchestrator never touches provider-specific fields.
//! - Retrieval is strictly sequential: the primary source first, then (only
//!   when the failure kind warrants it and fallback is enabled) the
//!   configured fallback source. There is no racing and no loop back to the
//!   primary; a wasted secondary call when the primary would have succeeded
//!   costs more than it saves.
//! - Every returned series carries provenance: which source answered, when,
//!   and whether a fallback occurred.
//!
//! Building an orchestrator over two sources:
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use candela::{Candela, Timeframe};
//! use candela_core::ProxyConfig;
//!
//! let proxy = ProxyConfig::default();
//! let futures = Arc::new(candela_binance::BinanceFutures::new(&proxy, Duration::from_secs(5))?);
//! let index = Arc::new(candela_coingecko::CoinGecko::new(&proxy, Duration::from_secs(5))?);
//!
//! let candela = Candela::builder()
//!     .with_primary(futures)
//!     .with_fallback(index)
//!     .build()?;
//!
//! let series = candela.get_series("BTC/USDT", Timeframe::H1, 3).await?;
//! println!("{}", candela::summary::render(&series, 24));
//! ```
#![warn(missing_docs)]

mod cache;
pub(crate) mod core;
mod router;
/// Plain-text market summary rendering for the advisory layer.
pub mod summary;

pub use core::{Candela, CandelaBuilder};

// Re-export core types for convenience
pub use candela_core::{
    CacheConfig, CandelaConfig, Candle, CandelaError, ProxyConfig, RawPoint, RawSeries,
    ResolvedSecurity, SecurityDirectory, SecurityListing, Series, SeriesRequest, SymbolId,
    Timeframe,
    provider::{SeriesProvider, SourceKey},
};
