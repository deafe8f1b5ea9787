//! candela-core
//!
//! Core types, traits, and utilities shared across the candela ecosystem.
//!
//! - `types`: common data structures (candles, series, requests, symbols).
//! - `provider`: the `SeriesProvider` trait every data source implements.
//! - `symbol`: security code/name resolution for listing-based markets.
//! - `timeseries`: resampling and retrieval-window arithmetic.
//!
//! Providers are async and assume the Tokio ecosystem as the runtime, in line
//! with the connector crates that implement them.
#![warn(missing_docs)]

/// Configuration types consumed by the orchestrator and connectors.
pub mod config;
/// The unified error taxonomy for the workspace.
pub mod error;
/// The `SeriesProvider` contract and source identity.
pub mod provider;
/// Security code/name resolution (the listing-based symbol normalizer).
pub mod symbol;
/// Time-series utilities: resampling and window arithmetic.
pub mod timeseries;
pub mod types;

pub use config::{CacheConfig, CandelaConfig, ProxyConfig};
pub use error::CandelaError;
pub use provider::{SeriesProvider, SourceKey};
pub use symbol::{ResolvedSecurity, SecurityDirectory, SecurityListing};
pub use timeseries::resample::{resample_candles, resample_raw};
pub use timeseries::window::{since_millis, truncate_to_latest, widened_start};
pub use types::*;
