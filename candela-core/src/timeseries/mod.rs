//! Time-series helpers: resampling irregular samples into bars and
//! converting lookback windows into provider-native bounds.

/// Bucketing of samples and candles into fixed-width OHLCV bars.
pub mod resample;
/// Lookback-window arithmetic and truncation.
pub mod window;

use crate::error::CandelaError;
use crate::types::Candle;

/// Check the bar invariants a provider's output must satisfy: strictly
/// increasing timestamps, `low <= min(open, close) <= max(open, close) <=
/// high`, and non-negative volume.
///
/// # Errors
/// Returns [`CandelaError::Protocol`] tagged with `source_name` on the first
/// violation; a provider emitting impossible bars is indistinguishable from a
/// wire-format change and must be noticed quickly.
pub fn ensure_well_formed(candles: &[Candle], source_name: &str) -> Result<(), CandelaError> {
    let mut prev_ts = None;
    for c in candles {
        if let Some(prev) = prev_ts {
            if c.ts <= prev {
                return Err(CandelaError::protocol(
                    source_name,
                    format!("non-increasing timestamp at {}", c.ts),
                ));
            }
        }
        prev_ts = Some(c.ts);

        let max_oc = c.open.max(c.close);
        let min_oc = c.open.min(c.close);
        if c.low > min_oc || c.high < max_oc {
            return Err(CandelaError::protocol(
                source_name,
                format!("OHLC invariant violated at {}", c.ts),
            ));
        }
        if let Some(v) = c.volume {
            if v.is_sign_negative() {
                return Err(CandelaError::protocol(
                    source_name,
                    format!("negative volume at {}", c.ts),
                ));
            }
        }
    }
    Ok(())
}
