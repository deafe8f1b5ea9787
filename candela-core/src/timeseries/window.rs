use chrono::{DateTime, Duration, Utc};

use crate::types::Candle;

/// Start instant of a calendar-day lookback window, as milliseconds since
/// the Unix epoch, which is the representation the futures endpoint expects
/// for its `since` parameter.
#[must_use]
pub fn since_millis(now: DateTime<Utc>, lookback_days: u32) -> i64 {
    now.timestamp_millis() - i64::from(lookback_days) * 86_400_000
}

/// Widened window start for providers that are trimmed to "last N records"
/// after the fetch.
///
/// Requests twice the trading-day count in calendar time so weekends and
/// holidays cannot starve the window, then the caller truncates with
/// [`truncate_to_latest`].
#[must_use]
pub fn widened_start(end: DateTime<Utc>, trading_days: u32) -> DateTime<Utc> {
    end - Duration::days(i64::from(trading_days) * 2)
}

/// Keep the most recent `n` bars, sorted ascending, with duplicate
/// timestamps removed. Returns fewer than `n` only when fewer exist.
#[must_use]
pub fn truncate_to_latest(mut candles: Vec<Candle>, n: usize) -> Vec<Candle> {
    candles.sort_by_key(|c| c.ts);
    candles.dedup_by_key(|c| c.ts);
    if candles.len() > n {
        candles.drain(..candles.len() - n);
    }
    candles
}
