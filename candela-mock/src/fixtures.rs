use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use candela_core::provider::SourceKey;
use candela_core::{Candle, Series, SeriesRequest};

/// Fixed anchor so fixture series are fully deterministic:
/// 2023-11-15 00:00:00 UTC, a day boundary.
const ANCHOR_SECS: i64 = 1_700_006_400;

fn dec(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Deterministic bar ladder: a gentle sawtooth around 100.00 whose OHLC
/// always satisfies the series invariants.
fn candle(i: i64, step_secs: i64) -> Candle {
    let ts = DateTime::from_timestamp(ANCHOR_SECS + i * step_secs, 0)
        .expect("fixture timestamp in range");
    let open = dec(10_000 + (i % 9) * 25);
    let close = dec(10_000 + ((i + 3) % 9) * 25);
    let high = open.max(close) + dec(40);
    let low = open.min(close) - dec(40);
    Candle {
        ts,
        open,
        high,
        low,
        close,
        volume: Some(dec(50_000 + (i % 5) * 1_000)),
    }
}

pub fn series(req: &SeriesRequest, source: SourceKey) -> Series {
    let step_secs = req.timeframe.seconds();
    let count = i64::from(req.lookback_days) * i64::from(req.timeframe.bars_per_day());
    let candles = (0..count).map(|i| candle(i, step_secs)).collect();
    Series {
        symbol: req.symbol.clone(),
        timeframe: req.timeframe,
        lookback_days: req.lookback_days,
        source,
        fetched_at: Utc::now(),
        fallback_note: None,
        candles,
    }
}
