use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{Candle, RawSeries, Timeframe};

/// Start of the left-closed bucket containing `ts`, aligned to the
/// granularity's natural epoch boundary (daily buckets start at midnight
/// UTC).
#[must_use]
pub const fn bucket_start(ts: DateTime<Utc>, timeframe: Timeframe) -> Option<DateTime<Utc>> {
    let step = timeframe.seconds();
    let start = ts.timestamp() - ts.timestamp().rem_euclid(step);
    DateTime::from_timestamp(start, 0)
}

struct BucketAgg {
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    vol_sum: Option<Decimal>,
}

impl BucketAgg {
    const fn start(price: Decimal, volume: Option<Decimal>) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            vol_sum: volume,
        }
    }

    fn absorb_price(&mut self, price: Decimal) {
        if price > self.high {
            self.high = price;
        }
        if price < self.low {
            self.low = price;
        }
        self.close = price;
    }

    /// Missing volumes count as zero for summation only; a bucket where every
    /// sample lacked volume stays `None`.
    fn absorb_volume(&mut self, volume: Option<Decimal>) {
        if let Some(v) = volume {
            self.vol_sum = Some(self.vol_sum.unwrap_or(Decimal::ZERO) + v);
        }
    }

    const fn finish(self, ts: DateTime<Utc>) -> Candle {
        Candle {
            ts,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.vol_sum,
        }
    }
}

/// Bucket irregular price/volume samples into fixed-width OHLCV bars.
///
/// Per non-empty bucket: open = first sample in time order, close = last,
/// high/low = max/min, volume = sum (missing volumes contribute nothing).
/// Empty buckets are omitted, so the output is not required to be
/// contiguous. Output bars are ascending by bucket start. Deterministic and
/// idempotent for identical input and granularity.
#[must_use]
pub fn resample_raw(raw: RawSeries, timeframe: Timeframe) -> Vec<Candle> {
    let mut points = raw.points;
    if points.is_empty() {
        return Vec::new();
    }
    points.sort_by_key(|p| p.ts);

    let mut out: Vec<Candle> = Vec::new();
    let mut iter = points.into_iter();
    let Some(first) = iter.find(|p| bucket_start(p.ts, timeframe).is_some()) else {
        return Vec::new();
    };
    let mut cur_bucket = bucket_start(first.ts, timeframe).unwrap();
    let mut agg = BucketAgg::start(first.price, first.volume);

    for p in iter {
        let Some(bucket) = bucket_start(p.ts, timeframe) else {
            continue;
        };
        if bucket == cur_bucket {
            agg.absorb_price(p.price);
            agg.absorb_volume(p.volume);
        } else {
            out.push(agg.finish(cur_bucket));
            cur_bucket = bucket;
            agg = BucketAgg::start(p.price, p.volume);
        }
    }
    out.push(agg.finish(cur_bucket));
    out
}

/// Up-aggregate already-bucketed candles into a coarser (or identical)
/// granularity.
///
/// Open = first open of the bucket, close = last close, high = max high,
/// low = min low, volume = sum of present volumes. Resampling a series at
/// its own granularity reproduces it exactly.
#[must_use]
pub fn resample_candles(mut candles: Vec<Candle>, timeframe: Timeframe) -> Vec<Candle> {
    if candles.is_empty() {
        return candles;
    }
    candles.sort_by_key(|c| c.ts);

    let mut out: Vec<Candle> = Vec::new();
    let mut iter = candles.into_iter();
    let Some(first) = iter.find(|c| bucket_start(c.ts, timeframe).is_some()) else {
        return Vec::new();
    };
    let mut cur_bucket = bucket_start(first.ts, timeframe).unwrap();
    let mut agg = BucketAgg {
        open: first.open,
        high: first.high,
        low: first.low,
        close: first.close,
        vol_sum: first.volume,
    };

    for c in iter {
        let Some(bucket) = bucket_start(c.ts, timeframe) else {
            continue;
        };
        if bucket == cur_bucket {
            if c.high > agg.high {
                agg.high = c.high;
            }
            if c.low < agg.low {
                agg.low = c.low;
            }
            agg.close = c.close;
            agg.absorb_volume(c.volume);
        } else {
            out.push(agg.finish(cur_bucket));
            cur_bucket = bucket;
            agg = BucketAgg {
                open: c.open,
                high: c.high,
                low: c.low,
                close: c.close,
                vol_sum: c.volume,
            };
        }
    }
    out.push(agg.finish(cur_bucket));
    out
}
