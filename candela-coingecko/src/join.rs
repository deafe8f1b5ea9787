use chrono::DateTime;
use rust_decimal::Decimal;

use candela_core::{CandelaError, RawPoint, RawSeries};

use crate::transport::{MarketChart, SOURCE};

/// Fallback join tolerance when the chart has too few samples to estimate
/// its own cadence.
const DEFAULT_TOLERANCE_MS: i64 = 60_000;

fn to_decimal(v: f64, what: &str) -> Result<Decimal, CandelaError> {
    Decimal::from_f64_retain(v)
        .ok_or_else(|| CandelaError::protocol(SOURCE, format!("non-finite {what}: {v}")))
}

fn to_samples(pairs: Vec<(f64, f64)>, what: &str) -> Result<Vec<(i64, Decimal)>, CandelaError> {
    let mut out = Vec::with_capacity(pairs.len());
    for (ts_ms, value) in pairs {
        if !ts_ms.is_finite() {
            return Err(CandelaError::protocol(
                SOURCE,
                format!("non-finite {what} timestamp"),
            ));
        }
        out.push((ts_ms as i64, to_decimal(value, what)?));
    }
    out.sort_by_key(|(ts, _)| *ts);
    Ok(out)
}

/// Half the median gap between consecutive price samples: a volume sample
/// further away than this belongs to a different bucket of the provider's
/// own cadence.
fn join_tolerance_ms(prices: &[(i64, Decimal)]) -> i64 {
    if prices.len() < 2 {
        return DEFAULT_TOLERANCE_MS;
    }
    let mut gaps: Vec<i64> = prices.windows(2).map(|w| w[1].0 - w[0].0).collect();
    gaps.sort_unstable();
    (gaps[gaps.len() / 2] / 2).max(1)
}

/// Left-join the chart's volume samples onto its price samples by nearest
/// timestamp. Price samples without a volume sample within tolerance keep
/// `volume: None`: absent, not zero.
///
/// # Errors
/// Returns [`CandelaError::Protocol`] for non-finite values, which the
/// aggregator never emits unless its wire format changed.
pub fn join_chart(chart: MarketChart) -> Result<RawSeries, CandelaError> {
    let prices = to_samples(chart.prices, "price")?;
    let volumes = to_samples(chart.total_volumes, "volume")?;
    let tolerance = join_tolerance_ms(&prices);

    let mut points = Vec::with_capacity(prices.len());
    let mut j = 0usize;
    for (ts_ms, price) in prices {
        while j + 1 < volumes.len() && (volumes[j + 1].0 - ts_ms).abs() <= (volumes[j].0 - ts_ms).abs()
        {
            j += 1;
        }
        let volume = volumes
            .get(j)
            .filter(|(vts, _)| (vts - ts_ms).abs() <= tolerance)
            .map(|(_, v)| *v);
        let ts = DateTime::from_timestamp_millis(ts_ms)
            .ok_or_else(|| CandelaError::protocol(SOURCE, "sample timestamp out of range"))?;
        points.push(RawPoint { ts, price, volume });
    }
    Ok(RawSeries::new(points))
}
