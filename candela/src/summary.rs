use std::fmt::Write as _;

use candela_core::Series;

/// Render the most recent `bars` of a series as an aligned text table plus
/// the latest close price.
///
/// This is the only payload the advisory layer consumes; it needs no
/// knowledge of provenance or resampling internals.
#[must_use]
pub fn render(series: &Series, bars: usize) -> String {
    let shown = series.candles.len().min(bars);
    let tail = &series.candles[series.candles.len() - shown..];

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} - last {} of {} bars",
        series.symbol,
        series.timeframe,
        shown,
        series.candles.len()
    );
    let _ = writeln!(
        out,
        "{:<17} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "timestamp", "open", "high", "low", "close", "volume"
    );
    for c in tail {
        let ts = c.ts.format("%Y-%m-%d %H:%M").to_string();
        let volume = c.volume.map_or_else(|| "-".to_string(), |v| v.to_string());
        let _ = writeln!(
            out,
            "{:<17} {:>12} {:>12} {:>12} {:>12} {:>14}",
            ts,
            c.open.to_string(),
            c.high.to_string(),
            c.low.to_string(),
            c.close.to_string(),
            volume
        );
    }
    if let Some(close) = series.latest_close() {
        let _ = writeln!(out, "latest close: {close}");
    }
    out
}
