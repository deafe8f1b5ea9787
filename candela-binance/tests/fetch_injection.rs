use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use candela_binance::{BinanceFutures, KlineRow, KlineTransport};
use candela_core::provider::SeriesProvider;
use candela_core::{CandelaError, SeriesRequest, SymbolId, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

fn dec(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn row(sec: i64, px_cents: i64) -> KlineRow {
    let px = dec(px_cents);
    KlineRow {
        open_time: DateTime::from_timestamp(sec, 0).unwrap(),
        open: px,
        high: px + dec(50),
        low: px - dec(50),
        close: px + dec(10),
        volume: dec(12_345),
    }
}

/// Scripted transport that records the last kline query.
struct ScriptedTransport {
    rows: Vec<KlineRow>,
    seen: Mutex<Option<(String, String, i64, u32)>>,
}

impl ScriptedTransport {
    fn new(rows: Vec<KlineRow>) -> Self {
        Self {
            rows,
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl KlineTransport for ScriptedTransport {
    async fn server_time(&self) -> Result<DateTime<Utc>, CandelaError> {
        Ok(Utc::now())
    }

    async fn klines(
        &self,
        market_id: &str,
        interval: &str,
        start_ms: i64,
        limit: u32,
    ) -> Result<Vec<KlineRow>, CandelaError> {
        *self.seen.lock().unwrap() = Some((market_id.into(), interval.into(), start_ms, limit));
        Ok(self.rows.clone())
    }
}

fn request(tf: Timeframe, days: u32) -> SeriesRequest {
    SeriesRequest {
        symbol: SymbolId::pair("BTC", "USDT"),
        timeframe: tf,
        lookback_days: days,
    }
}

#[tokio::test]
async fn fetch_maps_rows_and_tags_provenance() {
    let base = 1_700_006_400i64;
    let rows: Vec<KlineRow> = (0..72).map(|i| row(base + i * 3_600, 3_700_000)).collect();
    let transport = Arc::new(ScriptedTransport::new(rows));
    let connector = BinanceFutures::with_transport(transport.clone());

    let series = connector
        .fetch_series(&request(Timeframe::H1, 3))
        .await
        .unwrap();

    assert_eq!(series.candles.len(), 72);
    assert_eq!(series.source, BinanceFutures::KEY);
    assert!(series.fallback_note.is_none());
    for pair in series.candles.windows(2) {
        assert_eq!(pair[1].ts.timestamp() - pair[0].ts.timestamp(), 3_600);
    }

    let (market_id, interval, _since, limit) = transport.seen.lock().unwrap().clone().unwrap();
    assert_eq!(market_id, "BTCUSDT");
    assert_eq!(interval, "1h");
    assert_eq!(limit, 72);
}

#[tokio::test]
async fn empty_result_is_no_data_not_transient() {
    let connector = BinanceFutures::with_transport(Arc::new(ScriptedTransport::new(Vec::new())));
    let err = connector
        .fetch_series(&request(Timeframe::H1, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, CandelaError::NoData { .. }));
    assert!(err.triggers_fallback());
}

#[tokio::test]
async fn unsupported_symbol_shapes_fail_before_any_request() {
    let transport = Arc::new(ScriptedTransport::new(vec![row(0, 100)]));
    let connector = BinanceFutures::with_transport(transport.clone());

    let req = SeriesRequest {
        symbol: SymbolId::Code("600519".into()),
        timeframe: Timeframe::D1,
        lookback_days: 5,
    };
    let err = connector.fetch_series(&req).await.unwrap_err();
    assert!(matches!(err, CandelaError::UnsupportedContract { .. }));
    assert!(transport.seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn impossible_bars_surface_as_protocol_errors() {
    let px = dec(3_700_000);
    let broken = KlineRow {
        open_time: DateTime::from_timestamp(1_700_006_400, 0).unwrap(),
        open: px,
        high: px - dec(100), // high below open
        low: px,
        close: px,
        volume: dec(1),
    };
    let connector = BinanceFutures::with_transport(Arc::new(ScriptedTransport::new(vec![broken])));
    let err = connector
        .fetch_series(&request(Timeframe::H1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CandelaError::Protocol { .. }));
}

#[tokio::test]
async fn supports_only_usdt_pairs() {
    let connector = BinanceFutures::with_transport(Arc::new(ScriptedTransport::new(Vec::new())));
    assert!(connector.supports_symbol(&SymbolId::pair("BTC", "USDT")));
    assert!(!connector.supports_symbol(&SymbolId::pair("BTC", "EUR")));
    assert!(!connector.supports_symbol(&SymbolId::Code("600519".into())));
}
