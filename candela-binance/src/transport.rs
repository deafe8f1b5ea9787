use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use candela_core::{CandelaError, ProxyConfig};

/// The futures-specific API host. Every request is pinned here; the spot
/// host serves an incompatible API, and silently answering a futures symbol
/// with spot data would be a correctness bug rather than a connectivity bug.
pub const FUTURES_API_BASE: &str = "https://fapi.binance.com/fapi/v1";

pub(crate) const SOURCE: &str = "candela-binance";

/// Minimum spacing between consecutive requests. The endpoint's weight
/// budget is generous for read-only polling; no extra backoff is layered on
/// top of this gap.
const MIN_REQUEST_GAP: Duration = Duration::from_millis(250);

/// One decoded kline row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRow {
    /// Bar open instant.
    pub open_time: DateTime<Utc>,
    /// First trade price of the bar.
    pub open: Decimal,
    /// Highest trade price of the bar.
    pub high: Decimal,
    /// Lowest trade price of the bar.
    pub low: Decimal,
    /// Last trade price of the bar.
    pub close: Decimal,
    /// Base-asset volume traded during the bar.
    pub volume: Decimal,
}

fn decimal_field(v: &Value, name: &str) -> Result<Decimal, CandelaError> {
    let parsed = match v {
        Value::String(s) => s.parse::<Decimal>().ok(),
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| CandelaError::protocol(SOURCE, format!("kline {name} is not numeric: {v}")))
}

impl KlineRow {
    /// Decode one row from the wire representation: a positional array of
    /// `[openTime, open, high, low, close, volume, ...]` where prices arrive
    /// as strings.
    ///
    /// # Errors
    /// Returns [`CandelaError::Protocol`] when the row does not match the
    /// documented shape.
    pub fn from_wire(row: &Value) -> Result<Self, CandelaError> {
        let arr = row
            .as_array()
            .ok_or_else(|| CandelaError::protocol(SOURCE, "kline row is not an array"))?;
        if arr.len() < 6 {
            return Err(CandelaError::protocol(
                SOURCE,
                format!("kline row has {} fields, expected at least 6", arr.len()),
            ));
        }
        let open_ms = arr[0]
            .as_i64()
            .ok_or_else(|| CandelaError::protocol(SOURCE, "kline open time is not an integer"))?;
        let open_time = DateTime::from_timestamp_millis(open_ms)
            .ok_or_else(|| CandelaError::protocol(SOURCE, "kline open time out of range"))?;
        Ok(Self {
            open_time,
            open: decimal_field(&arr[1], "open")?,
            high: decimal_field(&arr[2], "high")?,
            low: decimal_field(&arr[3], "low")?,
            close: decimal_field(&arr[4], "close")?,
            volume: decimal_field(&arr[5], "volume")?,
        })
    }
}

/// Transport abstraction over the futures market-data endpoint, so connector
/// tests can substitute a scripted implementation.
#[async_trait]
pub trait KlineTransport: Send + Sync {
    /// Clock-sync/connectivity probe (`/time`).
    async fn server_time(&self) -> Result<DateTime<Utc>, CandelaError>;

    /// Candle retrieval (`/klines`) for a provider-native market id.
    async fn klines(
        &self,
        market_id: &str,
        interval: &str,
        start_ms: i64,
        limit: u32,
    ) -> Result<Vec<KlineRow>, CandelaError>;
}

/// Production transport backed by `reqwest`, pinned to the futures host.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    last_request: tokio::sync::Mutex<Option<tokio::time::Instant>>,
}

impl HttpTransport {
    /// Build a transport against the pinned futures host.
    ///
    /// # Errors
    /// Returns [`CandelaError::InvalidArg`] for unusable proxy URLs or an
    /// HTTP client that cannot be constructed.
    pub fn new(proxy: &ProxyConfig, timeout: Duration) -> Result<Self, CandelaError> {
        Self::with_base_url(FUTURES_API_BASE, proxy, timeout)
    }

    /// Build a transport against an explicit base URL (tests point this at a
    /// local mock server).
    ///
    /// # Errors
    /// Returns [`CandelaError::InvalidArg`] for unusable proxy URLs or an
    /// HTTP client that cannot be constructed.
    pub fn with_base_url(
        base_url: impl Into<String>,
        proxy: &ProxyConfig,
        timeout: Duration,
    ) -> Result<Self, CandelaError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(url) = &proxy.http {
            let p = reqwest::Proxy::http(url)
                .map_err(|e| CandelaError::InvalidArg(format!("http proxy: {e}")))?;
            builder = builder.proxy(p);
        }
        if let Some(url) = &proxy.https {
            let p = reqwest::Proxy::https(url)
                .map_err(|e| CandelaError::InvalidArg(format!("https proxy: {e}")))?;
            builder = builder.proxy(p);
        }
        let http = builder
            .build()
            .map_err(|e| CandelaError::InvalidArg(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            last_request: tokio::sync::Mutex::new(None),
        })
    }

    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < MIN_REQUEST_GAP {
                tokio::time::sleep(MIN_REQUEST_GAP - elapsed).await;
            }
        }
        *last = Some(tokio::time::Instant::now());
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CandelaError> {
        self.pace().await;
        let url = format!("{}/{path}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CandelaError::transient(SOURCE, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status.as_u16() == 400 && body.contains("Invalid symbol") {
                return Err(CandelaError::not_found(body));
            }
            if status.as_u16() == 429 || status.is_server_error() {
                return Err(CandelaError::transient(
                    SOURCE,
                    format!("status {status}: {body}"),
                ));
            }
            return Err(CandelaError::protocol(
                SOURCE,
                format!("unexpected status {status}: {body}"),
            ));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| CandelaError::protocol(SOURCE, format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl KlineTransport for HttpTransport {
    async fn server_time(&self) -> Result<DateTime<Utc>, CandelaError> {
        let body = self.get_json("time", &[]).await?;
        let ms = body
            .get("serverTime")
            .and_then(Value::as_i64)
            .ok_or_else(|| CandelaError::protocol(SOURCE, "missing serverTime"))?;
        DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| CandelaError::protocol(SOURCE, "serverTime out of range"))
    }

    async fn klines(
        &self,
        market_id: &str,
        interval: &str,
        start_ms: i64,
        limit: u32,
    ) -> Result<Vec<KlineRow>, CandelaError> {
        let query = [
            ("symbol", market_id.to_string()),
            ("interval", interval.to_string()),
            ("startTime", start_ms.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self.get_json("klines", &query).await?;
        let rows = body
            .as_array()
            .ok_or_else(|| CandelaError::protocol(SOURCE, "klines payload is not an array"))?;
        rows.iter().map(KlineRow::from_wire).collect()
    }
}
