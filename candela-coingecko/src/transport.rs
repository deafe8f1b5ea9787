use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use candela_core::{CandelaError, ProxyConfig};

/// Public aggregator API host.
pub const AGGREGATOR_API_BASE: &str = "https://api.coingecko.com/api/v3";

pub(crate) const SOURCE: &str = "candela-coingecko";

/// One row of the asset catalog (`/coins/list`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoinListing {
    /// Internal provider asset identifier (e.g. `bitcoin`).
    pub id: String,
    /// Asset ticker (lower-case on the wire).
    pub symbol: String,
    /// Display name.
    pub name: String,
}

/// Raw `/coins/{id}/market_chart` payload: two parallel, independently
/// timestamped sample arrays of `[millis, value]` pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    /// Index price samples.
    pub prices: Vec<(f64, f64)>,
    /// Rolling volume samples; may be sparser than `prices`.
    #[serde(default)]
    pub total_volumes: Vec<(f64, f64)>,
}

/// Transport abstraction over the aggregator endpoint, so connector tests
/// can substitute a scripted implementation.
#[async_trait]
pub trait ChartTransport: Send + Sync {
    /// Full asset catalog, used as the id-resolution fallback.
    async fn coins_list(&self) -> Result<Vec<CoinListing>, CandelaError>;

    /// Price/volume chart for one asset over a trailing day window.
    async fn market_chart(
        &self,
        asset_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<MarketChart, CandelaError>;
}

/// Production transport backed by `reqwest`.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport against the public aggregator host.
    ///
    /// # Errors
    /// Returns [`CandelaError::InvalidArg`] for unusable proxy URLs or an
    /// HTTP client that cannot be constructed.
    pub fn new(proxy: &ProxyConfig, timeout: Duration) -> Result<Self, CandelaError> {
        Self::with_base_url(AGGREGATOR_API_BASE, proxy, timeout)
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
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CandelaError> {
        let url = format!("{}/{path}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CandelaError::transient(SOURCE, e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Err(CandelaError::not_found(path.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
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

        resp.json::<T>()
            .await
            .map_err(|e| CandelaError::protocol(SOURCE, format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl ChartTransport for HttpTransport {
    async fn coins_list(&self) -> Result<Vec<CoinListing>, CandelaError> {
        self.get("coins/list", &[]).await
    }

    async fn market_chart(
        &self,
        asset_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<MarketChart, CandelaError> {
        let path = format!("coins/{asset_id}/market_chart");
        let query = [
            ("vs_currency", vs_currency.to_string()),
            ("days", days.to_string()),
        ];
        self.get(&path, &query).await
    }
}
