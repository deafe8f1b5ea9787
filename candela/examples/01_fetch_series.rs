//! Fetch three days of hourly BTC/USDT bars with live fallback and print
//! the advisory summary.
//!
//! Set `HTTPS_PROXY`/`HTTP_PROXY`-style values via `CANDELA_HTTP_PROXY` and
//! `CANDELA_HTTPS_PROXY` if the futures host is unreachable directly.

use std::sync::Arc;
use std::time::Duration;

use candela::{Candela, ProxyConfig, Timeframe, summary};
use candela_binance::BinanceFutures;
use candela_coingecko::CoinGecko;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,candela=debug".into()),
        )
        .init();

    let proxy = ProxyConfig {
        http: std::env::var("CANDELA_HTTP_PROXY").ok(),
        https: std::env::var("CANDELA_HTTPS_PROXY").ok(),
    };
    let timeout = Duration::from_secs(5);

    let futures = Arc::new(BinanceFutures::new(&proxy, timeout)?);
    let index = Arc::new(CoinGecko::new(&proxy, timeout)?);

    let candela = Candela::builder()
        .with_primary(futures)
        .with_fallback(index)
        .provider_timeout(timeout)
        .build()?;

    let series = candela.get_series("BTC/USDT", Timeframe::H1, 3).await?;
    if let Some(note) = &series.fallback_note {
        println!("note: {note}");
    }
    println!("{}", summary::render(&series, 24));
    Ok(())
}
