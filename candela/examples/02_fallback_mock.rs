//! Demonstrate the fallback sequence without touching the network: a
//! primary that always fails transiently, a mock fallback that serves.

use std::sync::Arc;

use candela::{Candela, CandelaError, Timeframe, summary};
use candela_mock::MockProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let candela = Candela::builder()
        .with_primary(Arc::new(MockProvider::failing(
            "flaky-exchange",
            CandelaError::transient("flaky-exchange", "connection refused"),
        )))
        .with_fallback(Arc::new(MockProvider::serving("steady-index")))
        .build()?;

    let series = candela.get_series("BTC/USDT", Timeframe::H4, 2).await?;
    println!("served by: {}", series.source);
    if let Some(note) = &series.fallback_note {
        println!("note: {note}");
    }
    println!("{}", summary::render(&series, 12));
    Ok(())
}
