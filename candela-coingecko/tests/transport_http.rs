use std::time::Duration;

use candela_coingecko::{ChartTransport, HttpTransport};
use candela_core::{CandelaError, ProxyConfig};
use httpmock::prelude::*;
use serde_json::json;

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::with_base_url(
        server.base_url(),
        &ProxyConfig::default(),
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn fetches_a_market_chart() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/bitcoin/market_chart")
                .query_param("vs_currency", "usd")
                .query_param("days", "3");
            then.status(200).json_body(json!({
                "prices": [[1_700_006_400_000i64, 37_000.5], [1_700_010_000_000i64, 37_100.0]],
                "market_caps": [[1_700_006_400_000i64, 7.0e11]],
                "total_volumes": [[1_700_006_400_000i64, 1.0e9]]
            }));
        })
        .await;

    let chart = transport(&server)
        .market_chart("bitcoin", "usd", 3)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(chart.prices.len(), 2);
    assert_eq!(chart.total_volumes.len(), 1);
}

#[tokio::test]
async fn fetches_the_asset_catalog() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/list");
            then.status(200).json_body(json!([
                {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin"},
                {"id": "ethereum", "symbol": "eth", "name": "Ethereum"}
            ]));
        })
        .await;

    let listings = transport(&server).coins_list().await.unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].id, "bitcoin");
}

#[tokio::test]
async fn unknown_asset_ids_are_symbol_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/nope/market_chart");
            then.status(404).body(r#"{"error":"coin not found"}"#);
        })
        .await;

    let err = transport(&server)
        .market_chart("nope", "usd", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, CandelaError::SymbolNotFound { .. }));
}

#[tokio::test]
async fn rate_limit_responses_are_transient() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin/market_chart");
            then.status(429).body("slow down");
        })
        .await;

    let err = transport(&server)
        .market_chart("bitcoin", "usd", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, CandelaError::Transient { .. }));
}

#[tokio::test]
async fn missing_prices_key_is_a_protocol_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/bitcoin/market_chart");
            then.status(200).json_body(json!({"market_caps": []}));
        })
        .await;

    let err = transport(&server)
        .market_chart("bitcoin", "usd", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, CandelaError::Protocol { .. }));
}
