use candela_core::CandelaError;

#[test]
fn fallback_classification_follows_error_kind() {
    assert!(CandelaError::transient("src", "connect reset").triggers_fallback());
    assert!(CandelaError::no_data("src").triggers_fallback());
    assert!(CandelaError::timeout("src").triggers_fallback());
    assert!(CandelaError::unsupported_contract("inverse contract").triggers_fallback());

    assert!(!CandelaError::not_found("XYZ").triggers_fallback());
    assert!(!CandelaError::protocol("src", "missing field").triggers_fallback());
    assert!(!CandelaError::InvalidArg("bad timeframe".into()).triggers_fallback());
}

#[test]
fn flatten_unnests_aggregates() {
    let nested = CandelaError::AllSourcesFailed(vec![
        CandelaError::timeout("a"),
        CandelaError::AllSourcesFailed(vec![
            CandelaError::no_data("b"),
            CandelaError::not_found("c"),
        ]),
    ]);
    let flat = nested.flatten();
    assert_eq!(flat.len(), 3);
    assert!(matches!(flat[0], CandelaError::Timeout { .. }));
    assert!(matches!(flat[1], CandelaError::NoData { .. }));
    assert!(matches!(flat[2], CandelaError::SymbolNotFound { .. }));
}

#[test]
fn aggregate_message_names_each_failure() {
    let err = CandelaError::AllSourcesFailed(vec![
        CandelaError::transient("candela-binance", "dns failure"),
        CandelaError::not_found("WAGMI"),
    ]);
    let msg = err.to_string();
    assert!(msg.contains("candela-binance"));
    assert!(msg.contains("WAGMI"));
}

#[test]
fn errors_round_trip_through_serde() {
    let err = CandelaError::AllSourcesFailed(vec![
        CandelaError::timeout("candela-binance"),
        CandelaError::protocol("candela-coingecko", "unexpected shape"),
    ]);
    let json = serde_json::to_string(&err).unwrap();
    let back: CandelaError = serde_json::from_str(&json).unwrap();
    assert_eq!(err, back);
}
