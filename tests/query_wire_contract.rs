//! Behavior-driven tests for the scan request and response wire contract
//!
//! These tests pin the exact JSON the scanner receives for representative
//! queries and how its responses are decoded.

use serde_json::{json, Value};
use tvscan_core::columns::{AVERAGE_VOLUME_10D, CLOSE, EMA20, EMA5, MARKET_CAP, NAME, RSI, VOLUME};
use tvscan_core::{and, or, wire, DecodeError, PageRange, Query, SortOrder};

fn encoded(query: &Query) -> Value {
    let body = query.to_json().expect("query should encode");
    serde_json::from_str(&body).expect("encoded body is valid JSON")
}

// =============================================================================
// Request encoding
// =============================================================================

#[test]
fn when_flat_filters_sort_and_limit_are_set_request_matches_scanner_shape() {
    // Given: A fresh builder with a selection, two filters, a sort and a limit
    let query = Query::new()
        .select([NAME, CLOSE, VOLUME, MARKET_CAP])
        .filter([CLOSE.greater_than(100), VOLUME.greater_than(1_000_000)])
        .order_by(VOLUME, SortOrder::Desc)
        .limit(10);

    // When: The request is serialized
    let request = encoded(&query);

    // Then: Every field carries the scanner's exact names and values
    assert_eq!(
        request,
        json!({
            "markets": ["america"],
            "symbols": {"query": {"types": []}, "tickers": []},
            "options": {"lang": "en"},
            "columns": ["name", "close", "volume", "market_cap_basic"],
            "filter": [
                {"left": "close", "operation": "greater", "right": 100},
                {"left": "volume", "operation": "greater", "right": 1000000}
            ],
            "sort": {"sortBy": "volume", "sortOrder": "desc"},
            "range": [0, 10],
            "ignore_unknown_fields": false
        })
    );
}

#[test]
fn when_tree_filter_is_set_leaves_are_wrapped_as_expressions() {
    // Given: An AND tree of a column range and a column-to-column comparison
    let query = Query::new().filter_tree(and!(
        CLOSE.between(&EMA5, &EMA20),
        VOLUME.greater_than(&AVERAGE_VOLUME_10D),
    ));

    // When: The request is serialized
    let request = encoded(&query);

    // Then: filter2 holds both leaves in order, each inside an expression envelope
    let tree = &request["filter2"];
    assert_eq!(tree["operator"], json!("and"));
    assert_eq!(
        tree["operands"],
        json!([
            {"expression": {"left": "close", "operation": "in_range", "right": ["EMA5", "EMA20"]}},
            {"expression": {"left": "volume", "operation": "greater", "right": "average_volume_10d_calc"}}
        ])
    );
    assert!(request.get("filter").is_none(), "unset flat filter is omitted");
    assert!(request.get("sort").is_none(), "unset sort is omitted");
}

#[test]
fn when_both_filter_forms_are_set_both_are_sent() {
    // Given: A query with a flat filter and a tree filter
    let query = Query::new()
        .filter([CLOSE.greater_than(5)])
        .filter_tree(or!(RSI.less_than(30), RSI.greater_than(70)));

    // When: The request is serialized
    let request = encoded(&query);

    // Then: Neither form is dropped
    assert_eq!(request["filter"].as_array().map(Vec::len), Some(1));
    assert_eq!(request["filter2"]["operator"], json!("or"));
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn when_limit_then_offset_are_applied_offset_wins_with_default_page() {
    // Given: A limit followed by an offset
    let query = Query::new().limit(10).offset(200);

    // Then: The custom page size is discarded
    assert_eq!(query.request().range, PageRange::new(200, 250).expect("valid"));
    assert_eq!(encoded(&query)["range"], json!([200, 250]));
}

#[test]
fn when_offset_then_limit_are_applied_both_take_effect() {
    let query = Query::new().offset(200).limit(10);
    assert_eq!(encoded(&query)["range"], json!([200, 210]));
}

// =============================================================================
// Copy isolation
// =============================================================================

#[test]
fn when_copy_is_changed_original_request_is_unchanged() {
    // Given: A configured query and a copy of it
    let original = Query::new()
        .select([NAME, CLOSE])
        .filter([CLOSE.greater_than(1)])
        .set_markets(["america"]);
    let before = encoded(&original);

    // When: The copy is modified in every slot
    let copy = original
        .copy()
        .select([VOLUME])
        .filter([VOLUME.less_than(5)])
        .set_markets(["crypto"])
        .set_option("lang", "fr")
        .limit(3);

    // Then: The original still serializes exactly as before
    assert_eq!(encoded(&original), before);
    assert_eq!(encoded(&copy)["markets"], json!(["crypto"]));
}

#[test]
fn when_original_is_changed_copy_is_unchanged() {
    let original = Query::new().set_tickers(["NASDAQ:AAPL"]);
    let copy = original.copy();

    let _original = original.set_tickers(["NYSE:IBM"]).set_symbol_types(["fund"]);

    assert_eq!(copy.request().symbols.tickers, ["NASDAQ:AAPL"]);
    assert!(copy.request().symbols.query.types.is_empty());
}

// =============================================================================
// Round trip through the wire
// =============================================================================

#[test]
fn when_request_is_decoded_from_wire_it_rebuilds_the_same_query() {
    // Given: A query using every slot
    let query = Query::new()
        .select([NAME, CLOSE])
        .filter([CLOSE.between_pct(&EMA20, 0.95, None), RSI.empty()])
        .filter_tree(and!(VOLUME.greater_than(10), or!(CLOSE.crosses_above(&EMA5))))
        .order_by_nulls(CLOSE, SortOrder::Asc, true)
        .offset(50)
        .set_tickers(["NASDAQ:AAPL"]);

    // When: Its wire body is decoded and re-encoded
    let body = query.to_json().expect("query should encode");
    let decoded = wire::decode_request(&body).expect("body should decode");
    let again = Query::from(decoded).to_json().expect("decoded query should encode");

    // Then: The wire body is stable
    assert_eq!(body, again);
}

// =============================================================================
// Response decoding
// =============================================================================

#[test]
fn when_response_has_fewer_rows_than_total_rows_are_kept_as_is() {
    // Given: A page of two rows out of a large total
    let body = json!({
        "totalCount": 4821,
        "data": [
            {"s": "NASDAQ:NVDA", "d": ["NVDA", 890.1, 51234567, 2.2e12]},
            {"s": "NYSE:BRK.B", "d": ["BRK.B", null, 3456789, null]}
        ]
    })
    .to_string();

    // When: The body is decoded
    let result = wire::decode_response(&body).expect("response should decode");

    // Then: Row count and null values are preserved exactly
    assert_eq!(result.total_count, 4821);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[1].symbol, "NYSE:BRK.B");
    assert_eq!(result.rows[1].values[1], Value::Null);

    let records = result.records(&["name", "close", "volume", "market_cap_basic"]);
    assert_eq!(records[0]["close"], json!(890.1));
}

#[test]
fn when_response_has_more_rows_than_total_rows_are_not_truncated() {
    let body = r#"{"totalCount": 1, "data": [{"s": "A:X", "d": []}, {"s": "A:Y", "d": []}]}"#;

    let result = wire::decode_response(body).expect("response should decode");

    assert_eq!(result.rows.len(), 2);
}

#[test]
fn when_response_lacks_data_user_gets_missing_field_error() {
    let error = wire::decode_response(r#"{"totalCount": 10}"#).expect_err("should fail");

    assert!(matches!(error, DecodeError::MissingField("data")));
    assert!(error.to_string().contains("data"));
}
