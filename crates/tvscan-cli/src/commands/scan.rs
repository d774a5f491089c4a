use tvscan_core::columns::{
    self, CLOSE, DEFAULT_SELECTION, EXCHANGE, INDUSTRY, MARKET_CAP, SECTOR, VOLUME,
};
use tvscan_core::{
    CancellationToken, Column, FilterOperation, Operand, OperationKind, Query, ScreenerClient,
    SortOrder,
};

use crate::cli::ScanArgs;
use crate::error::CliError;

use super::CommandOutput;

pub async fn run(
    args: &ScanArgs,
    client: &ScreenerClient,
    cancel: &CancellationToken,
) -> Result<CommandOutput, CliError> {
    let query = build_query(args)?;

    if args.dry_run {
        let prepared = client.prepare(query.request())?;
        tracing::debug!(url = %prepared.url, "dry run, request not sent");
        return Ok(CommandOutput::Request(prepared.body));
    }

    let result = query.execute_with_cancellation(client, cancel).await?;
    Ok(CommandOutput::Scan {
        columns: query.request().columns.clone(),
        result,
    })
}

pub fn build_query(args: &ScanArgs) -> Result<Query, CliError> {
    let bounds = [
        (&CLOSE, OperationKind::Greater, &args.min_price),
        (&CLOSE, OperationKind::Less, &args.max_price),
        (&VOLUME, OperationKind::Greater, &args.min_volume),
        (&VOLUME, OperationKind::Less, &args.max_volume),
        (&MARKET_CAP, OperationKind::Greater, &args.min_market_cap),
        (&MARKET_CAP, OperationKind::Less, &args.max_market_cap),
    ];
    let labels = [
        (&EXCHANGE, &args.exchange),
        (&SECTOR, &args.sector),
        (&INDUSTRY, &args.industry),
    ];

    let mut filters = Vec::new();
    for (column, operation, value) in bounds {
        if let Some(value) = value {
            filters.push(FilterOperation::new(column.name(), operation, value.clone())?);
        }
    }
    for (column, value) in labels {
        if let Some(value) = value {
            filters.push(FilterOperation::new(
                column.name(),
                OperationKind::Equal,
                Operand::Text(value.clone()),
            )?);
        }
    }

    let mut query = Query::new().select(DEFAULT_SELECTION);

    if let Some(market) = &args.market {
        query = query.set_markets([market.as_str()]);
    }
    if !args.tickers.is_empty() {
        query = query.set_tickers(args.tickers.iter().map(String::as_str));
    }
    if !filters.is_empty() {
        query = query.filter(filters);
    }

    // Offset resets the page size, so it has to come first.
    if let Some(offset) = args.offset {
        query = query.offset(offset);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }

    if let Some(order_by) = &args.order_by {
        let column = resolve_column(order_by)?;
        query = query.order_by(column, SortOrder::from_ascending(!args.descending));
    }

    Ok(query)
}

fn resolve_column(name: &str) -> Result<Column, CliError> {
    match columns::lookup(name) {
        Some(column) => Ok(column),
        None => Ok(Column::new(name.trim())?),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::{json, Value};

    use super::*;
    use crate::cli::{Cli, Command};

    fn scan_args(flags: &[&str]) -> ScanArgs {
        let argv = ["tvscan", "scan"].iter().chain(flags.iter());
        match Cli::try_parse_from(argv).expect("flags should parse").command {
            Command::Scan(args) => args,
            Command::Columns => panic!("expected scan command"),
        }
    }

    fn request_json(flags: &[&str]) -> Value {
        let query = build_query(&scan_args(flags)).expect("query should build");
        serde_json::from_str(&query.to_json().expect("query should encode")).expect("valid json")
    }

    #[test]
    fn when_bounds_are_given_then_filters_follow_flag_order() {
        let request = request_json(&[
            "--max-market-cap",
            "5e9",
            "--min-price",
            "10",
            "--exchange",
            "NASDAQ",
        ]);

        assert_eq!(
            request["filter"],
            json!([
                {"left": "close", "operation": "greater", "right": 10},
                {"left": "market_cap_basic", "operation": "less", "right": 5e9},
                {"left": "exchange", "operation": "equal", "right": "NASDAQ"}
            ])
        );
        assert_eq!(
            request["columns"],
            json!(["name", "close", "volume", "market_cap_basic"])
        );
    }

    #[test]
    fn when_no_filters_are_given_then_filter_is_omitted() {
        let request = request_json(&[]);
        assert!(request.get("filter").is_none());
        assert_eq!(request["range"], json!([0, 50]));
        assert_eq!(request["markets"], json!(["america"]));
    }

    #[test]
    fn when_offset_and_limit_are_given_then_both_apply() {
        let request = request_json(&["--limit", "10", "--offset", "30"]);
        assert_eq!(request["range"], json!([30, 40]));
    }

    #[test]
    fn when_order_by_uses_a_label_then_wire_name_is_sent() {
        let request = request_json(&["--order-by", "Market_Cap", "--descending"]);
        assert_eq!(
            request["sort"],
            json!({"sortBy": "market_cap_basic", "sortOrder": "desc"})
        );

        let request = request_json(&["--order-by", "Perf.W"]);
        assert_eq!(
            request["sort"],
            json!({"sortBy": "Perf.W", "sortOrder": "asc"})
        );
    }

    #[test]
    fn when_market_and_tickers_are_given_then_they_replace_defaults() {
        let request = request_json(&["-m", "japan", "--ticker", "TSE:7203"]);
        assert_eq!(request["markets"], json!(["japan"]));
        assert_eq!(request["symbols"]["tickers"], json!(["TSE:7203"]));
    }

    #[tokio::test]
    async fn when_dry_run_then_request_body_is_returned() {
        let client = ScreenerClient::offline();
        let cancel = CancellationToken::new();

        let output = run(&scan_args(&["--dry-run", "--min-volume", "1000"]), &client, &cancel)
            .await
            .expect("dry run should succeed");

        let CommandOutput::Request(body) = output else {
            panic!("expected request output");
        };
        assert!(body.contains(r#""operation":"greater""#));
    }

    #[tokio::test]
    async fn when_mock_client_then_scan_returns_empty_result() {
        let client = ScreenerClient::offline();
        let cancel = CancellationToken::new();

        let output = run(&scan_args(&["--limit", "3"]), &client, &cancel)
            .await
            .expect("mock scan should succeed");

        let CommandOutput::Scan { columns, result } = output else {
            panic!("expected scan output");
        };
        assert_eq!(columns.len(), 4);
        assert!(result.is_empty());
    }
}
