//! Chainable scan query builder.
//!
//! ```
//! use tvscan_core::columns::{CLOSE, MARKET_CAP, NAME, VOLUME};
//! use tvscan_core::{Query, SortOrder};
//!
//! let query = Query::new()
//!     .select([NAME, CLOSE, VOLUME, MARKET_CAP])
//!     .filter([CLOSE.greater_than(100), VOLUME.greater_than(1_000_000)])
//!     .order_by(VOLUME, SortOrder::Desc)
//!     .limit(10);
//!
//! assert_eq!(query.request().range.end(), 10);
//! ```

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::ScreenerClient;
use crate::error::ScreenerError;
use crate::filter::FilterOperation;
use crate::request::{PageRange, QueryRequest, SortBy, SortOrder};
use crate::response::ScreenerResult;
use crate::tree::ComparisonTree;
use crate::wire;

/// Accumulates a [`QueryRequest`] through by-value chained calls.
///
/// Every setter replaces its slot wholesale; nothing is appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    request: QueryRequest,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_request(request: QueryRequest) -> Self {
        Self { request }
    }

    /// Replaces the selected columns. Accepts column handles or raw names.
    pub fn select<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        self.request.columns = columns
            .into_iter()
            .map(|column| column.as_ref().to_owned())
            .collect();
        self
    }

    /// Replaces the flat filter list.
    pub fn filter<I>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = FilterOperation>,
    {
        self.request.filter = Some(filters.into_iter().collect());
        self
    }

    /// Replaces the comparison tree sent as `filter2`.
    pub fn filter_tree(mut self, tree: ComparisonTree) -> Self {
        self.request.filter_tree = Some(tree);
        self
    }

    pub fn order_by(mut self, column: impl AsRef<str>, order: SortOrder) -> Self {
        self.request.sort = Some(SortBy {
            column: column.as_ref().to_owned(),
            order,
            nulls_first: None,
        });
        self
    }

    pub fn order_by_nulls(
        mut self,
        column: impl AsRef<str>,
        order: SortOrder,
        nulls_first: bool,
    ) -> Self {
        self.request.sort = Some(SortBy {
            column: column.as_ref().to_owned(),
            order,
            nulls_first: Some(nulls_first),
        });
        self
    }

    /// Keeps the current start and sets the window to `limit` rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.request.range = self.request.range.with_size(limit);
        self
    }

    /// Moves the window to start at `offset` with the default page size.
    ///
    /// Any size set by an earlier [`Query::limit`] is discarded, so call
    /// `offset` first when both are needed.
    pub fn offset(mut self, offset: u32) -> Self {
        self.request.range = PageRange::at(offset);
        self
    }

    pub fn set_markets<I, S>(mut self, markets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.markets = markets.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the explicit ticker list (`EXCHANGE:SYMBOL`).
    pub fn set_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.symbols.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_symbol_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.symbols.query.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.options.insert(key.into(), value.into());
        self
    }

    pub fn ignore_unknown_fields(mut self, ignore: bool) -> Self {
        self.request.ignore_unknown_fields = ignore;
        self
    }

    /// Independent copy; changes to either side never reach the other.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub fn into_request(self) -> QueryRequest {
        self.request
    }

    /// Validated wire JSON of the current state.
    pub fn to_json(&self) -> Result<String, ScreenerError> {
        wire::encode_request(&self.request)
    }

    pub async fn execute(&self, client: &ScreenerClient) -> Result<ScreenerResult, ScreenerError> {
        client.scan(&self.request).await
    }

    /// Like [`Query::execute`], returning [`ScreenerError::Cancelled`] if
    /// `cancel` fires before the response arrives.
    pub async fn execute_with_cancellation(
        &self,
        client: &ScreenerClient,
        cancel: &CancellationToken,
    ) -> Result<ScreenerResult, ScreenerError> {
        client.scan_with_cancellation(&self.request, cancel).await
    }
}

impl From<QueryRequest> for Query {
    fn from(request: QueryRequest) -> Self {
        Self::from_request(request)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::column::Column;
    use crate::columns::{CLOSE, MARKET_CAP, NAME, RSI, VOLUME};

    #[test]
    fn when_limit_is_set_then_start_is_kept() {
        let query = Query::new().limit(10);
        assert_eq!(query.request().range, PageRange::new(0, 10).expect("valid"));

        let query = Query::new().offset(100).limit(25);
        assert_eq!(query.request().range, PageRange::new(100, 125).expect("valid"));
    }

    #[test]
    fn when_offset_follows_limit_then_page_size_resets() {
        let query = Query::new().limit(10).offset(20);
        assert_eq!(query.request().range, PageRange::new(20, 70).expect("valid"));
    }

    #[test]
    fn when_limit_overflows_then_end_saturates() {
        let query = Query::new().offset(u32::MAX - 5).limit(100);
        assert_eq!(query.request().range.end(), u32::MAX);
    }

    #[test]
    fn when_setters_repeat_then_slots_are_replaced() {
        let query = Query::new()
            .select([NAME, CLOSE])
            .select(["volume"])
            .filter([CLOSE.greater_than(1)])
            .filter([RSI.less_than(30)])
            .set_markets(["america"])
            .set_markets(["crypto", "forex"]);

        let request = query.request();
        assert_eq!(request.columns, ["volume"]);
        assert_eq!(request.markets, ["crypto", "forex"]);
        let filters = request.filter.as_ref().expect("filter set");
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].left(), "RSI");
    }

    #[test]
    fn when_select_mixes_custom_columns_then_names_are_kept() {
        let custom = Column::new("typespecs").expect("valid column");
        let query = Query::new().select([&MARKET_CAP, &custom]);
        assert_eq!(query.request().columns, ["market_cap_basic", "typespecs"]);
    }

    #[test]
    fn when_copy_is_mutated_then_original_is_untouched() {
        let original = Query::new().set_tickers(["NASDAQ:AAPL"]).limit(5);
        let copy = original.copy().set_tickers(["NYSE:IBM"]).offset(50);

        assert_eq!(original.request().symbols.tickers, ["NASDAQ:AAPL"]);
        assert_eq!(original.request().range.end(), 5);
        assert_eq!(copy.request().symbols.tickers, ["NYSE:IBM"]);
    }

    #[test]
    fn when_options_and_types_are_set_then_json_carries_them() {
        let json = Query::new()
            .set_option("lang", "de")
            .set_symbol_types(["stock", "dr"])
            .ignore_unknown_fields(true)
            .order_by_nulls(VOLUME, SortOrder::Asc, false)
            .to_json()
            .expect("query should encode");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["options"], json!({"lang": "de"}));
        assert_eq!(value["symbols"]["query"]["types"], json!(["stock", "dr"]));
        assert_eq!(value["ignore_unknown_fields"], json!(true));
        assert_eq!(
            value["sort"],
            json!({"sortBy": "volume", "sortOrder": "asc", "nullsFirst": false})
        );
    }
}
