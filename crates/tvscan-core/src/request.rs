//! Scan request body as accumulated by [`crate::Query`].
//!
//! Field names and nesting mirror the scanner endpoint exactly; see
//! [`crate::wire`] for encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::DEFAULT_SELECTION;
use crate::error::ConstructionError;
use crate::filter::FilterOperation;
use crate::tree::ComparisonTree;

/// Market used when none is configured.
pub const DEFAULT_MARKET: &str = "america";
/// Window width applied by a fresh request and by [`crate::Query::offset`].
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Full scan request state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub markets: Vec<String>,
    pub symbols: SymbolsFilter,
    pub options: BTreeMap<String, Value>,
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<FilterOperation>>,
    #[serde(rename = "filter2", default, skip_serializing_if = "Option::is_none")]
    pub filter_tree: Option<ComparisonTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortBy>,
    pub range: PageRange,
    #[serde(default)]
    pub ignore_unknown_fields: bool,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            markets: vec![String::from(DEFAULT_MARKET)],
            symbols: SymbolsFilter::default(),
            options: BTreeMap::from([(String::from("lang"), Value::from("en"))]),
            columns: DEFAULT_SELECTION
                .iter()
                .map(|column| column.name().to_owned())
                .collect(),
            filter: None,
            filter_tree: None,
            sort: None,
            range: PageRange::default(),
            ignore_unknown_fields: false,
        }
    }
}

impl QueryRequest {
    /// Market whose endpoint receives the request.
    pub fn primary_market(&self) -> &str {
        self.markets
            .first()
            .map(String::as_str)
            .filter(|market| !market.trim().is_empty())
            .unwrap_or(DEFAULT_MARKET)
    }
}

/// `symbols` block: symbol-type query plus explicit tickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolsFilter {
    pub query: SymbolQuery,
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolQuery {
    pub types: Vec<String>,
}

/// Sort direction token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    #[serde(rename = "sortBy")]
    pub column: String,
    #[serde(rename = "sortOrder")]
    pub order: SortOrder,
    #[serde(rename = "nullsFirst", default, skip_serializing_if = "Option::is_none")]
    pub nulls_first: Option<bool>,
}

/// Result window `[start, end]`, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    pub const fn new(start: u32, end: u32) -> Result<Self, ConstructionError> {
        if start > end {
            return Err(ConstructionError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(self) -> u32 {
        self.start
    }

    pub const fn end(self) -> u32 {
        self.end
    }

    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Keeps `start`, sets the window width to `size`.
    pub const fn with_size(self, size: u32) -> Self {
        Self {
            start: self.start,
            end: self.start.saturating_add(size),
        }
    }

    /// Moves to `start` with the default page width.
    pub const fn at(start: u32) -> Self {
        Self {
            start,
            end: start.saturating_add(DEFAULT_PAGE_SIZE),
        }
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self::at(0)
    }
}

impl TryFrom<[u32; 2]> for PageRange {
    type Error = ConstructionError;

    fn try_from([start, end]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl From<PageRange> for [u32; 2] {
    fn from(value: PageRange) -> Self {
        [value.start, value.end]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_match_scanner_expectations() {
        let request = QueryRequest::default();
        let encoded = serde_json::to_value(&request).expect("request should serialize");

        assert_eq!(
            encoded,
            json!({
                "markets": ["america"],
                "symbols": {"query": {"types": []}, "tickers": []},
                "options": {"lang": "en"},
                "columns": ["name", "close", "volume", "market_cap_basic"],
                "range": [0, 50],
                "ignore_unknown_fields": false
            })
        );
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert_eq!(
            PageRange::new(10, 5).expect_err("inverted"),
            ConstructionError::InvalidRange { start: 10, end: 5 }
        );

        let decoded = serde_json::from_value::<PageRange>(json!([10, 5]));
        assert!(decoded.is_err());
    }

    #[test]
    fn range_helpers_keep_start_or_reset_width() {
        let range = PageRange::at(20);
        assert_eq!((range.start(), range.end()), (20, 70));

        let resized = range.with_size(5);
        assert_eq!((resized.start(), resized.end()), (20, 25));
        assert_eq!(resized.len(), 5);

        let saturated = PageRange::at(u32::MAX);
        assert_eq!(saturated.end(), u32::MAX);
        assert!(saturated.is_empty());
    }

    #[test]
    fn sort_omits_unset_nulls_first() {
        let sort = SortBy {
            column: String::from("volume"),
            order: SortOrder::Desc,
            nulls_first: None,
        };
        assert_eq!(
            serde_json::to_value(&sort).expect("sort should serialize"),
            json!({"sortBy": "volume", "sortOrder": "desc"})
        );
    }

    #[test]
    fn primary_market_falls_back_to_default() {
        let mut request = QueryRequest::default();
        request.markets = vec![String::from("japan"), String::from("crypto")];
        assert_eq!(request.primary_market(), "japan");

        request.markets.clear();
        assert_eq!(request.primary_market(), DEFAULT_MARKET);
    }
}
