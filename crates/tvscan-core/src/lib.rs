//! # tvscan Core
//!
//! Typed query builder and wire codec for the TradingView market scanner.
//!
//! ## Overview
//!
//! This crate provides the building blocks for screening queries:
//!
//! - **Column catalog** of well-known scanner fields
//! - **Filter operations** built from named methods on a column
//! - **Comparison trees** composing filters with `and`/`or`
//! - **Query builder** accumulating columns, filters, sort, markets and paging
//! - **Wire codec** producing the scanner's exact JSON and decoding its rows
//! - **Screener client** over an injectable HTTP transport
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Scan execution with optional cancellation |
//! | [`column`] | `Column` handle and its filter constructors |
//! | [`columns`] | Catalog of scanner fields |
//! | [`config`] | Endpoint, timeout and header configuration |
//! | [`error`] | Error types |
//! | [`filter`] | Filter operations, operation kinds and operands |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`query`] | Chainable query builder |
//! | [`request`] | Scan request model |
//! | [`response`] | Decoded scan results |
//! | [`tree`] | AND/OR comparison trees |
//! | [`wire`] | Request encoding and response decoding |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tvscan_core::columns::{CLOSE, MARKET_CAP, NAME, VOLUME};
//! use tvscan_core::{Query, ScreenerClient, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ScreenerClient::default();
//!
//!     let result = Query::new()
//!         .select([NAME, CLOSE, VOLUME, MARKET_CAP])
//!         .filter([CLOSE.greater_than(100), VOLUME.greater_than(1_000_000)])
//!         .order_by(VOLUME, SortOrder::Desc)
//!         .limit(10)
//!         .execute(&client)
//!         .await?;
//!
//!     for row in &result.rows {
//!         println!("{} {:?}", row.symbol, row.values);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Column catalog  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ FilterOperation │────▶│ ComparisonTree   │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────────────────────────────┐
//! │ Query (QueryRequest accumulator)        │
//! └────────┬────────────────────────────────┘
//!          │ wire::encode_request
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ ScreenerClient  │────▶│ HTTP Client      │
//! │                 │     │ (reqwest/noop)   │
//! └────────┬────────┘     └──────────────────┘
//!          │ wire::decode_response
//!          ▼
//! ┌─────────────────┐
//! │ ScreenerResult  │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every fallible call returns [`ScreenerError`], classified by kind:
//!
//! ```rust
//! use tvscan_core::{ErrorKind, ScreenerError};
//!
//! fn handle_error(error: ScreenerError) {
//!     match error.kind() {
//!         ErrorKind::Construction | ErrorKind::Serialization => {
//!             // Fix the query
//!         }
//!         ErrorKind::Transport => {
//!             // Caller decides whether to retry
//!         }
//!         ErrorKind::Decode | ErrorKind::Cancelled => {}
//!     }
//! }
//! ```

pub mod client;
pub mod column;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod query;
pub mod request;
pub mod response;
pub mod tree;
pub mod wire;

// Re-export commonly used types at crate root for convenience

// Builder types
pub use column::Column;
pub use filter::{FilterOperation, Operand, OperandShape, OperationKind};
pub use query::Query;
pub use tree::{ComparisonNode, ComparisonTree, LogicalOperator};

// Request and response model
pub use request::{
    PageRange, QueryRequest, SortBy, SortOrder, SymbolQuery, SymbolsFilter, DEFAULT_MARKET,
    DEFAULT_PAGE_SIZE,
};
pub use response::{ScreenerResult, ScreenerRow};

// Client and configuration
pub use client::ScreenerClient;
pub use config::ScreenerConfig;

// Error types
pub use error::{
    ConstructionError, DecodeError, ErrorKind, ScreenerError, SerializationError, TransportError,
};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Re-exported so callers can cancel scans without naming tokio-util.
pub use tokio_util::sync::CancellationToken;
