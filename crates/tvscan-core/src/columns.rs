//! Catalog of well-known scanner fields.
//!
//! Each constant is a [`Column`] wrapping the exact wire name the scanner
//! expects. [`ALL`] enumerates the catalog with snake_case labels and
//! [`lookup`] resolves either a label or a wire name.
//!
//! ```
//! use tvscan_core::columns::{self, MARKET_CAP};
//!
//! assert_eq!(MARKET_CAP.name(), "market_cap_basic");
//! assert_eq!(columns::lookup("market_cap").map(|c| c.into_name()).as_deref(), Some("market_cap_basic"));
//! ```

use crate::column::Column;

macro_rules! column_catalog {
    ($( $(#[$meta:meta])* $ident:ident = $label:literal => $field:literal; )*) => {
        $(
            $(#[$meta])*
            pub const $ident: Column = Column::from_static($field);
        )*

        /// Every catalog entry as `(label, column)`, in declaration order.
        pub static ALL: &[(&str, Column)] = &[
            $( ($label, Column::from_static($field)), )*
        ];
    };
}

column_catalog! {
    // Basic information
    NAME = "name" => "name";
    DESCRIPTION = "description" => "description";
    TYPE = "type" => "type";
    SUBTYPE = "subtype" => "subtype";
    EXCHANGE = "exchange" => "exchange";
    SECTOR = "sector" => "sector";
    INDUSTRY = "industry" => "industry";

    // Price
    CLOSE = "close" => "close";
    OPEN = "open" => "open";
    HIGH = "high" => "high";
    LOW = "low" => "low";
    PREVIOUS_CLOSE = "previous_close" => "previous_close";
    VOLUME = "volume" => "volume";
    PRICE = "price" => "price";
    CHANGE = "change" => "change";
    CHANGE_PERCENT = "change_percent" => "change_percent";

    // Market data
    /// Basic market capitalization.
    MARKET_CAP = "market_cap" => "market_cap_basic";
    FLOATING_MARKET_CAP = "floating_market_cap" => "floating_market_cap";
    SHARES_OUTSTANDING = "shares_outstanding" => "shares_outstanding";
    FLOATING_SHARES = "floating_shares" => "floating_shares";

    // Technical indicators
    RSI = "rsi" => "RSI";
    MACD = "macd" => "MACD.macd";
    MACD_SIGNAL = "macd_signal" => "MACD.signal";
    MACD_HIST = "macd_hist" => "MACD.hist";
    EMA5 = "ema5" => "EMA5";
    EMA10 = "ema10" => "EMA10";
    EMA20 = "ema20" => "EMA20";
    EMA50 = "ema50" => "EMA50";
    EMA100 = "ema100" => "EMA100";
    EMA200 = "ema200" => "EMA200";
    SMA5 = "sma5" => "SMA5";
    SMA10 = "sma10" => "SMA10";
    SMA20 = "sma20" => "SMA20";
    SMA50 = "sma50" => "SMA50";
    SMA100 = "sma100" => "SMA100";
    SMA200 = "sma200" => "SMA200";
    VWAP = "vwap" => "VWAP";

    // Price statistics
    HIGH_52_WEEK = "high_52_week" => "High.52Week";
    LOW_52_WEEK = "low_52_week" => "Low.52Week";
    HIGH_ALL_TIME = "high_all_time" => "High.All";
    LOW_ALL_TIME = "low_all_time" => "Low.All";
    AVERAGE_VOLUME_10D = "average_volume_10d" => "average_volume_10d_calc";
    RELATIVE_VOLUME_10D = "relative_volume_10d" => "relative_volume_10d_calc";

    // Fundamentals
    PE_RATIO = "pe_ratio" => "price_earnings_ttm";
    PEG_RATIO = "peg_ratio" => "price_earnings_growth_ttm";
    PS_RATIO = "ps_ratio" => "price_sales_ttm";
    PB_RATIO = "pb_ratio" => "price_book_ttm";
    DIVIDEND_YIELD = "dividend_yield" => "dividend_yield_ttm";
    EPS = "eps" => "earnings_per_share_basic_ttm";
    REVENUE = "revenue" => "total_revenue_ttm";
    GROSS_PROFIT = "gross_profit" => "gross_profit_ttm";
    NET_INCOME = "net_income" => "net_income_ttm";
    OPERATING_MARGIN = "operating_margin" => "operating_margin_ttm";
    PROFIT_MARGIN = "profit_margin" => "profit_margin_ttm";
    ROE = "roe" => "return_on_equity_ttm";
    ROA = "roa" => "return_on_assets_ttm";
    DEBT_TO_EQUITY = "debt_to_equity" => "debt_to_equity_ttm";
    CURRENT_RATIO = "current_ratio" => "current_ratio_ttm";

    // Options
    IMPLIED_VOLATILITY = "implied_volatility" => "implied_volatility_30d";
    HISTORICAL_VOLATILITY = "historical_volatility" => "historical_volatility_30d";
    OPTION_VOLUME = "option_volume" => "option_volume";
    PUT_CALL_RATIO = "put_call_ratio" => "put_call_ratio";

    // Earnings and events
    EARNINGS_DATE = "earnings_date" => "earnings_release_next_date";
    EARNINGS_SURPRISE = "earnings_surprise" => "earnings_surprise_ttm";
    EARNINGS_GROWTH = "earnings_growth" => "earnings_growth_ttm";
    REVENUE_GROWTH = "revenue_growth" => "revenue_growth_ttm";

    // Analyst ratings
    ANALYST_RATING = "analyst_rating" => "analyst_rating";
    ANALYST_COUNT = "analyst_count" => "analyst_count";
    PRICE_TARGET = "price_target" => "price_target";
    RECOMMENDATION_MEAN = "recommendation_mean" => "recommendation_mean";

    // Short interest
    SHORT_INTEREST = "short_interest" => "short_interest";
    SHORT_INTEREST_RATIO = "short_interest_ratio" => "short_interest_ratio";
    SHORT_PERCENT_FLOAT = "short_percent_float" => "short_percent_float";
    DAYS_TO_COVER = "days_to_cover" => "days_to_cover";
}

/// Columns selected by a fresh query.
pub const DEFAULT_SELECTION: [Column; 4] = [NAME, CLOSE, VOLUME, MARKET_CAP];

/// Resolves a catalog label (`market_cap`) or wire name (`market_cap_basic`),
/// ignoring ASCII case.
pub fn lookup(name: &str) -> Option<Column> {
    let name = name.trim();
    ALL.iter()
        .find(|(label, column)| {
            label.eq_ignore_ascii_case(name) || column.name().eq_ignore_ascii_case(name)
        })
        .map(|(_, column)| column.clone())
}
