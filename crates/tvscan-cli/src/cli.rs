//! CLI argument definitions for tvscan.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Screen a market with price, volume and classification filters |
//! | `columns` | List the bundled column catalog |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Answer scans offline with an empty result |
//! | `--timeout-ms` | env or `10000` | Request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Ten most traded US stocks above $100
//! tvscan scan --min-price 100 --order-by volume --descending --limit 10
//!
//! # Technology stocks on NASDAQ as JSON
//! tvscan --format json --pretty scan --exchange NASDAQ --sector "Technology Services"
//!
//! # Print the request body without sending it
//! tvscan scan -m japan --min-market-cap 1e9 --dry-run
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tvscan_core::Operand;

/// tvscan - TradingView market screener CLI
///
/// Builds scanner queries from flags, sends them to the TradingView scanner and
/// renders the matching symbols.
#[derive(Debug, Parser)]
#[command(
    name = "tvscan",
    author,
    version,
    about = "TradingView market screener CLI",
    long_about = "tvscan screens TradingView markets from the terminal. Filters given as flags \
are translated into scanner predicates, results are printed as a table or JSON.\n\
\n\
Set RUST_LOG=tvscan_core=debug to trace outgoing requests.\n\
\n\
Use 'tvscan <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use the offline transport; every scan returns an empty result.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Request timeout in milliseconds. Overrides TVSCAN_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    Table,
    /// JSON in the scanner's response shape.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a market for symbols matching the given criteria.
    ///
    /// # Examples
    ///
    ///   tvscan scan --min-price 10 --max-price 50
    ///   tvscan scan -m america --exchange NYSE --order-by market_cap --descending
    ///   tvscan scan --ticker NASDAQ:AAPL --ticker NASDAQ:MSFT
    Scan(ScanArgs),

    /// List the bundled column catalog as label and wire name.
    Columns,
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Market to scan (e.g. america, japan, crypto).
    #[arg(short = 'm', long)]
    pub market: Option<String>,

    /// Minimum closing price.
    #[arg(long, value_parser = parse_number)]
    pub min_price: Option<Operand>,

    /// Maximum closing price.
    #[arg(long, value_parser = parse_number)]
    pub max_price: Option<Operand>,

    /// Minimum volume.
    #[arg(long, value_parser = parse_number)]
    pub min_volume: Option<Operand>,

    /// Maximum volume.
    #[arg(long, value_parser = parse_number)]
    pub max_volume: Option<Operand>,

    /// Minimum market capitalization.
    #[arg(long, value_parser = parse_number)]
    pub min_market_cap: Option<Operand>,

    /// Maximum market capitalization.
    #[arg(long, value_parser = parse_number)]
    pub max_market_cap: Option<Operand>,

    /// Exchange (e.g. NASDAQ, NYSE).
    #[arg(long)]
    pub exchange: Option<String>,

    /// Sector (e.g. "Technology").
    #[arg(long)]
    pub sector: Option<String>,

    /// Industry (e.g. "Semiconductors").
    #[arg(long)]
    pub industry: Option<String>,

    /// Maximum number of results.
    #[arg(short = 'l', long)]
    pub limit: Option<u32>,

    /// Index of the first result.
    #[arg(long)]
    pub offset: Option<u32>,

    /// Column to sort by, as a catalog label or wire name.
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort in descending order.
    #[arg(long, default_value_t = false)]
    pub descending: bool,

    /// Restrict the scan to explicit `EXCHANGE:SYMBOL` tickers. Repeatable.
    #[arg(long = "ticker")]
    pub tickers: Vec<String>,

    /// Print the request body instead of sending it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

fn parse_number(raw: &str) -> Result<Operand, String> {
    Operand::number(raw).ok_or_else(|| format!("'{raw}' is not a finite number"))
}
