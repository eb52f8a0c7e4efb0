use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Extract dated, directional transactions from bank-statement PDFs.
#[derive(Debug, Parser)]
#[command(name = "omniscan", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract the statement header and transactions
    Scan {
        /// Path to the statement PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Provider key (see `omniscan providers`)
        #[arg(long, short)]
        provider: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Vertical tolerance for row grouping. Default: the provider's own
        #[arg(long)]
        row_tolerance: Option<f64>,

        /// Refuse documents with more pages than this
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Dump reconstructed rows for calibrating column layouts
    Rows {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Vertical tolerance for row grouping (default: 2.0)
        #[arg(long, default_value_t = omniscan::DEFAULT_ROW_TOLERANCE)]
        tolerance: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List registered providers
    Providers,
}

/// Output format for `scan` and `rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, tab-separated
    Text,
    /// JSON
    Json,
}
