//! omniscan: extract transactions from bank-statement PDFs.
//!
//! This is the public API facade crate for omniscan. It re-exports types from
//! omniscan-core and uses omniscan-parse for PDF reading and text extraction.
//!
//! # Architecture
//!
//! - **omniscan-core**: Backend-independent data types and algorithms
//! - **omniscan-parse**: PDF reading, content-stream tokenizing, fonts and CMaps
//! - **omniscan** (this crate): Provider registry, statement parser and scan API
//!
//! # Example
//!
//! ```ignore
//! let bytes = std::fs::read("statement.pdf")?;
//! let result = omniscan::scan("bca", &bytes)?;
//! println!("{} transactions for {}", result.transactions.len(), result.header.account);
//! ```

mod document;
pub mod parser;
mod provider;
mod scanner;

pub use document::Document;
pub use omniscan_core::{
    DEFAULT_ROW_TOLERANCE, Direction, NaiveDate, Row, ScanError, ScanOptions, ScanResult,
    StatementHeader, TextRun, Transaction,
};
pub use parser::{ParserState, RowOutcome, StatementParser};
pub use provider::{
    Column, ColumnLayout, HeaderField, HeaderRule, Provider, ProviderProfile, XRange,
};
pub use scanner::{Scanner, scan};

pub use omniscan_core;
pub use omniscan_parse;
