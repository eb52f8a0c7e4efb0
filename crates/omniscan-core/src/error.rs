//! Error type for statement scanning.
//!
//! Provides [`ScanError`], the single failure type returned by a scan.
//! Text that cannot be decoded is not an error: it surfaces inline as
//! U+FFFD and the scan continues.

use std::fmt;

/// Fatal conditions that end a scan without a result.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// The document could not be loaded or a page could not be read.
    Structural(String),
    /// No parser is registered for the requested provider key.
    UnsupportedProvider(String),
    /// Parsing finished without finding a single transaction.
    EmptyResult,
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// Reading the statement from disk failed.
    Io(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Structural(msg) => write!(f, "malformed document: {msg}"),
            ScanError::UnsupportedProvider(key) => write!(f, "unsupported provider: {key}"),
            ScanError::EmptyResult => write!(f, "no transactions found in statement"),
            ScanError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            ScanError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err.to_string())
    }
}
