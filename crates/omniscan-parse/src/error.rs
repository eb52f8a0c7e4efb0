//! Error types for the backend and content stream layers.
//!
//! Uses [`thiserror`] for derivation. [`BackendError`] collapses into
//! [`ScanError::Structural`] at the scan boundary, since any failure here
//! means the document's object model could not be read.

use omniscan_core::ScanError;
use thiserror::Error;

/// Error type for document backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error loading the document or resolving its objects.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading document data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving a font dictionary.
    #[error("font error: {0}")]
    Font(String),

    /// A content stream could not be tokenized.
    #[error("content stream error: {0}")]
    Content(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] ScanError),
}

impl From<BackendError> for ScanError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => ScanError::Io(e.to_string()),
            BackendError::Core(e) => e,
            other => ScanError::Structural(other.to_string()),
        }
    }
}
