//! Scan orchestration: document → pages → rows → statement parser.

use omniscan_core::{ScanError, ScanOptions, ScanResult};
use omniscan_parse::{LopdfBackend, StatementBackend};

use crate::document::Document;
use crate::parser::StatementParser;
use crate::provider::Provider;

/// Scan a statement PDF with default options.
///
/// # Errors
///
/// See [`Scanner::scan`].
pub fn scan(provider_key: &str, bytes: &[u8]) -> Result<ScanResult, ScanError> {
    Scanner::default().scan(provider_key, bytes)
}

/// Runs scans with a fixed set of [`ScanOptions`].
///
/// # Example
///
/// ```ignore
/// use omniscan::{ScanOptions, Scanner};
///
/// let scanner = Scanner::new(ScanOptions { max_pages: Some(50), ..ScanOptions::default() });
/// let result = scanner.scan_file("bca", "statement.pdf")?;
/// for t in &result.transactions {
///     println!("{} {} {:.2}", t.date, t.direction, t.change);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    /// Create a scanner with the given options.
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a statement from PDF bytes with the lopdf backend.
    ///
    /// # Errors
    ///
    /// - [`ScanError::UnsupportedProvider`] for an unknown key, before the
    ///   bytes are looked at.
    /// - [`ScanError::ResourceLimitExceeded`] when a configured limit is hit.
    /// - [`ScanError::Structural`] when the document cannot be read.
    /// - [`ScanError::EmptyResult`] when no transaction was found.
    pub fn scan(&self, provider_key: &str, bytes: &[u8]) -> Result<ScanResult, ScanError> {
        self.scan_document::<LopdfBackend>(provider_key, bytes)
    }

    /// Read a statement from disk and scan it.
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::scan`], plus [`ScanError::Io`] if the file cannot
    /// be read.
    #[cfg(feature = "std")]
    pub fn scan_file(
        &self,
        provider_key: &str,
        path: impl AsRef<std::path::Path>,
    ) -> Result<ScanResult, ScanError> {
        let provider = Provider::from_key(provider_key)?;
        let bytes = std::fs::read(path.as_ref())?;
        let document = Document::load::<LopdfBackend>(&bytes, &self.options)?;
        self.run(provider, &document)
    }

    /// Scan with any [`StatementBackend`].
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::scan`].
    pub fn scan_document<B: StatementBackend>(
        &self,
        provider_key: &str,
        bytes: &[u8],
    ) -> Result<ScanResult, ScanError> {
        let provider = Provider::from_key(provider_key)?;
        let document = Document::load::<B>(bytes, &self.options)?;
        self.run(provider, &document)
    }

    /// Scan independent `(provider_key, bytes)` jobs on the rayon pool.
    ///
    /// Results are returned in input order.
    #[cfg(feature = "parallel")]
    pub fn scan_batch<K, D>(&self, jobs: &[(K, D)]) -> Vec<Result<ScanResult, ScanError>>
    where
        K: AsRef<str> + Sync,
        D: AsRef<[u8]> + Sync,
    {
        use rayon::prelude::*;

        jobs.par_iter()
            .map(|(key, bytes)| self.scan(key.as_ref(), bytes.as_ref()))
            .collect()
    }

    fn run(&self, provider: Provider, document: &Document) -> Result<ScanResult, ScanError> {
        let tolerance = self
            .options
            .row_tolerance
            .unwrap_or(provider.profile().row_tolerance);
        let mut parser = StatementParser::new(provider);

        for index in 0..document.page_count() {
            let rows = document.page_rows(index, tolerance)?;
            tracing::debug!(page = index + 1, rows = rows.len(), "scanning page");
            parser.begin_page(index + 1);
            for row in &rows {
                parser.feed_row(row);
            }
        }

        let result = parser.finish()?;
        tracing::info!(
            provider = %provider,
            pages = document.page_count(),
            transactions = result.transactions.len(),
            "scan complete"
        );
        Ok(result)
    }
}
