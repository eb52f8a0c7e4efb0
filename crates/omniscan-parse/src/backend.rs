//! Document backend trait.
//!
//! Defines the [`StatementBackend`] trait that abstracts the document object
//! model. A backend only has to hand over, per page, the decoded content
//! stream bytes and the facts about each font resource; tokenizing,
//! decoding and row reconstruction happen above it.

use omniscan_core::ScanError;

use crate::font::FontDescriptor;

/// Everything the text-run extractor needs from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    /// Decoded content stream bytes. Multiple streams are joined by a space.
    pub content: Vec<u8>,
    /// Font resources reachable from the page.
    pub fonts: Vec<FontDescriptor>,
}

/// Trait abstracting document parsing operations.
///
/// # Associated Types
///
/// - `Document`: The parsed document representation.
/// - `Error`: Backend-specific error type, convertible to [`ScanError`].
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// for index in 0..MyBackend::page_count(&doc) {
///     let page = MyBackend::page_content(&doc, index)?;
/// }
/// ```
pub trait StatementBackend {
    /// The parsed document type.
    type Document;

    /// Backend-specific error type, convertible to [`ScanError`].
    type Error: std::error::Error + Into<ScanError>;

    /// Parse document bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable document.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Content bytes and font descriptors of the page at 0-based `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page's content
    /// or resources cannot be resolved.
    fn page_content(doc: &Self::Document, index: usize) -> Result<PageContent, Self::Error>;
}
