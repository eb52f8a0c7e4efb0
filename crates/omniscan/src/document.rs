//! A loaded statement document.
//!
//! [`Document`] reads every page's content stream up front. Each page
//! decodes with its own fonts first; a font name the page does not declare
//! falls back to the document-wide table built from all pages, so a page
//! can still use a font whose resource dictionary lives on another page.

use omniscan_core::{Row, ScanError, ScanOptions, TextRun, group_rows};
use omniscan_parse::{FontTable, LopdfBackend, StatementBackend, extract_text_runs};

#[derive(Debug, Clone)]
struct Page {
    content: Vec<u8>,
    fonts: FontTable,
}

/// Page contents plus their font tables.
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
    fonts: FontTable,
}

impl Document {
    /// Open a PDF from bytes with the lopdf backend.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ResourceLimitExceeded`] if the input or page
    /// count exceeds `options`, and [`ScanError::Structural`] if the
    /// document or one of its pages cannot be read.
    pub fn open(bytes: &[u8], options: &ScanOptions) -> Result<Self, ScanError> {
        Self::load::<LopdfBackend>(bytes, options)
    }

    /// Open a document with any [`StatementBackend`].
    ///
    /// # Errors
    ///
    /// Same as [`Document::open`].
    pub fn load<B: StatementBackend>(bytes: &[u8], options: &ScanOptions) -> Result<Self, ScanError> {
        options.check_input_size(bytes.len())?;
        let doc = B::open(bytes).map_err(Into::<ScanError>::into)?;
        let page_count = B::page_count(&doc);
        options.check_page_count(page_count)?;

        let mut raw = Vec::with_capacity(page_count);
        let mut fonts = FontTable::new();
        for index in 0..page_count {
            let page = B::page_content(&doc, index).map_err(Into::<ScanError>::into)?;
            fonts.absorb(&page.fonts);
            raw.push(page);
        }
        let pages = raw
            .into_iter()
            .map(|page| Page {
                fonts: FontTable::from_descriptors(&page.fonts).with_fallback(&fonts),
                content: page.content,
            })
            .collect();
        tracing::debug!(pages = page_count, fonts = fonts.len(), "loaded document");

        Ok(Self { pages, fonts })
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Document-wide font table, first definition of each name winning.
    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// Text runs of page `index` (0-based), in emission order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Structural`] for an out-of-range index or a
    /// malformed content stream.
    pub fn page_runs(&self, index: usize) -> Result<Vec<TextRun>, ScanError> {
        let page = self.pages.get(index).ok_or_else(|| {
            ScanError::Structural(format!(
                "page index {index} out of range (0..{})",
                self.pages.len()
            ))
        })?;
        extract_text_runs(&page.content, &page.fonts).map_err(Into::into)
    }

    /// Rows of page `index` (0-based), top to bottom.
    ///
    /// # Errors
    ///
    /// Same as [`Document::page_runs`].
    pub fn page_rows(&self, index: usize, tolerance: f64) -> Result<Vec<Row>, ScanError> {
        Ok(group_rows(self.page_runs(index)?, tolerance))
    }
}
