use std::io::{self, IsTerminal, Write};
use std::path::Path;

use omniscan::{Document, ScanError, ScanOptions};

use crate::page_range::parse_page_range;

/// Read a PDF into a [`Document`], printing a message on failure.
///
/// Returns `Err(1)` if the file is missing, unreadable, or not a valid PDF.
pub fn open_document(file: &Path, options: &ScanOptions) -> Result<Document, i32> {
    let bytes = read_file(file)?;
    Document::open(&bytes, options).map_err(report_error)
}

/// Read a file, printing a message on failure.
pub fn read_file(file: &Path) -> Result<Vec<u8>, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    std::fs::read(file).map_err(|e| report_error(ScanError::from(e)))
}

/// Print a scan error to stderr and return the exit code.
pub fn report_error(err: ScanError) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// `None` selects every page.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Collapse a multi-line field onto one line for tabular output.
pub fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" / ")
}

/// Prints "Processing page N/M..." to stderr when stderr is a terminal.
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    /// Create a reporter for `total` pages.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report page `current` (1-indexed).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rProcessing page {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line.
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}
