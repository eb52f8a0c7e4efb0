//! omniscan-core: backend-independent data types and algorithms.
//!
//! Holds the fixed encoding tables, the positioned [`TextRun`], row
//! reconstruction, and the statement data model returned by a scan.

pub mod encoding;
pub mod error;
pub mod options;
pub mod row;
pub mod statement;
pub mod text;

pub use encoding::{
    REPLACEMENT_CHAR, SimpleEncoding, UTF16BE_BOM, is_pdf_doc_encoded, is_utf16be,
};
pub use error::ScanError;
pub use options::ScanOptions;
pub use row::{DEFAULT_ROW_TOLERANCE, Row, group_rows};
pub use statement::{Direction, ScanResult, StatementHeader, Transaction, push_line};
pub use text::TextRun;

pub use chrono::NaiveDate;
