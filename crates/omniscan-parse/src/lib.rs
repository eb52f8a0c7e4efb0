//! omniscan-parse: PDF reading and text-run extraction.
//!
//! This crate turns one page of a document into positioned [`TextRun`]s.
//! A pluggable [`StatementBackend`] (lopdf by default) supplies content
//! bytes and font facts; the tokenizer, font table and CMap decoder here do
//! the rest. It depends on omniscan-core for shared data types.
//!
//! [`TextRun`]: omniscan_core::TextRun

pub mod backend;
pub mod cmap;
pub mod decode;
pub mod error;
pub mod font;
pub mod lopdf_backend;
pub mod text_extraction;
pub mod tokenizer;

pub use backend::{PageContent, StatementBackend};
pub use cmap::CMap;
pub use decode::decode_text;
pub use error::BackendError;
pub use font::{EncodingMode, Font, FontDescriptor, FontTable};
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use omniscan_core;
pub use text_extraction::extract_text_runs;
pub use tokenizer::{Operand, Operator, tokenize};
