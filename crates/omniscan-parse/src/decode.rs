//! Shown-string decoding.

use omniscan_core::{SimpleEncoding, UTF16BE_BOM, is_pdf_doc_encoded, is_utf16be};

use crate::font::{EncodingMode, Font};

/// Decode the raw bytes of a shown string to text.
///
/// Bytes that are entirely valid PDFDocEncoding decode through that table
/// regardless of font. BOM-prefixed UTF-16BE decodes as Unicode. Anything
/// else goes through the active font's encoding, or PDFDoc when no font is
/// resolved.
pub fn decode_text(bytes: &[u8], font: Option<&Font>) -> String {
    match font.map(|f| &f.mode) {
        _ if is_pdf_doc_encoded(bytes) => SimpleEncoding::PdfDoc.decode_bytes(bytes),
        _ if is_utf16be(bytes) => {
            let (text, _) =
                encoding_rs::UTF_16BE.decode_without_bom_handling(&bytes[UTF16BE_BOM.len()..]);
            text.into_owned()
        }
        Some(EncodingMode::Simple(encoding)) => encoding.decode_bytes(bytes),
        Some(EncodingMode::Composite(cmap)) => cmap.decode(bytes),
        None => SimpleEncoding::PdfDoc.decode_bytes(bytes),
    }
}
