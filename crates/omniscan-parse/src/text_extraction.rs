//! Text-run extraction from a tokenized content stream.
//!
//! Walks the operator sequence with a two-state machine (outside / inside a
//! `BT`..`ET` block) and emits one [`TextRun`] per block that showed text.
//! Glyph metrics are not modeled: a run is positioned at the point where
//! its first string was shown.

use omniscan_core::TextRun;

use crate::decode::decode_text;
use crate::error::BackendError;
use crate::font::FontTable;
use crate::tokenizer::{Operand, Operator, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    OutsideText,
    InTextBlock,
}

/// Extract text runs from raw page content bytes.
///
/// # Errors
///
/// Returns [`BackendError::Content`] if the stream cannot be tokenized.
pub fn extract_text_runs(content: &[u8], fonts: &FontTable) -> Result<Vec<TextRun>, BackendError> {
    let operators = tokenize(content)?;
    Ok(TextRunExtractor::new(fonts).run(&operators))
}

struct TextRunExtractor<'a> {
    fonts: &'a FontTable,
    state: BlockState,
    font_id: String,
    font_size: f64,
    x: f64,
    y: f64,
    /// Position of the first string shown in the current block.
    anchor: Option<(f64, f64)>,
    /// Y of the most recent string shown in the current block.
    line_y: f64,
    text: String,
    runs: Vec<TextRun>,
}

impl<'a> TextRunExtractor<'a> {
    fn new(fonts: &'a FontTable) -> Self {
        Self {
            fonts,
            state: BlockState::OutsideText,
            font_id: String::new(),
            font_size: 0.0,
            x: 0.0,
            y: 0.0,
            anchor: None,
            line_y: 0.0,
            text: String::new(),
            runs: Vec::new(),
        }
    }

    fn run(mut self, operators: &[Operator]) -> Vec<TextRun> {
        for op in operators {
            let operands = op.operands.as_slice();
            match (self.state, op.name.as_str()) {
                (_, "Tf") => self.set_font(operands),
                (BlockState::OutsideText, "BT") => self.begin_block(),
                (BlockState::InTextBlock, "BT") => {
                    tracing::trace!("nested BT, closing the open block first");
                    self.end_block();
                    self.begin_block();
                }
                (BlockState::InTextBlock, "ET") => self.end_block(),
                (BlockState::InTextBlock, "Tm") => {
                    if let (Some(x), Some(y)) = (number(operands, 4), number(operands, 5)) {
                        self.x = x;
                        self.y = y;
                    }
                }
                (BlockState::InTextBlock, "Td" | "TD") => {
                    if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                        self.x += tx;
                        self.y += ty;
                    }
                }
                (BlockState::InTextBlock, "Tj" | "'") => {
                    if let Some(bytes) = operands.first().and_then(Operand::as_string_bytes) {
                        self.show(bytes);
                    }
                }
                (BlockState::InTextBlock, "\"") => {
                    if let Some(bytes) = operands.last().and_then(Operand::as_string_bytes) {
                        self.show(bytes);
                    }
                }
                (BlockState::InTextBlock, "TJ") => {
                    if let Some(Operand::Array(items)) = operands.first() {
                        let strings: Vec<&[u8]> =
                            items.iter().filter_map(Operand::as_string_bytes).collect();
                        if !strings.is_empty() {
                            self.show_all(&strings);
                        }
                    }
                }
                _ => {}
            }
        }

        if self.state == BlockState::InTextBlock {
            tracing::debug!("content stream ended inside a text block");
            self.end_block();
        }
        self.runs
    }

    fn set_font(&mut self, operands: &[Operand]) {
        if let Some(name) = operands.first().and_then(Operand::as_name) {
            self.font_id = name.to_string();
        }
        if let Some(size) = number(operands, 1) {
            self.font_size = size;
        }
        if self.fonts.get(&self.font_id).is_none() {
            tracing::warn!(font = %self.font_id, "unknown font resource, decoding as PDFDoc");
        }
    }

    fn begin_block(&mut self) {
        self.state = BlockState::InTextBlock;
        self.x = 0.0;
        self.y = 0.0;
        self.anchor = None;
        self.text.clear();
    }

    fn end_block(&mut self) {
        self.state = BlockState::OutsideText;
        if self.text.is_empty() {
            return;
        }
        let (x, y) = self.anchor.unwrap_or((self.x, self.y));
        self.runs.push(TextRun::new(
            self.font_id.clone(),
            self.font_size,
            x,
            y,
            std::mem::take(&mut self.text),
        ));
    }

    fn show(&mut self, bytes: &[u8]) {
        self.show_all(&[bytes]);
    }

    fn show_all(&mut self, strings: &[&[u8]]) {
        if self.anchor.is_none() {
            self.anchor = Some((self.x, self.y));
        } else if !self.text.is_empty() && (self.y - self.line_y).abs() > self.font_size {
            self.text.push('\n');
        }
        self.line_y = self.y;

        let font = self.fonts.get(&self.font_id);
        for bytes in strings {
            self.text.push_str(&decode_text(bytes, font));
        }
    }
}

fn number(operands: &[Operand], index: usize) -> Option<f64> {
    operands.get(index).and_then(Operand::as_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontDescriptor;

    fn extract(content: &[u8]) -> Vec<TextRun> {
        extract_text_runs(content, &FontTable::new()).unwrap()
    }

    #[test]
    fn single_block_with_td() {
        let runs = extract(b"BT /F1 12 Tf 72 700 Td (Hello) Tj ET");
        assert_eq!(runs, vec![TextRun::new("F1", 12.0, 72.0, 700.0, "Hello")]);
    }

    #[test]
    fn tm_sets_absolute_position() {
        let runs = extract(b"BT /F1 9 Tf 1 0 0 1 50 600 Tm (A) Tj ET");
        assert_eq!(runs[0].x, 50.0);
        assert_eq!(runs[0].y, 600.0);
    }

    #[test]
    fn td_accumulates() {
        let runs = extract(b"BT /F1 9 Tf 10 700 Td 5 -1 TD (A) Tj ET");
        assert_eq!((runs[0].x, runs[0].y), (15.0, 699.0));
    }

    #[test]
    fn bt_resets_position() {
        let runs = extract(b"BT /F1 9 Tf 10 700 Td (A) Tj ET BT 5 5 Td (B) Tj ET");
        assert_eq!((runs[1].x, runs[1].y), (5.0, 5.0));
    }

    #[test]
    fn font_persists_across_blocks() {
        let runs = extract(b"/F2 8 Tf BT (A) Tj ET BT (B) Tj ET");
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.font == "F2" && r.font_size == 8.0));
    }

    #[test]
    fn tj_array_concatenates_strings_ignoring_kerning() {
        let runs = extract(b"BT /F1 10 Tf 0 0 Td [(SAL) -120 (DO) 33.5 <20415741414C>] TJ ET");
        assert_eq!(runs[0].text, "SALDO AWAL");
    }

    #[test]
    fn quote_operators_show_text() {
        let runs = extract(b"BT /F1 10 Tf 0 10 Td (A) Tj (B) ' 1 2 (C) \" ET");
        assert_eq!(runs[0].text, "ABC");
    }

    #[test]
    fn hex_string_shown() {
        let runs = extract(b"BT <4869> Tj ET");
        assert_eq!(runs[0].text, "Hi");
    }

    #[test]
    fn empty_block_emits_nothing() {
        assert!(extract(b"BT /F1 10 Tf 10 10 Td ET").is_empty());
        assert!(extract(b"BT () Tj ET").is_empty());
    }

    #[test]
    fn text_outside_block_is_ignored() {
        assert!(extract(b"(stray) Tj").is_empty());
    }

    #[test]
    fn multi_line_cell_joins_with_newline() {
        let runs = extract(
            b"BT /F1 8 Tf 60 500 Td (TRSF E-BANKING) Tj 0 -10 Td (0101/FTSCY/WS95031) Tj ET",
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "TRSF E-BANKING\n0101/FTSCY/WS95031");
        // Anchored at the first shown line.
        assert_eq!((runs[0].x, runs[0].y), (60.0, 500.0));
    }

    #[test]
    fn small_vertical_move_does_not_break_line() {
        let runs = extract(b"BT /F1 8 Tf 0 500 Td (A) Tj 20 -3 Td (B) Tj ET");
        assert_eq!(runs[0].text, "AB");
    }

    #[test]
    fn moves_before_first_show_do_not_break_line() {
        let runs = extract(b"BT /F1 8 Tf 0 500 Td 0 -50 Td (A) Tj ET");
        assert_eq!(runs[0].text, "A");
        assert_eq!(runs[0].y, 450.0);
    }

    #[test]
    fn repeated_moves_give_one_break() {
        let runs = extract(b"BT /F1 8 Tf 0 500 Td (A) Tj 0 -10 Td 0 -10 Td (B) Tj ET");
        assert_eq!(runs[0].text, "A\nB");
    }

    #[test]
    fn tm_line_break_uses_absolute_y() {
        let runs = extract(b"BT /F1 8 Tf 1 0 0 1 0 500 Tm (A) Tj 1 0 0 1 0 480 Tm (B) Tj ET");
        assert_eq!(runs[0].text, "A\nB");
    }

    #[test]
    fn unterminated_block_is_flushed() {
        let runs = extract(b"BT /F1 8 Tf 0 500 Td (A) Tj");
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn uses_font_table_for_composite_fonts() {
        let fonts = FontTable::from_descriptors(&[FontDescriptor::new("C0", Some("Identity-H"))
            .with_to_unicode(&b"1 beginbfrange\n<0000> <00FF> <0020>\nendbfrange"[..])]);
        let runs = extract_text_runs(b"BT /C0 10 Tf 0 0 Td <00410042> Tj ET", &fonts).unwrap();
        assert_eq!(runs[0].text, "ab");
    }

    #[test]
    fn tokenize_error_propagates() {
        let err = extract_text_runs(b"BT (unterminated Tj ET", &FontTable::new()).unwrap_err();
        assert!(matches!(err, BackendError::Content(_)));
    }
}
