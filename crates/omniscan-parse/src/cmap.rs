//! ToUnicode CMap parser and decoder for composite fonts.
//!
//! A CMap program declares which byte strings are valid character codes
//! (`codespacerange`) and how codes map to Unicode (`bfchar`, `bfrange`).
//! Parsing is lenient: malformed entries are skipped and construction never
//! fails. Decoding is total: anything unmappable becomes U+FFFD.

use std::borrow::Cow;
use std::collections::HashMap;

use omniscan_core::REPLACEMENT_CHAR;

/// Longest character code a codespace range may declare, in bytes.
const MAX_CODE_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CodeRange {
    low: Vec<u8>,
    high: Vec<u8>,
}

impl CodeRange {
    fn contains(&self, code: &[u8]) -> bool {
        code.len() == self.low.len() && self.low.as_slice() <= code && code <= self.high.as_slice()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RangeTarget {
    /// Destination for `low`; later codes add their offset to it.
    Offset(Vec<u8>),
    /// One destination per code, starting at `low`.
    List(Vec<Vec<u8>>),
}

#[derive(Debug, Clone, PartialEq)]
struct BfRange {
    span: CodeRange,
    target: RangeTarget,
}

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CMap {
    /// Codespace ranges, indexed by code length minus one.
    codespace: [Vec<CodeRange>; MAX_CODE_LEN],
    bfchar: HashMap<Vec<u8>, String>,
    bfrange: Vec<BfRange>,
}

impl CMap {
    /// Parse a CMap program.
    pub fn parse(data: &[u8]) -> Self {
        let mut cmap = CMap::default();
        let mut section: Option<Section> = None;
        let mut declared: Option<i64> = None;
        let mut entries: Vec<Entry> = Vec::new();
        let mut tokens = lex(data).into_iter();

        while let Some(token) = tokens.next() {
            match token {
                Token::Keyword(word) => {
                    if let Some(opened) = Section::opened_by(&word) {
                        section = Some(opened);
                        entries.clear();
                    } else if let Some(current) = section.filter(|s| s.closed_by(&word)) {
                        if let Some(count) = declared.filter(|&n| {
                            usize::try_from(n)
                                .ok()
                                .and_then(|n| n.checked_mul(current.arity()))
                                != Some(entries.len())
                        }) {
                            tracing::debug!(
                                section = current.name(),
                                declared = count,
                                found = entries.len() / current.arity(),
                                "CMap section entry count differs from declaration"
                            );
                        }
                        cmap.apply(current, &entries);
                        section = None;
                        declared = None;
                    }
                }
                Token::Int(n) if section.is_none() => declared = Some(n),
                Token::Hex(bytes) if section.is_some() => entries.push(Entry::Code(bytes)),
                Token::ArrayOpen if section.is_some() => {
                    let mut list = Vec::new();
                    for inner in tokens.by_ref() {
                        match inner {
                            Token::Hex(bytes) => list.push(bytes),
                            Token::ArrayClose => break,
                            _ => {}
                        }
                    }
                    entries.push(Entry::List(list));
                }
                _ => {}
            }
        }

        cmap
    }

    /// Decode a byte string shown with this CMap.
    ///
    /// For each position, code lengths 1 through 4 are tried in ascending
    /// order and the first codespace range containing the next `n` bytes
    /// wins. The code then resolves through `bfchar` before `bfrange`.
    /// Unresolved codes and bytes outside every codespace range each yield
    /// one U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes;

        while !rest.is_empty() {
            match self.code_length(rest) {
                Some(n) => {
                    let (code, tail) = rest.split_at(n);
                    match self.lookup(code) {
                        Some(text) => out.push_str(&text),
                        None => {
                            tracing::trace!(code = ?code, "unmapped CMap code");
                            out.push(REPLACEMENT_CHAR);
                        }
                    }
                    rest = tail;
                }
                None => {
                    tracing::trace!(byte = rest[0], "byte outside every codespace range");
                    out.push(REPLACEMENT_CHAR);
                    rest = &rest[1..];
                }
            }
        }

        out
    }

    /// Unicode text for a complete character code, if mapped.
    pub fn lookup(&self, code: &[u8]) -> Option<Cow<'_, str>> {
        if let Some(text) = self.bfchar.get(code) {
            return Some(Cow::Borrowed(text));
        }
        self.bfrange
            .iter()
            .find(|range| range.span.contains(code))
            .and_then(|range| {
                match &range.target {
                    RangeTarget::Offset(dst) => Some(Cow::Owned(decode_destination(
                        &shift_last_byte(dst, code, &range.span.low),
                    ))),
                    RangeTarget::List(dsts) => {
                        let offset = code_value(code) - code_value(&range.span.low);
                        dsts.get(offset as usize)
                            .map(|dst| Cow::Owned(decode_destination(dst)))
                    }
                }
            })
    }

    /// Append `other`'s tables after this map's own.
    ///
    /// Codes this map already defines keep their mapping.
    pub fn merge(&mut self, other: CMap) {
        for (mine, theirs) in self.codespace.iter_mut().zip(other.codespace) {
            for range in theirs {
                if !mine.contains(&range) {
                    mine.push(range);
                }
            }
        }
        for (code, text) in other.bfchar {
            self.bfchar.entry(code).or_insert(text);
        }
        self.bfrange.extend(other.bfrange);
    }

    /// Returns `true` if the program declared at least one codespace range.
    pub fn has_codespace(&self) -> bool {
        self.codespace.iter().any(|ranges| !ranges.is_empty())
    }

    /// Number of `bfchar` plus `bfrange` entries.
    pub fn mapping_count(&self) -> usize {
        self.bfchar.len() + self.bfrange.len()
    }

    /// Returns `true` if the map has no mappings at all.
    pub fn is_empty(&self) -> bool {
        self.mapping_count() == 0
    }

    /// Length of the code at the start of `bytes`, per the codespace.
    fn code_length(&self, bytes: &[u8]) -> Option<usize> {
        if !self.has_codespace() {
            // Implicit <0000> <FFFF>.
            return (bytes.len() >= 2).then_some(2);
        }
        (1..=bytes.len().min(MAX_CODE_LEN))
            .find(|&n| self.codespace[n - 1].iter().any(|r| r.contains(&bytes[..n])))
    }

    fn apply(&mut self, section: Section, entries: &[Entry]) {
        match section {
            Section::Codespace => {
                for pair in entries.chunks_exact(2) {
                    match pair {
                        [Entry::Code(low), Entry::Code(high)]
                            if low.len() == high.len() && (1..=MAX_CODE_LEN).contains(&low.len()) =>
                        {
                            self.codespace[low.len() - 1].push(CodeRange {
                                low: low.clone(),
                                high: high.clone(),
                            });
                        }
                        _ => tracing::debug!("skipping malformed codespace range"),
                    }
                }
            }
            Section::BfChar => {
                for pair in entries.chunks_exact(2) {
                    if let [Entry::Code(src), Entry::Code(dst)] = pair {
                        self.bfchar
                            .entry(src.clone())
                            .or_insert_with(|| decode_destination(dst));
                    }
                }
            }
            Section::BfRange => {
                for triple in entries.chunks_exact(3) {
                    let [Entry::Code(low), Entry::Code(high), target] = triple else {
                        tracing::debug!("skipping malformed bfrange entry");
                        continue;
                    };
                    if low.len() != high.len() || low.len() > MAX_CODE_LEN {
                        continue;
                    }
                    let target = match target {
                        Entry::Code(dst) => RangeTarget::Offset(dst.clone()),
                        Entry::List(dsts) => RangeTarget::List(dsts.clone()),
                    };
                    self.bfrange.push(BfRange {
                        span: CodeRange {
                            low: low.clone(),
                            high: high.clone(),
                        },
                        target,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Codespace,
    BfChar,
    BfRange,
}

impl Section {
    fn opened_by(keyword: &str) -> Option<Self> {
        match keyword {
            "begincodespacerange" => Some(Self::Codespace),
            "beginbfchar" => Some(Self::BfChar),
            "beginbfrange" => Some(Self::BfRange),
            _ => None,
        }
    }

    fn closed_by(&self, keyword: &str) -> bool {
        keyword == format!("end{}", self.name())
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Codespace => "codespacerange",
            Self::BfChar => "bfchar",
            Self::BfRange => "bfrange",
        }
    }

    fn arity(&self) -> usize {
        match self {
            Self::Codespace | Self::BfChar => 2,
            Self::BfRange => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Code(Vec<u8>),
    List(Vec<Vec<u8>>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    Int(i64),
    Keyword(String),
    ArrayOpen,
    ArrayClose,
}

/// Split a CMap program into the tokens the section parser cares about.
///
/// Names, literal strings and dictionary brackets are consumed and dropped.
fn lex(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < data.len() {
        match data[i] {
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if data.get(i + 1) == Some(&b'<') => i += 2,
            b'>' if data.get(i + 1) == Some(&b'>') => i += 2,
            b'<' => {
                i += 1;
                let mut nibbles = Vec::new();
                while i < data.len() && data[i] != b'>' {
                    if let Some(v) = (data[i] as char).to_digit(16) {
                        nibbles.push(v as u8);
                    }
                    i += 1;
                }
                i += 1;
                if nibbles.len() % 2 != 0 {
                    nibbles.push(0);
                }
                tokens.push(Token::Hex(
                    nibbles.chunks(2).map(|p| (p[0] << 4) | p[1]).collect(),
                ));
            }
            b'[' => {
                tokens.push(Token::ArrayOpen);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayClose);
                i += 1;
            }
            b'(' => {
                let mut depth = 0usize;
                while i < data.len() {
                    match data[i] {
                        b'\\' => i += 1,
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                i += 1;
            }
            b'/' => {
                i += 1;
                while i < data.len() && is_word_byte(data[i]) {
                    i += 1;
                }
            }
            b if b.is_ascii_digit() || b == b'-' => {
                let start = i;
                i += 1;
                while i < data.len() && data[i].is_ascii_digit() {
                    i += 1;
                }
                if let Ok(n) = std::str::from_utf8(&data[start..i]).unwrap_or("").parse() {
                    tokens.push(Token::Int(n));
                }
            }
            b if b.is_ascii_alphabetic() => {
                let start = i;
                while i < data.len() && is_word_byte(data[i]) {
                    i += 1;
                }
                tokens.push(Token::Keyword(
                    String::from_utf8_lossy(&data[start..i]).into_owned(),
                ));
            }
            _ => i += 1,
        }
    }

    tokens
}

fn is_word_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !b"()<>[]{}/%".contains(&b)
}

/// Big-endian integer value of a code of at most four bytes.
fn code_value(code: &[u8]) -> u32 {
    code.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Shift the destination's last byte by the distance between the last
/// bytes of `code` and `low`, wrapping within that byte.
fn shift_last_byte(dst: &[u8], code: &[u8], low: &[u8]) -> Vec<u8> {
    let mut out = dst.to_vec();
    if let (Some(last), Some(&c), Some(&l)) = (out.last_mut(), code.last(), low.last()) {
        *last = last.wrapping_add(c.wrapping_sub(l));
    }
    out
}

/// Decode a UTF-16BE destination string. A single byte is one code unit.
fn decode_destination(dst: &[u8]) -> String {
    match dst {
        [] => String::new(),
        [single] => char::from(*single).to_string(),
        _ => {
            let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(dst);
            text.into_owned()
        }
    }
}
