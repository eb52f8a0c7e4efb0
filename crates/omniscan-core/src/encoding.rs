//! Single-byte text encodings used by statement fonts.
//!
//! Provides the three fixed 256-entry tables a simple font can select
//! (PDFDocEncoding, WinAnsiEncoding, MacRomanEncoding) plus detection of
//! UTF-16BE literals marked with a byte order mark.
//!
//! Undefined codes decode to `None` from [`SimpleEncoding::decode`] and to
//! [`REPLACEMENT_CHAR`] from [`SimpleEncoding::decode_bytes`].

/// Placeholder emitted for any byte sequence that cannot be mapped.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Big-endian byte order mark that prefixes UTF-16 text strings.
pub const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// A fixed single-byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimpleEncoding {
    /// Windows code page 1252 as used by PDF (`/WinAnsiEncoding`).
    WinAnsi,
    /// Classic Mac OS Roman (`/MacRomanEncoding`).
    MacRoman,
    /// PDFDocEncoding, the default for text strings (PDF 32000-1 Table D.2).
    PdfDoc,
}

impl SimpleEncoding {
    /// Resolve an `/Encoding` name to a table, if it names one of ours.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "WinAnsiEncoding" => Some(Self::WinAnsi),
            "MacRomanEncoding" => Some(Self::MacRoman),
            "PDFDocEncoding" => Some(Self::PdfDoc),
            _ => None,
        }
    }

    /// Decode a single byte to its codepoint, or `None` when undefined.
    pub fn decode(&self, code: u8) -> Option<char> {
        self.table()[code as usize]
    }

    /// Decode a byte string, substituting [`REPLACEMENT_CHAR`] for undefined codes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> String {
        let table = self.table();
        bytes
            .iter()
            .map(|&b| table[b as usize].unwrap_or(REPLACEMENT_CHAR))
            .collect()
    }

    fn table(&self) -> &'static [Option<char>; 256] {
        match self {
            Self::WinAnsi => &WIN_ANSI_TABLE,
            Self::MacRoman => &MAC_ROMAN_TABLE,
            Self::PdfDoc => &PDF_DOC_TABLE,
        }
    }
}

/// Returns `true` if `bytes` is a BOM-prefixed UTF-16BE string of even length.
pub fn is_utf16be(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes.len() % 2 == 0 && bytes[..2] == UTF16BE_BOM
}

/// Returns `true` if every byte has a PDFDocEncoding mapping.
///
/// UTF-16BE strings are never reported as PDFDoc-encoded, even though
/// their BOM bytes happen to be defined in the table.
pub fn is_pdf_doc_encoded(bytes: &[u8]) -> bool {
    !is_utf16be(bytes) && bytes.iter().all(|&b| PDF_DOC_TABLE[b as usize].is_some())
}

/// Marks a slot with no mapping. U+FFFF is a noncharacter, never a table value.
const UNDEFINED: u16 = 0xFFFF;

const fn build_table(control: [u16; 32], delete: u16, high: [u16; 128]) -> [Option<char>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        let unit = if i < 0x20 {
            control[i]
        } else if i < 0x7F {
            i as u16
        } else if i == 0x7F {
            delete
        } else {
            high[i - 0x80]
        };
        table[i] = if unit == UNDEFINED {
            None
        } else {
            char::from_u32(unit as u32)
        };
        i += 1;
    }
    table
}

/// Upper half whose 0xA0..=0xFF slots follow ISO 8859-1, with `patches`
/// applied as `(byte, codepoint)` pairs afterwards.
const fn latin1_high(head: [u16; 32], patches: &[(usize, u16)]) -> [u16; 128] {
    let mut high = [0u16; 128];
    let mut i = 0;
    while i < 128 {
        high[i] = if i < 32 { head[i] } else { (i + 0x80) as u16 };
        i += 1;
    }
    let mut p = 0;
    while p < patches.len() {
        let (byte, unit) = patches[p];
        high[byte - 0x80] = unit;
        p += 1;
    }
    high
}

const ASCII_CONTROLS: [u16; 32] = {
    let mut c = [0u16; 32];
    let mut i = 0;
    while i < 32 {
        c[i] = i as u16;
        i += 1;
    }
    c
};

const U: u16 = UNDEFINED;

static PDF_DOC_TABLE: [Option<char>; 256] = build_table(
    [
        U, U, U, U, U, U, U, U, //
        U, 0x0009, 0x000A, U, U, 0x000D, U, U, //
        U, U, U, U, U, U, U, U, //
        0x02D8, 0x02C7, 0x02C6, 0x02D9, 0x02DD, 0x02DB, 0x02DA, 0x02DC,
    ],
    U,
    latin1_high(
        [
            0x2022, 0x2020, 0x2021, 0x2026, 0x2014, 0x2013, 0x0192, 0x2044, //
            0x2039, 0x203A, 0x2212, 0x2030, 0x201E, 0x201C, 0x201D, 0x2018, //
            0x2019, 0x201A, 0x2122, 0xFB01, 0xFB02, 0x0141, 0x0152, 0x0160, //
            0x0178, 0x017D, 0x0131, 0x0142, 0x0153, 0x0161, 0x017E, U,
        ],
        &[(0xA0, 0x20AC), (0xAD, U)],
    ),
);

static WIN_ANSI_TABLE: [Option<char>; 256] = build_table(
    ASCII_CONTROLS,
    0x007F,
    latin1_high(
        [
            0x20AC, U, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
            0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, U, 0x017D, U, //
            U, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
            0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, U, 0x017E, 0x0178,
        ],
        &[],
    ),
);

static MAC_ROMAN_TABLE: [Option<char>; 256] = build_table(
    ASCII_CONTROLS,
    0x007F,
    [
        0x00C4, 0x00C5, 0x00C7, 0x00C9, 0x00D1, 0x00D6, 0x00DC, 0x00E1, //
        0x00E0, 0x00E2, 0x00E4, 0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8, //
        0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF, 0x00F1, 0x00F3, //
        0x00F2, 0x00F4, 0x00F6, 0x00F5, 0x00FA, 0x00F9, 0x00FB, 0x00FC, //
        0x2020, 0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF, //
        0x00AE, 0x00A9, 0x2122, 0x00B4, 0x00A8, 0x2260, 0x00C6, 0x00D8, //
        0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x00B5, 0x2202, 0x2211, //
        0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8, //
        0x00BF, 0x00A1, 0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB, //
        0x00BB, 0x2026, 0x00A0, 0x00C0, 0x00C3, 0x00D5, 0x0152, 0x0153, //
        0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA, //
        0x00FF, 0x0178, 0x2044, 0x20AC, 0x2039, 0x203A, 0xFB01, 0xFB02, //
        0x2021, 0x00B7, 0x201A, 0x201E, 0x2030, 0x00C2, 0x00CA, 0x00C1, //
        0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC, 0x00D3, 0x00D4, //
        0xF8FF, 0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC, //
        0x00AF, 0x02D8, 0x02D9, 0x02DA, 0x00B8, 0x02DD, 0x02DB, 0x02C7,
    ],
);
