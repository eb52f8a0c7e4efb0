//! Content stream tokenizer.
//!
//! Lexes raw page content bytes into a flat sequence of [`Operator`]s, each
//! carrying the [`Operand`]s that preceded it. Comments are stripped and
//! inline images (`BI … ID … EI`) are skipped whole, since their binary
//! payload would otherwise derail lexing.

use crate::error::BackendError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer or real number.
    Number(f64),
    /// Name object, without the leading `/` and with `#XX` escapes resolved.
    Name(String),
    /// Literal string `( … )`, escapes resolved, as raw bytes.
    LiteralString(Vec<u8>),
    /// Hex string `< … >`, as decoded bytes.
    HexString(Vec<u8>),
    /// Array `[ … ]`.
    Array(Vec<Operand>),
    /// Dictionary `<< … >>` as ordered key/value pairs.
    Dictionary(Vec<(String, Operand)>),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
}

impl Operand {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Name value, if this is a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Raw bytes of a literal or hex string.
    pub fn as_string_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(b) | Operand::HexString(b) => Some(b),
            _ => None,
        }
    }
}

/// An operator together with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator keyword (e.g. `"BT"`, `"Tf"`, `"TJ"`).
    pub name: String,
    /// Operands in stream order.
    pub operands: Vec<Operand>,
}

/// Tokenize a content stream into operators.
///
/// # Errors
///
/// Returns [`BackendError::Content`] for unterminated strings, arrays,
/// dictionaries or inline images, and for malformed numbers. Invalid hex
/// digits and stray delimiters inside arrays are skipped.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut ops = Vec::new();
    let mut operands = Vec::new();

    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Operand(operand) => operands.push(operand),
            Token::Keyword(keyword) if keyword == "BI" => {
                lexer.skip_inline_image()?;
                operands.clear();
            }
            Token::Keyword(name) => ops.push(Operator {
                name,
                operands: std::mem::take(&mut operands),
            }),
        }
    }

    Ok(ops)
}

enum Token {
    Operand(Operand),
    Keyword(String),
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn content_error(msg: impl Into<String>) -> BackendError {
    BackendError::Content(msg.into())
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while let Some(c) = self.peek() {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Next operand or keyword at the top level, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            match b {
                b')' | b'>' | b']' | b'{' | b'}' => {
                    tracing::trace!(offset = self.pos, "skipping stray delimiter");
                    self.pos += 1;
                }
                b if is_regular(b) && !b.is_ascii_digit() && !matches!(b, b'+' | b'-' | b'.') => {
                    let word = self.regular_word();
                    return Ok(Some(match word.as_str() {
                        "true" => Token::Operand(Operand::Boolean(true)),
                        "false" => Token::Operand(Operand::Boolean(false)),
                        "null" => Token::Operand(Operand::Null),
                        _ => Token::Keyword(word),
                    }));
                }
                _ => return self.operand().map(|op| Some(Token::Operand(op))),
            }
        }
    }

    /// Parse one operand starting at the current (non-whitespace) byte.
    fn operand(&mut self) -> Result<Operand, BackendError> {
        match self.peek() {
            Some(b'(') => self.literal_string().map(Operand::LiteralString),
            Some(b'<') if self.peek_at(1) == Some(b'<') => self.dictionary().map(Operand::Dictionary),
            Some(b'<') => self.hex_string().map(Operand::HexString),
            Some(b'[') => self.array().map(Operand::Array),
            Some(b'/') => Ok(Operand::Name(self.name())),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.') => self.number(),
            Some(b) if is_regular(b) => {
                let word = self.regular_word();
                Ok(match word.as_str() {
                    "true" => Operand::Boolean(true),
                    "false" => Operand::Boolean(false),
                    "null" => Operand::Null,
                    _ => Operand::Name(word),
                })
            }
            Some(b) => Err(content_error(format!(
                "unexpected byte 0x{b:02X} at offset {}",
                self.pos
            ))),
            None => Err(content_error("unexpected end of content stream")),
        }
    }

    fn regular_word(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => {
                    let Some(escaped) = self.peek() else {
                        break;
                    };
                    self.pos += 1;
                    match escaped {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'\r' => {
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut value = u16::from(escaped - b'0');
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(d @ b'0'..=b'7') => {
                                        value = value * 8 + u16::from(d - b'0');
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            // High-order overflow is ignored.
                            out.push(value as u8);
                        }
                        // `\(`, `\)`, `\\` and unknown escapes keep the byte itself.
                        other => out.push(other),
                    }
                }
                _ => out.push(b),
            }
        }

        Err(content_error("unterminated literal string"))
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut nibbles = Vec::new();

        loop {
            let Some(b) = self.peek() else {
                return Err(content_error("unterminated hex string"));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            match hex_value(b) {
                Some(nibble) => nibbles.push(nibble),
                None => tracing::trace!(offset = self.pos - 1, "skipping invalid hex digit"),
            }
        }

        if nibbles.len() % 2 != 0 {
            nibbles.push(0);
        }
        Ok(nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(content_error("unterminated array")),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(b')' | b'>' | b'{' | b'}') => {
                    tracing::trace!(offset = self.pos, "skipping stray delimiter in array");
                    self.pos += 1;
                }
                Some(_) => items.push(self.operand()?),
            }
        }
    }

    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(content_error("unterminated dictionary")),
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                (Some(b'/'), _) => {
                    let key = self.name();
                    self.skip_whitespace_and_comments();
                    if self.peek().is_none() {
                        return Err(content_error("unterminated dictionary"));
                    }
                    let value = self.operand()?;
                    entries.push((key, value));
                }
                (Some(b), _) => {
                    return Err(content_error(format!(
                        "expected name key in dictionary, found 0x{b:02X}"
                    )));
                }
            }
        }
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    bytes.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            bytes.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| content_error("invalid number token"))?;
        let value: f64 = match text {
            // A bare sign or dot is how some producers write zero.
            "-" | "+" | "." | "-." | "+." => 0.0,
            _ => text
                .parse()
                .map_err(|_| content_error(format!("invalid number: {text}")))?,
        };
        Ok(Operand::Number(value))
    }

    /// Skip an inline image. Called after the `BI` keyword.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(content_error("unterminated inline image (missing ID)")),
                Some(b'I')
                    if self.peek_at(1) == Some(b'D')
                        && self.peek_at(2).is_none_or(|b| !is_regular(b)) =>
                {
                    self.pos += 2;
                    if self.peek().is_some_and(is_whitespace) {
                        self.pos += 1;
                    }
                    break;
                }
                Some(_) => {
                    self.operand()?;
                }
            }
        }

        let data_start = self.pos;
        while self.pos + 1 < self.input.len() {
            let preceded = self.pos == data_start || is_whitespace(self.input[self.pos - 1]);
            if preceded
                && self.input[self.pos] == b'E'
                && self.input[self.pos + 1] == b'I'
                && self.peek_at(2).is_none_or(|b| !is_regular(b))
            {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(content_error("unterminated inline image (missing EI)"))
    }
}
