//! Content stream tokenizer.
//!
//! Splits raw page content bytes into [`Operator`]s with their operands.
//! Only the operand kinds that text placement needs keep their value;
//! booleans, `null` and dictionaries collapse to [`Operand::Other`], and
//! inline image data is skipped.

use crate::error::SourceError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer or real number.
    Number(f64),
    /// Name object without the leading `/`.
    Name(String),
    /// Literal `(...)` or hexadecimal `<...>` string, as raw bytes.
    Str(Vec<u8>),
    /// Array of operands.
    Array(Vec<Operand>),
    /// Boolean, `null` or dictionary.
    Other,
}

impl Operand {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// An operator with the operands that preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator keyword (e.g. `"BT"`, `"Tj"`).
    pub name: String,
    /// Operands in stream order.
    pub operands: Vec<Operand>,
}

impl Operator {
    /// Numeric operands, in order; `None` if any operand is not a number.
    pub fn numbers(&self) -> Option<Vec<f64>> {
        self.operands.iter().map(Operand::as_number).collect()
    }
}

/// Tokenize content stream bytes into operators.
///
/// # Errors
///
/// Returns [`SourceError::ContentStream`] for unterminated strings, arrays
/// or dictionaries.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, SourceError> {
    Lexer { input, pos: 0 }.operators()
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
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

fn malformed(what: &str) -> SourceError {
    SourceError::ContentStream(what.to_string())
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn operators(mut self) -> Result<Vec<Operator>, SourceError> {
        let mut ops = Vec::new();
        let mut stack = Vec::new();

        loop {
            self.skip_blank();
            let Some(b) = self.peek() else { break };
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                    let keyword = self.keyword();
                    match keyword.as_str() {
                        "true" | "false" | "null" => stack.push(Operand::Other),
                        "BI" => {
                            self.skip_inline_image();
                            stack.clear();
                        }
                        _ => ops.push(Operator {
                            name: keyword,
                            operands: std::mem::take(&mut stack),
                        }),
                    }
                }
                b']' | b')' | b'>' | b'{' | b'}' => self.pos += 1,
                _ => match self.operand()? {
                    Some(operand) => stack.push(operand),
                    None => self.pos += 1,
                },
            }
        }

        Ok(ops)
    }

    /// Parse one operand at the cursor; `None` if the byte starts no operand.
    fn operand(&mut self) -> Result<Option<Operand>, SourceError> {
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        let operand = match b {
            b'(' => Operand::Str(self.literal_string()?),
            b'<' if self.peek_at(1) == Some(b'<') => {
                self.skip_dictionary()?;
                Operand::Other
            }
            b'<' => Operand::Str(self.hex_string()?),
            b'[' => {
                self.pos += 1;
                Operand::Array(self.array()?)
            }
            b'/' => Operand::Name(self.name()),
            b'0'..=b'9' | b'+' | b'-' | b'.' => Operand::Number(self.number()),
            _ => return Ok(None),
        };
        Ok(Some(operand))
    }

    fn skip_blank(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'*' || b == b'\'' || b == b'"')
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Parse a number; malformed tokens such as `--` read as zero.
    fn number(&mut self) -> f64 {
        let start = self.pos;
        if self.peek().is_some_and(|b| b == b'+' || b == b'-') {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                self.pos += 1;
            } else if b == b'.' && !seen_dot {
                seen_dot = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            self.pos += 1;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0)
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, SourceError> {
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
                b'\\' => self.escape(&mut out)?,
                _ => out.push(b),
            }
        }

        Err(malformed("unterminated literal string"))
    }

    /// Decode the escape sequence after a backslash.
    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), SourceError> {
        let Some(b) = self.peek() else {
            return Err(malformed("unterminated escape in literal string"));
        };
        self.pos += 1;
        match b {
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
                let mut value = b - b'0';
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value.wrapping_mul(8).wrapping_add(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push(value);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, SourceError> {
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(malformed("unterminated hex string"));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if let Some(d) = (b as char).to_digit(16) {
                digits.push(d as u8);
            } else if !is_whitespace(b) {
                return Err(SourceError::ContentStream(format!(
                    "invalid hex digit: {:?}",
                    b as char
                )));
            }
        }
        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    /// Parse array elements until `]`; the `[` is already consumed.
    fn array(&mut self) -> Result<Vec<Operand>, SourceError> {
        let mut elements = Vec::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Err(malformed("unterminated array")),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(elements);
                }
                Some(b) if b.is_ascii_alphabetic() => {
                    self.keyword();
                    elements.push(Operand::Other);
                }
                Some(_) => match self.operand()? {
                    Some(operand) => elements.push(operand),
                    None => self.pos += 1,
                },
            }
        }
    }

    /// Skip a `<< ... >>` dictionary, including nested ones.
    fn skip_dictionary(&mut self) -> Result<(), SourceError> {
        self.pos += 2;
        loop {
            self.skip_blank();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(malformed("unterminated dictionary")),
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(());
                }
                (Some(b), _) if b.is_ascii_alphabetic() => {
                    self.keyword();
                }
                _ => {
                    if self.operand()?.is_none() {
                        self.pos += 1;
                    }
                }
            }
        }
    }

    /// Skip `BI <dict> ID <data> EI`; the `BI` is already consumed.
    fn skip_inline_image(&mut self) {
        let input = self.input;
        while self.pos + 1 < input.len() {
            let at_id = input[self.pos] == b'I'
                && input[self.pos + 1] == b'D'
                && (self.pos == 0 || is_whitespace(input[self.pos - 1]));
            self.pos += 1;
            if at_id {
                self.pos += 1;
                break;
            }
        }
        while self.pos + 1 < input.len() {
            let at_ei = is_whitespace(input[self.pos - 1])
                && input[self.pos] == b'E'
                && input[self.pos + 1] == b'I'
                && input.get(self.pos + 2).is_none_or(|&b| is_whitespace(b) || is_delimiter(b));
            if at_ei {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
        self.pos = input.len();
    }
}
