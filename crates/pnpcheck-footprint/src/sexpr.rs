//! Minimal S-expression reader for KiCad footprint files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SExprError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected ')' at byte {0}")]
    UnbalancedClose(usize),
    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),
    #[error("trailing data after top-level expression at byte {0}")]
    TrailingData(usize),
    #[error("expected '(' at byte {0}")]
    ExpectedList(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    Atom(String),
    List(Vec<SExpr>),
}

impl SExpr {
    /// Parses a single top-level expression, which must be a list.
    pub fn parse(input: &str) -> Result<SExpr, SExprError> {
        let mut parser = Parser {
            bytes: input.as_bytes(),
            pos: 0,
        };
        parser.skip_whitespace();
        if parser.peek() != Some(b'(') {
            return Err(SExprError::ExpectedList(parser.pos));
        }
        let expr = parser.parse_expr()?;
        parser.skip_whitespace();
        if parser.pos < parser.bytes.len() {
            return Err(SExprError::TrailingData(parser.pos));
        }
        Ok(expr)
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            SExpr::Atom(s) => Some(s),
            SExpr::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::Atom(_) => None,
            SExpr::List(items) => Some(items),
        }
    }

    /// The first atom of a list, conventionally its tag (`pad`, `fp_line`, ...).
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_atom()
    }

    /// The first child list with the given tag.
    pub fn child(&self, tag: &str) -> Option<&SExpr> {
        self.children(tag).next()
    }

    /// All child lists with the given tag, in document order.
    pub fn children<'a, 'b>(&'a self, tag: &'b str) -> impl Iterator<Item = &'a SExpr> + use<'a, 'b> {
        self.as_list()
            .unwrap_or(&[])
            .iter()
            .filter(move |item| item.tag() == Some(tag))
    }

    /// The atom at position `idx` after the tag of a list.
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.as_list()?.get(idx + 1)?.as_atom()
    }

    /// The atom at position `idx` after the tag, parsed as a number.
    pub fn number(&self, idx: usize) -> Option<f64> {
        self.arg(idx)?.parse().ok()
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_expr(&mut self) -> Result<SExpr, SExprError> {
        match self.peek() {
            None => Err(SExprError::UnexpectedEof),
            Some(b'(') => self.parse_list(),
            Some(b')') => Err(SExprError::UnbalancedClose(self.pos)),
            Some(b'"') => self.parse_string(),
            Some(_) => Ok(self.parse_bare_atom()),
        }
    }

    fn parse_list(&mut self) -> Result<SExpr, SExprError> {
        self.pos += 1; // consume '('
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(SExprError::UnexpectedEof),
                Some(b')') => {
                    self.pos += 1;
                    return Ok(SExpr::List(items));
                }
                Some(_) => items.push(self.parse_expr()?),
            }
        }
    }

    fn parse_string(&mut self) -> Result<SExpr, SExprError> {
        let start = self.pos;
        self.pos += 1; // consume '"'
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(SExprError::UnterminatedString(start)),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(SExpr::Atom(out));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        None => return Err(SExprError::UnterminatedString(start)),
                        Some(b'n') => out.push('\n'),
                        Some(b't') => out.push('\t'),
                        Some(escaped) => out.push(escaped as char),
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    // Copy a whole UTF-8 scalar, not a byte.
                    let rest = &self.bytes[self.pos..];
                    let ch = std::str::from_utf8(rest)
                        .ok()
                        .and_then(|s| s.chars().next())
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    out.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    fn parse_bare_atom(&mut self) -> SExpr {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b'(' || b == b')' || b == b'"' {
                break;
            }
            self.pos += 1;
        }
        let atom = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        SExpr::Atom(atom)
    }
}
