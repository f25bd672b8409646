//! Text reader with position tracking

use std::{
    io::{Error, ErrorKind, Result},
    iter::Peekable,
};

/// A peekable iterator for bytes that records line and column information.
pub struct Input<'a> {
    /// The source of the input data
    source: Peekable<Box<dyn Iterator<Item = u8> + 'a>>,
    /// The current line number
    line: usize,
    /// The current column
    column: usize,
}

impl<'a> Input<'a> {
    /// Create a new `Input` from some source
    pub fn new(source: Box<dyn Iterator<Item = u8> + 'a>) -> Self {
        Input {
            source: source.peekable(),
            line: 1,
            column: 1,
        }
    }
    /// Read from an in-memory buffer.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Input::new(Box::new(bytes.iter().cloned()))
    }
    /// Look at the next byte without consuming it
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek().cloned()
    }
    /// The line the next byte is on.
    pub fn line(&self) -> usize {
        self.line
    }
    /// Create an io::Error with the given message and position information.
    pub fn error(&self, why: &str) -> Error {
        Error::new(
            ErrorKind::InvalidData,
            format!("{} at line {} column {}", why, self.line, self.column),
        )
    }

    /// Parse a signed decimal number.
    ///
    /// Consumes an optional minus sign and one or more decimal digits.
    /// Fails if there is no digit, or if the number does not lie within the
    /// range [-i64::MAX, i64::MAX].
    pub fn parse_dec64(&mut self) -> Result<i64> {
        let negative = self.peek() == Some(b'-');
        if negative {
            self.next();
        }
        if !self.peek().map_or(false, Self::is_digit) {
            return Err(self.error(Self::NUMBER));
        }
        let mut value: i64 = 0;
        while let Some(c) = self.peek() {
            if !Self::is_digit(c) {
                break;
            }
            // Does not unnecessarily overflow because of the order of operations
            value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(i64::from(c - b'0')))
                .ok_or_else(|| self.error(Self::OVERFLOW))?;
            self.next();
        }
        Ok(if negative { -value } else { value })
    }

    /// Like [parse_dec64](#method.parse_dec64) but rejects negative numbers.
    pub fn parse_unsigned(&mut self) -> Result<u64> {
        if self.peek() == Some(b'-') {
            return Err(self.error(Self::UNSIGNED));
        }
        Ok(self.parse_dec64()? as u64)
    }

    /// Parse zero or more spaces or linebreaks.
    pub fn skip_any_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !Self::is_space(c) {
                break;
            }
            self.next();
        }
    }

    /// Skip whitespace, failing unless at least one space or EOF follows.
    pub fn skip_some_whitespace(&mut self) -> Result<()> {
        match self.peek() {
            Some(c) if !Self::is_space(c) => Err(self.error(Self::SPACE)),
            _ => {
                self.skip_any_whitespace();
                Ok(())
            }
        }
    }

    /// Skip whitespace and comment lines starting with "c".
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.skip_any_whitespace();
            if self.peek() != Some(b'c') {
                return;
            }
            while let Some(c) = self.next() {
                if c == b'\n' {
                    break;
                }
            }
        }
    }

    // Error messages.
    /// A numeric overflow. This should only happen for user input.
    pub const OVERFLOW: &'static str = "overflow while parsing number";
    /// Parser error ("unexpected EOF")
    pub const EOF: &'static str = "premature end of file";
    /// Parser error (`expected ...`)
    pub const NUMBER: &'static str = "expected number";
    /// Parser error (`expected ...`)
    pub const UNSIGNED: &'static str = "expected non-negative number";
    /// Parser error (`expected ...`)
    pub const SPACE: &'static str = "expected space";
    /// Parser error (`expected ...`)
    pub const P_CNF: &'static str = "expected \"p cnf\"";

    /// Check if a character is a decimal digit.
    pub fn is_digit(value: u8) -> bool {
        value >= b'0' && value <= b'9'
    }

    /// Returns true if the character is one of the whitespace characters we allow.
    pub fn is_space(c: u8) -> bool {
        [b' ', b'\t', b'\n', b'\r'].iter().any(|&s| s == c)
    }
}

impl Iterator for Input<'_> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        self.source.next().map(|c| {
            if c == b'\n' {
                self.line += 1;
                self.column = 0;
            }
            self.column += 1;
            c
        })
    }
}
