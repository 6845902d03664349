//! Line-oriented reading utilities.
//!
//! MSH text is newline-delimited with whitespace-separated fields. Section
//! parsers pull one line at a time from a [`LineReader`] and take typed
//! values off it through [`Fields`], which turns every parse failure into a
//! [`MshError::MalformedSection`] carrying the section and line number.

use std::io::BufRead;
use std::str::{FromStr, SplitWhitespace};

use crate::msh::types::error::{MshError, Result};

/// Buffered, line-counting reader over an MSH text stream.
pub struct LineReader<R> {
    inner: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            line_number: 0,
        }
    }

    /// 1-based number of the line most recently read (0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next line and returns it trimmed, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        if self.inner.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(self.line.trim()))
    }

    /// Reads the next non-blank line.
    ///
    /// Running out of input is an [`MshError::UnexpectedEndOfInput`] naming
    /// `section` and what the caller was `expected` to find.
    pub fn expect_line(&mut self, section: &'static str, expected: &str) -> Result<&str> {
        self.fill(section, expected)?;
        Ok(self.line.trim())
    }

    /// Reads the next non-blank line and splits it into [`Fields`].
    pub fn fields(&mut self, section: &'static str, expected: &str) -> Result<Fields<'_>> {
        self.fill(section, expected)?;
        Ok(Fields::new(self.line.trim(), section, self.line_number))
    }

    fn fill(&mut self, section: &'static str, expected: &str) -> Result<()> {
        loop {
            self.line.clear();
            if self.inner.read_line(&mut self.line)? == 0 {
                return Err(MshError::UnexpectedEndOfInput {
                    section,
                    expected: expected.to_string(),
                });
            }
            self.line_number += 1;
            if !self.line.trim().is_empty() {
                return Ok(());
            }
        }
    }

    /// Reads a line made only of integers.
    pub fn read_ints(&mut self, section: &'static str, expected: &str) -> Result<Vec<i64>> {
        let mut fields = self.fields(section, expected)?;
        fields.rest("integer")
    }

    /// Reads a line made only of floating point numbers.
    pub fn read_floats(&mut self, section: &'static str, expected: &str) -> Result<Vec<f64>> {
        let mut fields = self.fields(section, expected)?;
        fields.rest("float")
    }

    /// Reads a line holding exactly one value, e.g. a record count.
    pub fn read_single<T: FromStr>(&mut self, section: &'static str, what: &str) -> Result<T> {
        let mut fields = self.fields(section, what)?;
        let value = fields.next(what)?;
        fields.finish()?;
        Ok(value)
    }
}

/// Typed cursor over the whitespace-separated fields of one line.
pub struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
    section: &'static str,
    line: usize,
}

impl<'a> Fields<'a> {
    pub fn new(text: &'a str, section: &'static str, line: usize) -> Self {
        Self {
            tokens: text.split_whitespace(),
            section,
            line,
        }
    }

    /// Line number the fields were read from.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Builds a [`MshError::MalformedSection`] pointing at this line.
    pub fn malformed(&self, reason: impl Into<String>) -> MshError {
        MshError::MalformedSection {
            section: self.section,
            line: self.line,
            reason: reason.into(),
        }
    }

    /// Parses the next field as `T`; `what` names it in error messages.
    pub fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| self.malformed(format!("missing {}", what)))?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("invalid {} '{}'", what, token)))
    }

    /// Parses the next `count` fields as `T`.
    pub fn take<T: FromStr>(&mut self, count: usize, what: &str) -> Result<Vec<T>> {
        (0..count).map(|_| self.next(what)).collect()
    }

    /// Parses every remaining field as `T`.
    pub fn rest<T: FromStr>(&mut self, what: &str) -> Result<Vec<T>> {
        let mut values = Vec::new();
        for token in self.tokens.by_ref() {
            let value = token.parse().map_err(|_| MshError::MalformedSection {
                section: self.section,
                line: self.line,
                reason: format!("invalid {} '{}'", what, token),
            })?;
            values.push(value);
        }
        Ok(values)
    }

    /// Fails if any field is left unread.
    pub fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            Some(extra) => Err(self.malformed(format!("unexpected trailing field '{}'", extra))),
            None => Ok(()),
        }
    }
}
