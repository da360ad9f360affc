//! Variable marker substitution
//!
//! Templates embed settings references as `#{dotted.path}` markers:
//!
//! ```yaml
//! replicas: '#{deployment.replicas}'
//! ```
//!
//! An explicit scanner splits the text into literal and expression spans
//! (non-overlapping, left to right), then each expression is resolved
//! against the settings tree and replaced with its string form. Any
//! unresolved variable fails the whole substitution.

use crate::error::{Error, Result};
use crate::value::Value;

/// A span of template text: literal content or a marker expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Literal text, copied through unchanged
    Literal(String),
    /// The inner expression of a `#{...}` marker (delimiters stripped)
    Expr(String),
}

/// Scanner for `#{...}` markers
pub struct MarkerScanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> MarkerScanner<'a> {
    /// Create a new scanner for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Scan the entire input into literal and expression spans
    pub fn scan(&mut self) -> Result<Vec<Span>> {
        let mut spans = Vec::new();

        while !self.is_eof() {
            if self.check_marker_start() {
                spans.push(self.parse_marker()?);
            } else {
                let literal = self.collect_literal();
                if !literal.is_empty() {
                    spans.push(Span::Literal(literal));
                }
            }
        }

        Ok(spans)
    }

    /// Check if we're at end of input
    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get current character
    fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peek at the next character
    fn peek(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance by one character
    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
    }

    /// Check if we're at a marker start (#{)
    fn check_marker_start(&self) -> bool {
        self.current() == Some('#') && self.peek() == Some('{')
    }

    /// Collect literal text until the next marker or end of input
    fn collect_literal(&mut self) -> String {
        let mut result = String::new();

        while !self.is_eof() {
            if self.check_marker_start() {
                break;
            }
            if let Some(c) = self.current() {
                result.push(c);
                self.advance();
            }
        }

        result
    }

    /// Parse a marker expression (starting at #{)
    fn parse_marker(&mut self) -> Result<Span> {
        // Skip #{
        self.advance();
        self.advance();

        let mut expr = String::new();

        loop {
            match self.current() {
                Some('}') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    expr.push(c);
                    self.advance();
                }
                None => {
                    return Err(Error::parse(format!(
                        "Unterminated marker: #{{{}",
                        expr
                    )));
                }
            }
        }

        let expr = expr.trim().to_string();
        if expr.is_empty() {
            return Err(Error::parse("Empty marker expression"));
        }

        Ok(Span::Expr(expr))
    }
}

/// Check if a string contains any `#{...}` markers
pub fn contains_marker(input: &str) -> bool {
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '#' && chars.peek() == Some(&'{') {
            return true;
        }
    }

    false
}

/// Substitute all markers in `text` with values from the settings tree.
///
/// Replacement follows scan order. A marker whose dotted path is absent
/// from the tree aborts the whole call; no partial result is returned.
pub fn substitute(text: &str, settings: &Value) -> Result<String> {
    if !contains_marker(text) {
        return Ok(text.to_string());
    }

    let spans = MarkerScanner::new(text).scan()?;
    let mut result = String::with_capacity(text.len());

    for span in spans {
        match span {
            Span::Literal(s) => result.push_str(&s),
            Span::Expr(expr) => {
                let value = settings.get_path(&expr)?;
                result.push_str(&value.to_string());
            }
        }
    }

    Ok(result)
}
