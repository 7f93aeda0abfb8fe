// this_file: src/path/parser.rs

//! JSONPath expression parsing.
//!
//! Accepted grammar (informally):
//!
//! ```text
//! path       := "$" segment*
//! segment    := "." property | ".." property | ".." "*" | "." "*"
//!             | "[" bracket "]"
//! bracket    := "*" | index | slice | "'" key "'" | '"' key '"' | filter
//! filter     := "?" "(" expr ")"
//! property   := [A-Za-z0-9_-]+
//! ```
//!
//! All failures are path errors carrying the original text, the character
//! index of the failure, and a context snippet.

use crate::error::{Error, Result};
use crate::path::expression::PathExpression;
use crate::path::filter::FilterPredicate;
use crate::path::segment::PathSegment;

/// Parses a JSONPath expression into its compiled form.
pub fn parse(text: &str) -> Result<PathExpression> {
    PathParser::new(text).parse()
}

/// Single-pass character scanner over the expression text.
struct PathParser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(text: &'a str) -> Self {
        PathParser {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<PathExpression> {
        if self.chars.is_empty() {
            return Err(Error::path("empty path", self.text, 0));
        }
        if self.bump() != Some('$') {
            return Err(Error::path("must start with '$'", self.text, 0));
        }
        let mut segments = vec![PathSegment::Root];
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.bump();
                    let recursive = if self.peek() == Some('.') {
                        self.bump();
                        true
                    } else {
                        false
                    };
                    segments.push(self.parse_dot_segment(recursive)?);
                }
                '[' => {
                    self.bump();
                    segments.push(self.parse_bracket_segment()?);
                }
                _ => {
                    return Err(self.err(format!("unexpected character '{c}'")));
                }
            }
        }
        Ok(PathExpression::new(self.text, segments))
    }

    /// Parses what follows `.` or `..`: a property name or `*`.
    fn parse_dot_segment(&mut self, recursive: bool) -> Result<PathSegment> {
        if self.peek() == Some('*') {
            self.bump();
            return Ok(PathSegment::Wildcard { recursive });
        }
        let name = self.take_property_name();
        if name.is_empty() {
            let what = if recursive { "'..'" } else { "'.'" };
            return Err(self.err(format!("expected property name or '*' after {what}")));
        }
        Ok(PathSegment::Property { name, recursive })
    }

    /// Parses a bracket selector: wildcard, quoted key, index, slice, or
    /// filter. The opening `[` has been consumed.
    fn parse_bracket_segment(&mut self) -> Result<PathSegment> {
        let segment = match self.peek() {
            Some('*') => {
                self.bump();
                PathSegment::Wildcard { recursive: false }
            }
            Some(q @ ('\'' | '"')) => {
                self.bump();
                let name = self.take_quoted_key(q)?;
                PathSegment::Property {
                    name,
                    recursive: false,
                }
            }
            Some('?') => {
                self.bump();
                self.parse_filter()?
            }
            Some(c) if c == '-' || c == ':' || c.is_ascii_digit() => self.parse_index_or_slice()?,
            Some(']') => return Err(self.err("empty bracket segment")),
            Some(c) => return Err(self.err(format!("unexpected character '{c}' in brackets"))),
            None => return Err(self.err("unclosed bracket")),
        };
        match self.bump() {
            Some(']') => Ok(segment),
            _ => Err(self.err("unclosed bracket")),
        }
    }

    /// Parses `?(expr)` with the `?` already consumed. Parentheses inside
    /// the predicate are tracked to a balanced count.
    fn parse_filter(&mut self) -> Result<PathSegment> {
        let filter_start = self.pos;
        if self.bump() != Some('(') {
            return Err(Error::path("expected '(' after '?'", self.text, filter_start));
        }
        let expr_start = self.pos;
        let mut depth = 1usize;
        loop {
            match self.bump() {
                Some('(') => depth += 1,
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {}
                None => {
                    return Err(Error::path(
                        "unclosed filter expression",
                        self.text,
                        filter_start,
                    ))
                }
            }
        }
        let expression: String = self.chars[expr_start..self.pos - 1].iter().collect();
        let predicate = FilterPredicate::compile(&expression)
            .map_err(|message| Error::path(message, self.text, expr_start))?;
        Ok(PathSegment::Filter {
            expression,
            predicate,
        })
    }

    /// Parses `[n]` or `[start:end:step]` bodies.
    fn parse_index_or_slice(&mut self) -> Result<PathSegment> {
        let body_start = self.pos;
        let mut body = String::new();
        while let Some(c) = self.peek() {
            if c == ']' {
                break;
            }
            if c == '-' || c == ':' || c.is_ascii_digit() {
                body.push(c);
                self.bump();
            } else {
                return Err(self.err(format!("unexpected character '{c}' in brackets")));
            }
        }
        if !body.contains(':') {
            let index = body
                .parse::<i64>()
                .map_err(|_| Error::path("invalid array index", self.text, body_start))?;
            return Ok(PathSegment::ArrayIndex { index });
        }
        let parts: Vec<&str> = body.split(':').collect();
        if parts.len() > 3 {
            return Err(Error::path("invalid slice", self.text, body_start));
        }
        let bound = |part: &str| -> Result<Option<i64>> {
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<i64>()
                .map(Some)
                .map_err(|_| Error::path("invalid slice bound", self.text, body_start))
        };
        let start = bound(parts[0])?;
        let end = bound(parts[1])?;
        let step = match parts.get(2) {
            Some(part) => bound(part)?.unwrap_or(1),
            None => 1,
        };
        if step < 1 {
            return Err(Error::path(
                "slice step must be positive",
                self.text,
                body_start,
            ));
        }
        Ok(PathSegment::ArraySlice { start, end, step })
    }

    /// Collects a run of property-name characters.
    fn take_property_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    /// Collects a quoted bracket key up to the closing quote. A backslash
    /// escapes the quote character and itself.
    fn take_quoted_key(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        let mut name = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(name),
                Some('\\') => match self.bump() {
                    Some(c) if c == quote || c == '\\' => name.push(c),
                    Some(c) => {
                        name.push('\\');
                        name.push(c);
                    }
                    None => {
                        return Err(Error::path(
                            "unterminated string in path",
                            self.text,
                            start,
                        ))
                    }
                },
                Some(c) => name.push(c),
                None => {
                    return Err(Error::path(
                        "unterminated string in path",
                        self.text,
                        start,
                    ))
                }
            }
        }
    }

    #[inline(always)]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::path(message, self.text, self.pos)
    }
}
