// this_file: src/parser/mod.rs

//! Token-level recursive-descent parser.
//!
//! The parser pulls tokens from the lexer and enforces the RFC 8259
//! grammar. [`Parser::parse_value`] materializes one complete value;
//! [`Parser::skip_value`] drains one value structurally without building
//! containers. Nesting depth is counted on every container open and
//! bounded by [`ParserOptions::max_depth`]; crossing the bound is fatal.
//!
//! The streaming engine drives the same parser token by token through the
//! crate-internal accessors, so depth accounting stays in one place.

use crate::ast::{Map, Token, TokenKind, Value};
use crate::error::{Error, Result};
use crate::input::{slice_source, ByteBuffer, ByteSource, SeekableSource};
use crate::lexer::Lexer;
use crate::streaming::DEFAULT_MAX_DEPTH;
use std::io::Cursor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration options for the parser.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserOptions {
    /// Maximum nesting depth for objects and arrays (default: 512).
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive-descent parser over a token stream.
pub struct Parser<S: ByteSource> {
    lexer: Lexer<S>,
    options: ParserOptions,
    depth: usize,
}

/// Parses a complete JSON document from a string.
pub fn parse(input: &str) -> Result<Value> {
    parse_with_options(input, ParserOptions::default())
}

/// Parses a complete JSON document from a string with custom options.
pub fn parse_with_options(input: &str, options: ParserOptions) -> Result<Value> {
    let buffer = ByteBuffer::with_default_capacity(slice_source(input.as_bytes()))?;
    let mut parser = Parser::new(Lexer::new(buffer), options);
    let value = parser.parse_value()?;
    parser.expect_eof()?;
    Ok(value)
}

impl<'a> Parser<SeekableSource<Cursor<&'a [u8]>>> {
    /// Creates a parser over an in-memory byte slice.
    pub fn from_slice(input: &'a [u8], options: ParserOptions) -> Result<Self> {
        let buffer = ByteBuffer::with_default_capacity(slice_source(input))?;
        Ok(Parser::new(Lexer::new(buffer), options))
    }
}

impl<S: ByteSource> Parser<S> {
    /// Creates a parser over a lexer.
    pub fn new(lexer: Lexer<S>, options: ParserOptions) -> Self {
        Parser {
            lexer,
            options,
            depth: 0,
        }
    }

    /// Parses exactly one value, materializing containers recursively.
    pub fn parse_value(&mut self) -> Result<Value> {
        let token = self.lexer.next_token()?;
        self.parse_value_from(token)
    }

    /// Parses one value whose first token has already been consumed.
    pub(crate) fn parse_value_from(&mut self, token: Token) -> Result<Value> {
        match token.kind {
            TokenKind::Null => Ok(Value::Null),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::String(s) => Ok(Value::String(s)),
            TokenKind::LBracket => self.parse_array(&token),
            TokenKind::LBrace => self.parse_object(&token),
            TokenKind::Eof => Err(Self::eof_error(&token)),
            other => Err(Error::parse(
                format!("unexpected token {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    /// Parses an array body. The opening bracket has been consumed.
    fn parse_array(&mut self, open: &Token) -> Result<Value> {
        self.begin_container(open)?;
        let mut items = Vec::new();
        let mut token = self.lexer.next_token()?;
        if !matches!(token.kind, TokenKind::RBracket) {
            loop {
                items.push(self.parse_value_from(token)?);
                let sep = self.lexer.next_token()?;
                match sep.kind {
                    TokenKind::Comma => {
                        token = self.lexer.next_token()?;
                        if matches!(token.kind, TokenKind::RBracket) {
                            // Trailing comma.
                            return Err(Error::parse(
                                "unexpected token ']'",
                                token.line,
                                token.column,
                            ));
                        }
                    }
                    TokenKind::RBracket => break,
                    TokenKind::Eof => return Err(Self::eof_error(&sep)),
                    other => {
                        return Err(Error::parse(
                            format!("expected ',' or ']', found {}", other.describe()),
                            sep.line,
                            sep.column,
                        ))
                    }
                }
            }
        }
        self.end_container();
        Ok(Value::Array(items))
    }

    /// Parses an object body. The opening brace has been consumed.
    /// Duplicate keys resolve last-wins while keeping first-insertion
    /// order.
    fn parse_object(&mut self, open: &Token) -> Result<Value> {
        self.begin_container(open)?;
        let mut map = Map::default();
        let mut token = self.lexer.next_token()?;
        if !matches!(token.kind, TokenKind::RBrace) {
            loop {
                let key = self.member_key(token)?;
                self.expect_colon()?;
                let value = self.parse_value()?;
                map.insert(key, value);
                let sep = self.lexer.next_token()?;
                match sep.kind {
                    TokenKind::Comma => {
                        token = self.lexer.next_token()?;
                        if matches!(token.kind, TokenKind::RBrace) {
                            return Err(Error::parse(
                                "unexpected token '}'",
                                token.line,
                                token.column,
                            ));
                        }
                    }
                    TokenKind::RBrace => break,
                    TokenKind::Eof => return Err(Self::eof_error(&sep)),
                    other => {
                        return Err(Error::parse(
                            format!("expected ',' or '}}', found {}", other.describe()),
                            sep.line,
                            sep.column,
                        ))
                    }
                }
            }
        }
        self.end_container();
        Ok(Value::Object(map))
    }

    /// Consumes one value without building containers. Structural balance
    /// shares the same depth bound as materializing parses.
    pub fn skip_value(&mut self) -> Result<()> {
        let token = self.lexer.next_token()?;
        self.skip_value_from(token)
    }

    /// Skips one value whose first token has already been consumed.
    pub(crate) fn skip_value_from(&mut self, token: Token) -> Result<()> {
        match token.kind {
            TokenKind::Null
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Number(_)
            | TokenKind::String(_) => Ok(()),
            TokenKind::LBracket => self.skip_array(&token),
            TokenKind::LBrace => self.skip_object(&token),
            TokenKind::Eof => Err(Self::eof_error(&token)),
            other => Err(Error::parse(
                format!("unexpected token {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    /// Structurally drains an array with full grammar checking.
    fn skip_array(&mut self, open: &Token) -> Result<()> {
        self.begin_container(open)?;
        let mut token = self.lexer.next_token()?;
        if !matches!(token.kind, TokenKind::RBracket) {
            loop {
                self.skip_value_from(token)?;
                let sep = self.lexer.next_token()?;
                match sep.kind {
                    TokenKind::Comma => {
                        token = self.lexer.next_token()?;
                        if matches!(token.kind, TokenKind::RBracket) {
                            return Err(Error::parse(
                                "unexpected token ']'",
                                token.line,
                                token.column,
                            ));
                        }
                    }
                    TokenKind::RBracket => break,
                    TokenKind::Eof => return Err(Self::eof_error(&sep)),
                    other => {
                        return Err(Error::parse(
                            format!("expected ',' or ']', found {}", other.describe()),
                            sep.line,
                            sep.column,
                        ))
                    }
                }
            }
        }
        self.end_container();
        Ok(())
    }

    /// Structurally drains an object with full grammar checking.
    fn skip_object(&mut self, open: &Token) -> Result<()> {
        self.begin_container(open)?;
        let mut token = self.lexer.next_token()?;
        if !matches!(token.kind, TokenKind::RBrace) {
            loop {
                self.member_key(token)?;
                self.expect_colon()?;
                self.skip_value()?;
                let sep = self.lexer.next_token()?;
                match sep.kind {
                    TokenKind::Comma => {
                        token = self.lexer.next_token()?;
                        if matches!(token.kind, TokenKind::RBrace) {
                            return Err(Error::parse(
                                "unexpected token '}'",
                                token.line,
                                token.column,
                            ));
                        }
                    }
                    TokenKind::RBrace => break,
                    TokenKind::Eof => return Err(Self::eof_error(&sep)),
                    other => {
                        return Err(Error::parse(
                            format!("expected ',' or '}}', found {}", other.describe()),
                            sep.line,
                            sep.column,
                        ))
                    }
                }
            }
        }
        self.end_container();
        Ok(())
    }

    /// Extracts an object member key, which must be a string token.
    pub(crate) fn member_key(&mut self, token: Token) -> Result<String> {
        match token.kind {
            TokenKind::String(key) => Ok(key),
            TokenKind::Eof => Err(Self::eof_error(&token)),
            other => Err(Error::parse(
                format!("expected string key, found {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    /// Consumes the colon between a key and its value.
    pub(crate) fn expect_colon(&mut self) -> Result<()> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Colon => Ok(()),
            TokenKind::Eof => Err(Self::eof_error(&token)),
            other => Err(Error::parse(
                format!("expected ':', found {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    /// Requires the next token to be end of input.
    pub(crate) fn expect_eof(&mut self) -> Result<()> {
        let token = self.lexer.next_token()?;
        if token.is_eof() {
            return Ok(());
        }
        Err(Error::parse(
            format!("unexpected token {} after end of document", token.kind.describe()),
            token.line,
            token.column,
        ))
    }

    /// Counts a container open against the depth bound.
    pub(crate) fn begin_container(&mut self, open: &Token) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::parse(
                "maximum nesting depth exceeded",
                open.line,
                open.column,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Counts a container close.
    pub(crate) fn end_container(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consumes and returns the next token.
    pub(crate) fn next_token(&mut self) -> Result<Token> {
        self.lexer.next_token()
    }

    /// Peeks at the next token without consuming it.
    pub(crate) fn peek_token(&mut self) -> Result<&Token> {
        self.lexer.peek_token()
    }

    /// Count of currently open containers.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total bytes consumed from the source so far.
    #[inline(always)]
    pub fn bytes_read(&self) -> u64 {
        self.lexer.bytes_read()
    }

    /// Builds the EOF-inside-document error at a token's position.
    fn eof_error(token: &Token) -> Error {
        Error::parse("unexpected end of file", token.line, token.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Number;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
        assert_eq!(parse("42").unwrap(), Value::Number(Number::Integer(42)));
        assert_eq!(parse("\"hi\"").unwrap(), Value::String("hi".to_string()));
    }

    #[test]
    fn test_parse_empty_containers() {
        assert!(matches!(parse("{}").unwrap(), Value::Object(ref m) if m.is_empty()));
        assert!(matches!(parse("[]").unwrap(), Value::Array(ref a) if a.is_empty()));
    }

    #[test]
    fn test_parse_nested() {
        let value = parse(r#"{"user": {"name": "Alice", "tags": ["admin", "dev"]}}"#).unwrap();
        assert_eq!(value["user"]["name"].as_str(), Some("Alice"));
        assert_eq!(value["user"]["tags"][1].as_str(), Some("dev"));
    }

    #[test]
    fn test_object_key_order_and_duplicates() {
        let value = parse(r#"{"b": 1, "a": 2, "b": 3}"#).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&String> = obj.keys().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(value["b"].as_i64(), Some(3));
    }

    #[test]
    fn test_trailing_comma_fails() {
        assert!(parse("[1, 2,]").is_err());
        assert!(parse(r#"{"a": 1,}"#).is_err());
    }

    #[test]
    fn test_double_comma_position() {
        let err = parse("[1, 2,, 3]").unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(7));
    }

    #[test]
    fn test_missing_separators_fail() {
        assert!(parse("[1 2]").is_err());
        assert!(parse(r#"{"a" 1}"#).is_err());
        assert!(parse(r#"{"a": 1 "b": 2}"#).is_err());
    }

    #[test]
    fn test_non_string_key_fails() {
        let err = parse("{1: 2}").unwrap_err();
        assert!(err.to_string().contains("expected string key"), "{err}");
    }

    #[test]
    fn test_eof_inside_container() {
        let err = parse("[1, 2").unwrap_err();
        assert!(err.to_string().contains("unexpected end of file"), "{err}");
        assert!(parse(r#"{"a": "#).is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_trailing_content_fails() {
        assert!(parse("1 2").is_err());
        assert!(parse("{} []").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let options = ParserOptions { max_depth: 32 };
        let ok = format!("{}0{}", "[".repeat(32), "]".repeat(32));
        assert!(parse_with_options(&ok, options.clone()).is_ok());

        let deep = format!("{}0{}", "[".repeat(33), "]".repeat(33));
        let err = parse_with_options(&deep, options).unwrap_err();
        assert!(err.to_string().contains("maximum nesting depth exceeded"), "{err}");
        assert_eq!(err.column(), Some(33));
    }

    #[test]
    fn test_skip_value_consumes_exactly_one_value() {
        let mut parser =
            Parser::from_slice(br#"[{"a": [1, 2]}, "x"] true"#, ParserOptions::default()).unwrap();
        parser.skip_value().unwrap();
        assert_eq!(parser.depth(), 0);
        assert_eq!(parser.parse_value().unwrap(), Value::Bool(true));
        parser.expect_eof().unwrap();
    }

    #[test]
    fn test_skip_value_still_validates_grammar() {
        let mut parser = Parser::from_slice(b"[1, 2,, 3]", ParserOptions::default()).unwrap();
        let err = parser.skip_value().unwrap_err();
        assert_eq!(err.column(), Some(7));
    }

    #[test]
    fn test_unicode_surrogate_pair_document() {
        let value = parse(r#""\uD834\uDD1E""#).unwrap();
        assert_eq!(value.as_str(), Some("\u{1D11E}"));
        assert!(parse(r#""\uD834""#).is_err());
        assert!(parse(r#""\uDD1E""#).is_err());
    }
}
