// this_file: src/lexer/mod.rs

//! Incremental RFC 8259 tokenizer over a buffered byte stream.
//!
//! The lexer pulls bytes from a [`ByteBuffer`] and produces one token at a
//! time, with a single-token peek slot. It keeps no structural state:
//! bracket balancing and grammar enforcement are entirely the parser's
//! concern. Every token carries the 1-based line and column of its first
//! byte.

/// Number literal scanning.
pub mod number;
/// String literal scanning with escape and UTF-8 handling.
pub mod string;

use crate::ast::{Token, TokenKind};
use crate::error::{Error, Result};
use crate::input::{ByteBuffer, ByteSource};

/// Streaming tokenizer for JSON input.
pub struct Lexer<S: ByteSource> {
    buffer: ByteBuffer<S>,
    peeked: Option<Token>,
}

impl<S: ByteSource> Lexer<S> {
    /// Creates a lexer over a byte buffer.
    pub fn new(buffer: ByteBuffer<S>) -> Self {
        Lexer {
            buffer,
            peeked: None,
        }
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        if let Some(tok) = self.peeked.take() {
            return Ok(tok);
        }
        self.lex()
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            let tok = self.lex()?;
            self.peeked = Some(tok);
        }
        Ok(self.peeked.as_ref().expect("peek slot filled above"))
    }

    /// Total bytes consumed from the source so far.
    #[inline(always)]
    pub fn bytes_read(&self) -> u64 {
        self.buffer.position()
    }

    /// 1-based line of the next unread byte.
    #[inline(always)]
    pub fn line(&self) -> u64 {
        self.buffer.line() + 1
    }

    /// 1-based column of the next unread byte.
    #[inline(always)]
    pub fn column(&self) -> u64 {
        self.buffer.column() + 1
    }

    /// Scans one token from the buffer.
    fn lex(&mut self) -> Result<Token> {
        self.skip_whitespace()?;
        let line = self.buffer.line() + 1;
        let column = self.buffer.column() + 1;
        let byte = match self.buffer.peek(0)? {
            Some(b) => b,
            None => return Ok(Token::new(TokenKind::Eof, line, column)),
        };
        let kind = match byte {
            b'{' => self.structural(TokenKind::LBrace)?,
            b'}' => self.structural(TokenKind::RBrace)?,
            b'[' => self.structural(TokenKind::LBracket)?,
            b']' => self.structural(TokenKind::RBracket)?,
            b':' => self.structural(TokenKind::Colon)?,
            b',' => self.structural(TokenKind::Comma)?,
            b'"' => {
                self.buffer.read_byte()?;
                TokenKind::String(string::lex_string(&mut self.buffer)?)
            }
            b'-' | b'0'..=b'9' => TokenKind::Number(number::lex_number(&mut self.buffer)?),
            b't' => self.keyword(b"true", TokenKind::True, line, column)?,
            b'f' => self.keyword(b"false", TokenKind::False, line, column)?,
            b'n' => self.keyword(b"null", TokenKind::Null, line, column)?,
            other => {
                return Err(Error::parse(
                    format!("unexpected character '{}'", printable(other)),
                    line,
                    column,
                ))
            }
        };
        Ok(Token::new(kind, line, column))
    }

    /// Consumes a single structural byte.
    fn structural(&mut self, kind: TokenKind) -> Result<TokenKind> {
        self.buffer.read_byte()?;
        Ok(kind)
    }

    /// Consumes an exact lowercase keyword. Partial matches fail.
    fn keyword(&mut self, expected: &[u8], kind: TokenKind, line: u64, column: u64) -> Result<TokenKind> {
        for &want in expected {
            match self.buffer.read_byte()? {
                Some(b) if b == want => {}
                _ => return Err(Error::parse("invalid literal", line, column)),
            }
        }
        Ok(kind)
    }

    /// Skips the RFC 8259 whitespace set between tokens.
    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(b) = self.buffer.peek(0)? {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.buffer.read_byte()?;
                }
                _ => break,
            }
        }
        Ok(())
    }
}

/// Renders a byte for error messages, hex-escaping non-printable input.
fn printable(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        (byte as char).to_string()
    } else {
        format!("0x{byte:02x}")
    }
}
