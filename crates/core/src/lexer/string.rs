// this_file: src/lexer/string.rs

//! String literal scanning with escape sequence handling.
//!
//! Strings follow RFC 8259 strictly: the eight short escapes, `\uXXXX`
//! with mandatory surrogate pairing, no raw control characters, and
//! validated multi-byte UTF-8.

use crate::error::{Error, Result};
use crate::input::{ByteBuffer, ByteSource};

/// Scans a string literal. The opening quote has already been consumed;
/// the closing quote is consumed here.
pub(super) fn lex_string<S: ByteSource>(buffer: &mut ByteBuffer<S>) -> Result<String> {
    let mut out = String::new();
    loop {
        let line = buffer.line() + 1;
        let column = buffer.column() + 1;
        let byte = match buffer.peek(0)? {
            Some(b) => b,
            None => return Err(Error::parse("unterminated string", line, column)),
        };
        match byte {
            b'"' => {
                buffer.read_byte()?;
                return Ok(out);
            }
            b'\\' => {
                buffer.read_byte()?;
                lex_escape(buffer, &mut out, line, column)?;
            }
            0x00..=0x1F => {
                return Err(Error::parse("unescaped control character", line, column))
            }
            b if b < 0x80 => {
                buffer.read_byte()?;
                out.push(b as char);
            }
            _ => lex_multibyte(buffer, &mut out, line, column)?,
        }
    }
}

/// Decodes one escape sequence after the backslash. `line`/`column` point
/// at the backslash for error reporting.
fn lex_escape<S: ByteSource>(
    buffer: &mut ByteBuffer<S>,
    out: &mut String,
    line: u64,
    column: u64,
) -> Result<()> {
    let byte = match buffer.read_byte()? {
        Some(b) => b,
        None => return Err(Error::parse("unterminated string", line, column)),
    };
    match byte {
        b'"' => out.push('"'),
        b'\\' => out.push('\\'),
        b'/' => out.push('/'),
        b'b' => out.push('\u{08}'),
        b'f' => out.push('\u{0C}'),
        b'n' => out.push('\n'),
        b'r' => out.push('\r'),
        b't' => out.push('\t'),
        b'u' => {
            let code = lex_unicode_escape(buffer, line, column)?;
            match char::from_u32(code) {
                Some(c) => out.push(c),
                None => return Err(Error::parse("invalid unicode escape", line, column)),
            }
        }
        _ => return Err(Error::parse("invalid escape sequence", line, column)),
    }
    Ok(())
}

/// Decodes `\uXXXX`, combining surrogate pairs into a single code point.
///
/// A high surrogate must be followed immediately by a `\uXXXX` low
/// surrogate; lone surrogates of either kind are rejected.
fn lex_unicode_escape<S: ByteSource>(
    buffer: &mut ByteBuffer<S>,
    line: u64,
    column: u64,
) -> Result<u32> {
    let first = read_hex4(buffer, line, column)?;
    if (0xDC00..=0xDFFF).contains(&first) {
        return Err(Error::parse("invalid unicode escape", line, column));
    }
    if !(0xD800..=0xDBFF).contains(&first) {
        return Ok(first);
    }
    match (buffer.read_byte()?, buffer.read_byte()?) {
        (Some(b'\\'), Some(b'u')) => {}
        _ => return Err(Error::parse("invalid unicode escape", line, column)),
    }
    let second = read_hex4(buffer, line, column)?;
    if !(0xDC00..=0xDFFF).contains(&second) {
        return Err(Error::parse("invalid unicode escape", line, column));
    }
    Ok(0x10000 + (first - 0xD800) * 0x400 + (second - 0xDC00))
}

/// Reads exactly four hex digits.
fn read_hex4<S: ByteSource>(buffer: &mut ByteBuffer<S>, line: u64, column: u64) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = buffer
            .read_byte()?
            .and_then(|b| (b as char).to_digit(16));
        match digit {
            Some(d) => value = value * 16 + d,
            None => return Err(Error::parse("invalid unicode escape", line, column)),
        }
    }
    Ok(value)
}

/// Collects one multi-byte UTF-8 sequence, sized by the first byte's
/// leading-ones count and validated before being appended.
fn lex_multibyte<S: ByteSource>(
    buffer: &mut ByteBuffer<S>,
    out: &mut String,
    line: u64,
    column: u64,
) -> Result<()> {
    let first = match buffer.read_byte()? {
        Some(b) => b,
        None => return Err(Error::parse("invalid utf-8", line, column)),
    };
    let extra = match first {
        0xC0..=0xDF => 1,
        0xE0..=0xEF => 2,
        0xF0..=0xF7 => 3,
        _ => return Err(Error::parse("invalid utf-8", line, column)),
    };
    let mut seq = [first, 0, 0, 0];
    for slot in seq.iter_mut().take(extra + 1).skip(1) {
        match buffer.read_byte()? {
            Some(b) if b & 0xC0 == 0x80 => *slot = b,
            _ => return Err(Error::parse("invalid utf-8", line, column)),
        }
    }
    match std::str::from_utf8(&seq[..extra + 1]) {
        Ok(s) => {
            out.push_str(s);
            Ok(())
        }
        Err(_) => Err(Error::parse("invalid utf-8", line, column)),
    }
}
