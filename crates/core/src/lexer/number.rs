// this_file: src/lexer/number.rs

//! Number literal scanning per the RFC 8259 grammar.
//!
//! Integers that fit an i64 keep integer fidelity; fractions, exponents,
//! and overflowing magnitudes become floats. Leading zeros, bare signs,
//! and dangling fraction/exponent parts are rejected.

use crate::ast::Number;
use crate::error::{Error, Result};
use crate::input::{ByteBuffer, ByteSource};

/// Scans a number literal starting at the current buffer position. Stops
/// at the first byte that cannot extend the literal, leaving it unread.
pub(super) fn lex_number<S: ByteSource>(buffer: &mut ByteBuffer<S>) -> Result<Number> {
    let line = buffer.line() + 1;
    let column = buffer.column() + 1;
    let mut raw = String::new();
    let mut is_float = false;

    if buffer.peek(0)? == Some(b'-') {
        buffer.read_byte()?;
        raw.push('-');
    }

    // Integer part: a lone zero, or a non-zero digit followed by more.
    match buffer.peek(0)? {
        Some(b'0') => {
            buffer.read_byte()?;
            raw.push('0');
            if matches!(buffer.peek(0)?, Some(b'0'..=b'9')) {
                return Err(Error::parse("invalid number: leading zero", line, column));
            }
        }
        Some(b @ b'1'..=b'9') => {
            buffer.read_byte()?;
            raw.push(b as char);
            read_digits(buffer, &mut raw)?;
        }
        _ => return Err(Error::parse("invalid number", line, column)),
    }

    if buffer.peek(0)? == Some(b'.') {
        buffer.read_byte()?;
        raw.push('.');
        is_float = true;
        if read_digits(buffer, &mut raw)? == 0 {
            return Err(Error::parse(
                "invalid number: missing fraction digits",
                line,
                column,
            ));
        }
    }

    if matches!(buffer.peek(0)?, Some(b'e' | b'E')) {
        buffer.read_byte()?;
        raw.push('e');
        is_float = true;
        if let Some(sign @ (b'+' | b'-')) = buffer.peek(0)? {
            buffer.read_byte()?;
            raw.push(sign as char);
        }
        if read_digits(buffer, &mut raw)? == 0 {
            return Err(Error::parse(
                "invalid number: missing exponent digits",
                line,
                column,
            ));
        }
    }

    if !is_float {
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(Number::Integer(i));
        }
        // Magnitude exceeds i64: fall through and carry it as a float.
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Number::Float(f)),
        _ => Err(Error::parse("invalid number", line, column)),
    }
}

/// Consumes a run of ASCII digits, returning how many were read.
fn read_digits<S: ByteSource>(buffer: &mut ByteBuffer<S>, raw: &mut String) -> Result<usize> {
    let mut count = 0;
    while let Some(b @ b'0'..=b'9') = buffer.peek(0)? {
        buffer.read_byte()?;
        raw.push(b as char);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{slice_source, SeekableSource};
    use std::io::Cursor;

    fn scan(input: &str) -> Result<Number> {
        let mut buffer: ByteBuffer<SeekableSource<Cursor<&[u8]>>> =
            ByteBuffer::with_default_capacity(slice_source(input.as_bytes())).unwrap();
        lex_number(&mut buffer)
    }

    #[test]
    fn test_integers() {
        assert_eq!(scan("0").unwrap(), Number::Integer(0));
        assert_eq!(scan("42").unwrap(), Number::Integer(42));
        assert_eq!(scan("-42").unwrap(), Number::Integer(-42));
        assert_eq!(scan("-0").unwrap(), Number::Integer(0));
        assert_eq!(scan(&i64::MAX.to_string()).unwrap(), Number::Integer(i64::MAX));
        assert_eq!(scan(&i64::MIN.to_string()).unwrap(), Number::Integer(i64::MIN));
    }

    #[test]
    fn test_floats() {
        assert_eq!(scan("3.14").unwrap(), Number::Float(3.14));
        assert_eq!(scan("-0.5").unwrap(), Number::Float(-0.5));
        assert_eq!(scan("1e10").unwrap(), Number::Float(1e10));
        assert_eq!(scan("1E10").unwrap(), Number::Float(1e10));
        assert_eq!(scan("2.5e-3").unwrap(), Number::Float(2.5e-3));
        assert_eq!(scan("2.5e+3").unwrap(), Number::Float(2500.0));
        assert_eq!(scan("0.0").unwrap(), Number::Float(0.0));
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(
            scan("999999999999999999999").unwrap(),
            Number::Float(999999999999999999999.0)
        );
    }

    #[test]
    fn test_leading_zero_rejected() {
        let err = scan("01").unwrap_err();
        assert!(err.to_string().contains("leading zero"), "{err}");
        assert!(scan("-01").is_err());
        assert!(scan("007").is_err());
    }

    #[test]
    fn test_bare_and_dangling_parts_rejected() {
        assert!(scan("-").is_err());
        assert!(scan("-x").is_err());
        assert!(scan("1.").is_err());
        assert!(scan("1e").is_err());
        assert!(scan("1e+").is_err());
        assert!(scan(".5").is_err());
    }

    #[test]
    fn test_stops_at_delimiter() {
        let mut buffer: ByteBuffer<SeekableSource<Cursor<&[u8]>>> =
            ByteBuffer::with_default_capacity(slice_source(b"12,34")).unwrap();
        assert_eq!(lex_number(&mut buffer).unwrap(), Number::Integer(12));
        assert_eq!(buffer.read_byte().unwrap(), Some(b','));
    }

    #[test]
    fn test_huge_exponent_rejected() {
        assert!(scan("1e999").is_err());
    }
}
