// this_file: src/input/buffer.rs

//! Fixed-capacity read buffer over a [`ByteSource`].
//!
//! The buffer refills in chunks of at most its capacity, tracks the
//! line/column of the next unread byte, and supports bounded look-ahead
//! without consuming. Capacity is validated at construction; everything
//! downstream relies on `offset <= len <= capacity` holding at all times.

use crate::error::{Error, Result};
use crate::input::ByteSource;
use crate::streaming::{DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
use std::io::ErrorKind;

/// Buffered byte reader with peek support and position tracking.
///
/// Line and column are 0-based internally; error reporting surfaces them
/// 1-based. Multi-byte UTF-8 sequences advance the column once per byte,
/// which is precise enough for diagnostics.
pub struct ByteBuffer<S: ByteSource> {
    source: S,
    buf: Vec<u8>,
    len: usize,
    offset: usize,
    total_read: u64,
    line: u64,
    column: u64,
    eof: bool,
}

impl<S: ByteSource> ByteBuffer<S> {
    /// Creates a buffer with the given chunk capacity.
    ///
    /// Fails with an I/O error when `capacity` is outside
    /// `MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE`.
    pub fn new(source: S, capacity: usize) -> Result<Self> {
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&capacity) {
            return Err(Error::io(format!(
                "invalid buffer size {capacity}: must be between {MIN_BUFFER_SIZE} and {MAX_BUFFER_SIZE}"
            )));
        }
        Ok(ByteBuffer {
            source,
            buf: vec![0; capacity],
            len: 0,
            offset: 0,
            total_read: 0,
            line: 0,
            column: 0,
            eof: false,
        })
    }

    /// Creates a buffer with [`DEFAULT_BUFFER_SIZE`].
    pub fn with_default_capacity(source: S) -> Result<Self> {
        Self::new(source, DEFAULT_BUFFER_SIZE)
    }

    /// Consumes and returns the next byte, or None at EOF.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.offset == self.len && !self.refill()? {
            return Ok(None);
        }
        let byte = self.buf[self.offset];
        self.offset += 1;
        self.total_read += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(Some(byte))
    }

    /// Returns the byte `offset` positions ahead of the read cursor
    /// without consuming, or None when the input ends first.
    ///
    /// Look-ahead is limited to the buffer capacity; a peek past what is
    /// currently buffered compacts the buffer and refills from the source.
    pub fn peek(&mut self, offset: usize) -> Result<Option<u8>> {
        if offset >= self.buf.len() {
            return Ok(None);
        }
        while self.offset + offset >= self.len {
            if self.offset > 0 {
                // Make room at the tail for more bytes.
                self.buf.copy_within(self.offset..self.len, 0);
                self.len -= self.offset;
                self.offset = 0;
            }
            if self.eof || !self.fill_tail()? {
                return Ok(None);
            }
        }
        Ok(Some(self.buf[self.offset + offset]))
    }

    /// Reads up to `n` bytes, returning what the input had. Never fails
    /// partially at EOF; `n == 0` yields an empty vector.
    pub fn read_chunk(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n.min(self.buf.len()));
        for _ in 0..n {
            match self.read_byte()? {
                Some(b) => out.push(b),
                None => break,
            }
        }
        Ok(out)
    }

    /// Rewinds a seekable source to its origin and clears all buffer
    /// state. For non-seekable sources this is a no-op.
    pub fn reset(&mut self) -> Result<()> {
        if !self.source.is_seekable() {
            return Ok(());
        }
        match self.source.seek_to_start() {
            Ok(true) => {
                self.len = 0;
                self.offset = 0;
                self.total_read = 0;
                self.line = 0;
                self.column = 0;
                self.eof = false;
                Ok(())
            }
            Ok(false) | Err(_) => Err(Error::io("failed to seek stream")),
        }
    }

    /// True once the source is exhausted and every buffered byte has been
    /// consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.eof && self.offset >= self.len
    }

    /// Total bytes consumed so far.
    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.total_read
    }

    /// 0-based line of the next unread byte.
    #[inline(always)]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// 0-based column of the next unread byte.
    #[inline(always)]
    pub fn column(&self) -> u64 {
        self.column
    }

    /// Discards consumed bytes and reads a fresh chunk. Returns false at
    /// EOF.
    fn refill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        self.offset = 0;
        self.len = 0;
        self.fill_tail()
    }

    /// Appends bytes after `len`. Returns false when the source reported
    /// EOF instead.
    fn fill_tail(&mut self) -> Result<bool> {
        loop {
            match self.source.read_into(&mut self.buf[self.len..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.len += n;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return Err(Error::io("failed to read from stream")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{slice_source, ReaderSource};

    fn buffer(data: &[u8]) -> ByteBuffer<ReaderSource<&[u8]>> {
        ByteBuffer::new(ReaderSource::new(data), MIN_BUFFER_SIZE).unwrap()
    }

    #[test]
    fn test_capacity_validation() {
        assert!(ByteBuffer::new(ReaderSource::new(&b""[..]), 0).is_err());
        assert!(ByteBuffer::new(ReaderSource::new(&b""[..]), MIN_BUFFER_SIZE - 1).is_err());
        assert!(ByteBuffer::new(ReaderSource::new(&b""[..]), MAX_BUFFER_SIZE + 1).is_err());
        assert!(ByteBuffer::new(ReaderSource::new(&b""[..]), MIN_BUFFER_SIZE).is_ok());
        assert!(ByteBuffer::new(ReaderSource::new(&b""[..]), MAX_BUFFER_SIZE).is_ok());
    }

    #[test]
    fn test_read_byte_sequence() {
        let mut buf = buffer(b"ab");
        assert_eq!(buf.read_byte().unwrap(), Some(b'a'));
        assert_eq!(buf.read_byte().unwrap(), Some(b'b'));
        assert_eq!(buf.read_byte().unwrap(), None);
        assert_eq!(buf.read_byte().unwrap(), None);
        assert!(buf.is_eof());
        assert_eq!(buf.position(), 2);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut buf = buffer(b"xyz");
        assert_eq!(buf.peek(0).unwrap(), Some(b'x'));
        assert_eq!(buf.peek(1).unwrap(), Some(b'y'));
        assert_eq!(buf.peek(2).unwrap(), Some(b'z'));
        assert_eq!(buf.peek(3).unwrap(), None);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.read_byte().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_line_column_tracking() {
        let mut buf = buffer(b"a\nbc");
        assert_eq!((buf.line(), buf.column()), (0, 0));
        buf.read_byte().unwrap();
        assert_eq!((buf.line(), buf.column()), (0, 1));
        buf.read_byte().unwrap(); // newline
        assert_eq!((buf.line(), buf.column()), (1, 0));
        buf.read_byte().unwrap();
        assert_eq!((buf.line(), buf.column()), (1, 1));
    }

    #[test]
    fn test_read_chunk_short_at_eof() {
        let mut buf = buffer(b"hello");
        assert_eq!(buf.read_chunk(0).unwrap(), b"");
        assert_eq!(buf.read_chunk(3).unwrap(), b"hel");
        assert_eq!(buf.read_chunk(10).unwrap(), b"lo");
        assert_eq!(buf.read_chunk(10).unwrap(), b"");
    }

    #[test]
    fn test_reset_on_seekable_source() {
        let mut buf = ByteBuffer::new(slice_source(b"abc"), MIN_BUFFER_SIZE).unwrap();
        assert_eq!(buf.read_byte().unwrap(), Some(b'a'));
        buf.reset().unwrap();
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.read_byte().unwrap(), Some(b'a'));
    }

    #[test]
    fn test_reset_on_plain_reader_is_noop() {
        let mut buf = buffer(b"abc");
        buf.read_byte().unwrap();
        buf.reset().unwrap();
        // Non-seekable: position is untouched, reading continues.
        assert_eq!(buf.position(), 1);
        assert_eq!(buf.read_byte().unwrap(), Some(b'b'));
    }
}
