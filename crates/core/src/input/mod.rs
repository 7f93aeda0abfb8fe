// this_file: src/input/mod.rs

//! Byte input for the streaming reader.
//!
//! A [`ByteSource`] is anything that can fill a buffer with bytes and,
//! optionally, rewind to its origin. [`ByteBuffer`] sits on top of a
//! source and provides the byte/peek/position primitives the lexer
//! consumes, refilling in fixed-size chunks so memory stays bounded
//! regardless of document size.

/// Buffered byte access with look-ahead and position tracking.
pub mod buffer;

pub use buffer::ByteBuffer;

use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// A chunked byte input consumed by [`ByteBuffer`].
///
/// Implementations yield bytes until EOF, reported as a zero-length read.
/// Seekable sources additionally support rewinding to the start, which is
/// what makes a second pass over the same stream possible.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes into `buf`, returning how many were
    /// read. Zero means EOF.
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether [`ByteSource::seek_to_start`] can succeed.
    fn is_seekable(&self) -> bool {
        false
    }

    /// Rewinds to the start of the stream. Returns false when the source
    /// does not support seeking.
    fn seek_to_start(&mut self) -> io::Result<bool> {
        Ok(false)
    }
}

/// Adapts any [`Read`] into a non-seekable [`ByteSource`].
#[derive(Debug)]
pub struct ReaderSource<R: Read> {
    inner: R,
}

impl<R: Read> ReaderSource<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self {
        ReaderSource { inner }
    }

    /// Consumes the adapter and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Adapts a [`Read`] + [`Seek`] into a rewindable [`ByteSource`].
#[derive(Debug)]
pub struct SeekableSource<R: Read + Seek> {
    inner: R,
}

impl<R: Read + Seek> SeekableSource<R> {
    /// Wraps a seekable reader.
    pub fn new(inner: R) -> Self {
        SeekableSource { inner }
    }

    /// Consumes the adapter and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for SeekableSource<R> {
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn seek_to_start(&mut self) -> io::Result<bool> {
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(true)
    }
}

/// Builds a seekable source over an in-memory byte slice.
pub fn slice_source(data: &[u8]) -> SeekableSource<Cursor<&[u8]>> {
    SeekableSource::new(Cursor::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_source_is_not_seekable() {
        let mut src = ReaderSource::new(&b"abc"[..]);
        assert!(!src.is_seekable());
        assert_eq!(src.seek_to_start().unwrap(), false);
        let mut buf = [0u8; 8];
        assert_eq!(src.read_into(&mut buf).unwrap(), 3);
        assert_eq!(src.read_into(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_seekable_source_rewinds() {
        let mut src = slice_source(b"xyz");
        let mut buf = [0u8; 2];
        assert_eq!(src.read_into(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"xy");
        assert!(src.is_seekable());
        assert!(src.seek_to_start().unwrap());
        assert_eq!(src.read_into(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"xy");
    }
}
