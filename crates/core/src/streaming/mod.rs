// this_file: src/streaming/mod.rs

//! The streaming engine: pull-based value iteration with optional
//! JSONPath filtering.
//!
//! A [`JsonStream`] couples the byte buffer, lexer, and parser into a
//! lazy sequence of [`Value`]s. With no path it yields every top-level
//! element or member value. With a path it dispatches once, at
//! construction, between two strategies:
//!
//! - **simple streaming** walks the structural skeleton without
//!   materializing siblings, holding at most one matched element at a
//!   time, and stops reading arrays early when the path is index-bounded;
//! - **buffered fallback** materializes the root value and filters it
//!   recursively, which is what recursive descent, filter predicates,
//!   negative indices, and property-after-wildcard shapes require.
//!
//! The engine is single-threaded and cooperative: the consumer drives
//! progress by pulling, and between pulls the parse state is simply held
//! in place. A stream is one-shot; errors are fatal and fuse it.

/// The simple-streaming and unfiltered traversals.
pub mod engine;
/// The buffered fallback: materialize, then filter recursively.
pub mod fallback;

use crate::ast::Value;
use crate::error::{Error, Result};
use crate::input::{slice_source, ByteBuffer, ByteSource, ReaderSource, SeekableSource};
use crate::lexer::Lexer;
use crate::parser::{Parser, ParserOptions};
use crate::path::PathExpression;
pub use fallback::filter_tree;

use engine::{SimpleEngine, UnfilteredEngine};
use fallback::FallbackEngine;
use std::io::{Cursor, Read};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest accepted read-buffer capacity in bytes.
pub const MIN_BUFFER_SIZE: usize = 1024;
/// Default read-buffer capacity in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
/// Largest accepted read-buffer capacity in bytes.
pub const MAX_BUFFER_SIZE: usize = 1_048_576;
/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 512;
/// Largest accepted maximum nesting depth.
pub const MAX_DEPTH_LIMIT: usize = 4096;

/// Configuration for a [`JsonStream`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamConfig {
    /// Bytes per read from the source (default: 8192).
    pub buffer_size: usize,
    /// Maximum nesting depth (default: 512).
    pub max_depth: usize,
    /// Optional JSONPath expression selecting which values to yield.
    pub path: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            path: None,
        }
    }
}

impl StreamConfig {
    /// Starts from defaults with a path expression set.
    pub fn with_path(path: impl Into<String>) -> Self {
        StreamConfig {
            path: Some(path.into()),
            ..StreamConfig::default()
        }
    }

    /// Checks the numeric bounds. Path syntax is validated separately at
    /// stream construction.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&self.buffer_size) {
            return Err(Error::io(format!(
                "invalid buffer size {}: must be between {MIN_BUFFER_SIZE} and {MAX_BUFFER_SIZE}",
                self.buffer_size
            )));
        }
        if !(1..=MAX_DEPTH_LIMIT).contains(&self.max_depth) {
            return Err(Error::io(format!(
                "invalid max depth {}: must be between 1 and {MAX_DEPTH_LIMIT}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

/// Which execution strategy a stream uses for its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// No path: yield every top-level element or member value.
    Unfiltered,
    /// Single-pass structural walk, no sibling materialization.
    SimpleStreaming,
    /// Materialize the root, then filter recursively.
    BufferedFallback,
}

impl StreamMode {
    /// Chooses the strategy for an optional compiled expression.
    pub fn select(expression: Option<&PathExpression>) -> Self {
        match expression {
            None => StreamMode::Unfiltered,
            Some(expr) if expr.can_use_simple_streaming() => StreamMode::SimpleStreaming,
            Some(_) => StreamMode::BufferedFallback,
        }
    }
}

/// Per-mode engine state.
enum ModeState {
    Unfiltered(UnfilteredEngine),
    Simple(SimpleEngine),
    Fallback(FallbackEngine),
}

/// A pull-based stream of JSON values.
///
/// Values arrive in document order. After the first error the stream is
/// fused: further pulls return `Ok(None)`.
pub struct JsonStream<S: ByteSource> {
    parser: Parser<S>,
    state: ModeState,
    items_emitted: u64,
    failed: bool,
}

impl<S: ByteSource> std::fmt::Debug for JsonStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStream")
            .field("items_emitted", &self.items_emitted)
            .field("failed", &self.failed)
            .finish()
    }
}

/// Streams values from a reader with default configuration.
pub fn stream_values<R: Read>(reader: R) -> Result<JsonStream<ReaderSource<R>>> {
    JsonStream::from_reader(reader, StreamConfig::default())
}

/// Streams values from a reader with custom configuration.
pub fn stream_values_with_config<R: Read>(
    reader: R,
    config: StreamConfig,
) -> Result<JsonStream<ReaderSource<R>>> {
    JsonStream::from_reader(reader, config)
}

impl<R: Read> JsonStream<ReaderSource<R>> {
    /// Builds a stream over a non-seekable reader.
    pub fn from_reader(reader: R, config: StreamConfig) -> Result<Self> {
        JsonStream::new(ReaderSource::new(reader), config)
    }
}

impl<'a> JsonStream<SeekableSource<Cursor<&'a [u8]>>> {
    /// Builds a stream over an in-memory byte slice.
    pub fn from_slice(data: &'a [u8], config: StreamConfig) -> Result<Self> {
        JsonStream::new(slice_source(data), config)
    }
}

impl<S: ByteSource> JsonStream<S> {
    /// Builds a stream over any byte source.
    ///
    /// Configuration bounds are checked first; the path expression, when
    /// present, compiles here so path errors surface before any byte of
    /// input is read.
    pub fn new(source: S, config: StreamConfig) -> Result<Self> {
        config.validate()?;
        let expression = match &config.path {
            Some(text) => Some(PathExpression::parse(text)?),
            None => None,
        };
        let buffer = ByteBuffer::new(source, config.buffer_size)?;
        let parser = Parser::new(
            Lexer::new(buffer),
            ParserOptions {
                max_depth: config.max_depth,
            },
        );
        let state = match expression {
            None => ModeState::Unfiltered(UnfilteredEngine::new()),
            Some(expr) if expr.can_use_simple_streaming() => {
                ModeState::Simple(SimpleEngine::new(expr))
            }
            Some(expr) => ModeState::Fallback(FallbackEngine::new(expr)),
        };
        Ok(JsonStream {
            parser,
            state,
            items_emitted: 0,
            failed: false,
        })
    }

    /// Pulls the next matched value, or `None` when the stream is done.
    pub fn next_value(&mut self) -> Result<Option<Value>> {
        if self.failed {
            return Ok(None);
        }
        let result = match &mut self.state {
            ModeState::Unfiltered(engine) => engine.advance(&mut self.parser),
            ModeState::Simple(engine) => engine.advance(&mut self.parser),
            ModeState::Fallback(engine) => engine.advance(&mut self.parser),
        };
        match result {
            Ok(Some(value)) => {
                self.items_emitted += 1;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(error) => {
                self.failed = true;
                Err(error)
            }
        }
    }

    /// The strategy this stream dispatched to.
    pub fn mode(&self) -> StreamMode {
        match self.state {
            ModeState::Unfiltered(_) => StreamMode::Unfiltered,
            ModeState::Simple(_) => StreamMode::SimpleStreaming,
            ModeState::Fallback(_) => StreamMode::BufferedFallback,
        }
    }

    /// Total bytes consumed from the source.
    #[inline(always)]
    pub fn bytes_read(&self) -> u64 {
        self.parser.bytes_read()
    }

    /// Values yielded so far.
    #[inline(always)]
    pub fn items_emitted(&self) -> u64 {
        self.items_emitted
    }

    /// Count of currently open containers.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.parser.depth()
    }

    /// Consumes the stream, producing an iterator adapter.
    pub fn values(self) -> StreamValueIterator<S> {
        StreamValueIterator { stream: self }
    }
}

/// Iterator adapter over a [`JsonStream`].
pub struct StreamValueIterator<S: ByteSource> {
    stream: JsonStream<S>,
}

impl<S: ByteSource> StreamValueIterator<S> {
    /// The underlying stream, for its observers.
    pub fn stream(&self) -> &JsonStream<S> {
        &self.stream
    }
}

impl<S: ByteSource> Iterator for StreamValueIterator<S> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stream.next_value() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(error) => Some(Err(error)),
        }
    }
}
