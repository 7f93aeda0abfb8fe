// this_file: src/lib.rs
// Main jsonpull library that re-exports core functionality

//! # jsonpull
//!
//! A streaming JSON reader that processes arbitrarily large documents
//! with bounded memory, exposing matched values lazily through pull-based
//! iteration.
//!
//! A JSONPath expression can filter the stream *during* parsing, so a
//! pattern like `$.items[*]` is served element by element without ever
//! materializing the whole document:
//!
//! ```rust
//! use jsonpull::{JsonStream, StreamConfig};
//!
//! let data = br#"{"items":[{"n":1},{"n":2},{"n":3}]}"#;
//! let mut stream =
//!     JsonStream::from_slice(data, StreamConfig::with_path("$.items[*]")).unwrap();
//! let mut count = 0;
//! while let Some(item) = stream.next_value().unwrap() {
//!     count += 1;
//!     assert_eq!(item["n"].as_i64(), Some(count));
//! }
//! assert_eq!(count, 3);
//! ```

// Re-export core functionality
pub use jsonpull_core::{parse, parse_with_options, Error, Lexer, Parser, ParserOptions, Result};

// Re-export streaming functionality
pub use jsonpull_core::{
    stream_values, stream_values_with_config, JsonStream, StreamConfig, StreamMode,
    StreamValueIterator, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_DEPTH, MAX_BUFFER_SIZE,
    MAX_DEPTH_LIMIT, MIN_BUFFER_SIZE,
};

// Re-export AST types
pub use jsonpull_core::ast::{ArrayBuilder, Map, Number, ObjectBuilder, Token, TokenKind, Value};

// Re-export input types
pub use jsonpull_core::input::{slice_source, ByteBuffer, ByteSource, ReaderSource, SeekableSource};

// Re-export JSONPath types
pub use jsonpull_core::path::{
    ComparisonOp, FilterPredicate, FilterValue, PathEvaluator, PathExpression, PathKey,
    PathLevel, PathSegment,
};
