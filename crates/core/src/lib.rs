// this_file: src/lib.rs
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! Core logic for jsonpull, a streaming JSON reader with JSONPath
//! filtering and bounded memory.
//!
//! The pipeline is a single pass: a [`input::ByteBuffer`] chunks bytes
//! from a [`input::ByteSource`], the [`lexer::Lexer`] turns them into
//! tokens, and the [`streaming::JsonStream`] engine pulls tokens into a
//! lazy sequence of [`ast::Value`]s, consulting a compiled
//! [`path::PathExpression`] to decide what to materialize and what to
//! skip.

/// Abstract syntax tree components: values, numbers, tokens.
pub mod ast;

/// Error types and result type alias.
pub mod error;

/// Byte sources and the chunked read buffer.
pub mod input;

/// Lexical analyzer (tokenizer) for RFC 8259 JSON.
pub mod lexer;

/// Token-level recursive-descent parser.
pub mod parser;

/// JSONPath expressions, predicates, and the match cursor.
pub mod path;

/// The pull-based streaming engine and its configuration.
pub mod streaming;

pub use ast::{ArrayBuilder, Map, Number, ObjectBuilder, Token, TokenKind, Value};
pub use error::{Error, Result};
pub use input::{slice_source, ByteBuffer, ByteSource, ReaderSource, SeekableSource};
pub use lexer::Lexer;
pub use parser::{parse, parse_with_options, Parser, ParserOptions};
pub use path::{
    ComparisonOp, FilterPredicate, FilterValue, PathEvaluator, PathExpression, PathKey,
    PathLevel, PathSegment,
};
pub use streaming::{
    filter_tree, stream_values, stream_values_with_config, JsonStream, StreamConfig, StreamMode,
    StreamValueIterator, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_DEPTH, MAX_BUFFER_SIZE,
    MAX_DEPTH_LIMIT, MIN_BUFFER_SIZE,
};
