// this_file: src/error/mod.rs

//! Error handling for the jsonpull reader.
//!
//! A single [`Error`] enum covers the three failure classes of the
//! pipeline: I/O failures on the byte source, JSON syntax violations with
//! line/column positions, and JSONPath expression errors with a context
//! snippet. All errors are fatal to the parse in progress; there is no
//! local recovery.

/// Result type alias for convenience.
pub mod result;
/// Error type definitions and implementations.
pub mod types;

pub use result::Result;
pub use types::Error;
