// this_file: src/error/result.rs

use super::types::Error;

/// Convenience type alias for Results using jsonpull's Error type.
///
/// This keeps function signatures concise throughout the codebase while
/// maintaining type safety. Most reading and parsing functions return this.
pub type Result<T> = std::result::Result<T, Error>;
