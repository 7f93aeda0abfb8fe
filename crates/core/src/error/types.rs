// this_file: src/error/types.rs

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types that can occur while reading a JSON stream.
///
/// Each variant carries enough positional context to diagnose the failure
/// without access to the source code: parse errors report the 1-based line
/// and column of the offending byte, path errors carry the original
/// expression text, and I/O errors optionally name the file involved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The byte source failed, was exhausted unexpectedly, or the stream
    /// configuration was invalid (for example a buffer size outside the
    /// permitted range).
    #[error("{message}{}", file_suffix(.file))]
    Io {
        /// Human-readable description of the failure.
        message: String,
        /// Path of the file backing the stream, when known.
        file: Option<PathBuf>,
    },

    /// The input violated RFC 8259 JSON syntax.
    #[error("{message} at line {line}, column {column}")]
    Parse {
        /// Human-readable description of the violation.
        message: String,
        /// 1-based line of the offending byte.
        line: u64,
        /// 1-based column of the offending byte.
        column: u64,
    },

    /// A JSONPath expression was malformed or used an unsupported feature.
    #[error("{message} (path: {path})")]
    Path {
        /// Human-readable description, including a context snippet around
        /// the failure position.
        message: String,
        /// The original expression text.
        path: String,
        /// Character index of the failure within the expression.
        position: usize,
    },
}

fn file_suffix(file: &Option<PathBuf>) -> String {
    match file {
        Some(path) => format!(" (file: {})", path.display()),
        None => String::new(),
    }
}

impl Error {
    /// Creates an I/O error with no associated file.
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io {
            message: message.into(),
            file: None,
        }
    }

    /// Creates a parse error at the given 1-based line and column.
    pub fn parse(message: impl Into<String>, line: u64, column: u64) -> Self {
        Error::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Creates a path error at `position` (a character index) within
    /// `path`. A snippet of up to ten characters on either side of the
    /// position is folded into the message.
    pub fn path(message: impl Into<String>, path: impl Into<String>, position: usize) -> Self {
        let path = path.into();
        let mut message = message.into();
        let snippet = context_snippet(&path, position);
        if !snippet.is_empty() {
            message = format!("{message} at position {position} near '{snippet}'");
        }
        Error::Path {
            message,
            path,
            position,
        }
    }

    /// Attaches a file path to an I/O error. Other variants are returned
    /// unchanged.
    pub fn with_file(self, file: impl AsRef<Path>) -> Self {
        match self {
            Error::Io { message, .. } => Error::Io {
                message,
                file: Some(file.as_ref().to_path_buf()),
            },
            other => other,
        }
    }

    /// Returns true if this is an I/O error.
    #[inline(always)]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    /// Returns true if this is a JSON syntax error.
    #[inline(always)]
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Returns true if this is a JSONPath error.
    #[inline(always)]
    pub fn is_path(&self) -> bool {
        matches!(self, Error::Path { .. })
    }

    /// The 1-based line of a parse error, if applicable.
    pub fn line(&self) -> Option<u64> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The 1-based column of a parse error, if applicable.
    pub fn column(&self) -> Option<u64> {
        match self {
            Error::Parse { column, .. } => Some(*column),
            _ => None,
        }
    }
}

/// Extracts up to ten characters on either side of `position` for path
/// error messages. Works on character boundaries so multi-byte expressions
/// never split.
fn context_snippet(text: &str, position: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let position = position.min(chars.len());
    let start = position.saturating_sub(10);
    let end = (position + 10).min(chars.len());
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse("unexpected character ','", 1, 7);
        assert_eq!(err.to_string(), "unexpected character ',' at line 1, column 7");
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(7));
        assert!(err.is_parse());
    }

    #[test]
    fn test_path_error_display_includes_path() {
        let err = Error::path("unexpected character '#'", "$.items[#]", 8);
        let text = err.to_string();
        assert!(text.ends_with("(path: $.items[#])"), "got: {text}");
        assert!(text.contains("near '"), "got: {text}");
        assert!(err.is_path());
    }

    #[test]
    fn test_io_error_with_file() {
        let err = Error::io("failed to read from stream").with_file("data/items.json");
        assert_eq!(
            err.to_string(),
            "failed to read from stream (file: data/items.json)"
        );
        assert!(err.is_io());
    }

    #[test]
    fn test_io_error_without_file() {
        let err = Error::io("invalid buffer size");
        assert_eq!(err.to_string(), "invalid buffer size");
    }

    #[test]
    fn test_context_snippet_clamps_to_bounds() {
        assert_eq!(context_snippet("$.a", 1), "$.a");
        assert_eq!(context_snippet("", 5), "");
        let long = "$.aaaaaaaaaaaaaaaaaaaaaaaaa";
        assert_eq!(context_snippet(long, 0).chars().count(), 10);
    }
}
