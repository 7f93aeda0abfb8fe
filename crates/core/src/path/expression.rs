// this_file: src/path/expression.rs

//! Compiled JSONPath expressions and their capability analysis.
//!
//! The streaming engine picks an execution strategy per expression, so the
//! relevant properties are computed once at construction and cached:
//! whether the path uses recursive descent, whether a single left-to-right
//! pass can serve it, and whether array parsing can stop early at a known
//! index.

use crate::error::Result;
use crate::path::parser;
use crate::path::segment::PathSegment;
use std::fmt;

/// An immutable compiled JSONPath expression.
///
/// The first segment is always [`PathSegment::Root`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    text: String,
    segments: Vec<PathSegment>,
    has_recursive: bool,
    has_filter: bool,
    can_simple_stream: bool,
    termination_index: Option<usize>,
}

impl PathExpression {
    /// Compiles an expression from its text form.
    pub fn parse(text: &str) -> Result<Self> {
        parser::parse(text)
    }

    /// Builds an expression from already-parsed segments. Used by the
    /// path parser; capability flags are computed here.
    pub(crate) fn new(text: &str, segments: Vec<PathSegment>) -> Self {
        let tail = &segments[1..];
        let has_recursive = tail.iter().any(PathSegment::is_recursive);
        let has_filter = tail
            .iter()
            .any(|s| matches!(s, PathSegment::Filter { .. }));
        let wildcard_count = tail
            .iter()
            .filter(|s| matches!(s, PathSegment::Wildcard { .. }))
            .count();
        let has_negative = tail.iter().any(PathSegment::has_negative_bound);
        let array_op_then_property = tail.windows(2).any(|pair| {
            pair[0].is_array_operation() && matches!(pair[1], PathSegment::Property { .. })
        });
        let can_simple_stream = segments.len() >= 2
            && !has_recursive
            && wildcard_count <= 1
            && !has_filter
            && !array_op_then_property
            && !has_negative;

        // When several segments qualify, the largest candidate wins: a
        // smaller inner index must not truncate an outer array that still
        // needs later elements.
        let termination_index = tail
            .iter()
            .filter_map(|segment| match segment {
                PathSegment::ArrayIndex { index } if *index >= 0 => Some(*index as usize + 1),
                PathSegment::ArraySlice { end: Some(end), .. } if *end > 0 => {
                    Some(*end as usize)
                }
                _ => None,
            })
            .max();

        PathExpression {
            text: text.to_string(),
            segments,
            has_recursive,
            has_filter,
            can_simple_stream,
            termination_index,
        }
    }

    /// The expression text as written.
    pub fn original(&self) -> &str {
        &self.text
    }

    /// The compiled segments, starting with the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The segments after the root.
    pub(crate) fn tail(&self) -> &[PathSegment] {
        &self.segments[1..]
    }

    /// True when any segment uses `..` recursive descent.
    #[inline(always)]
    pub fn has_recursive(&self) -> bool {
        self.has_recursive
    }

    /// True when any segment is a filter predicate.
    #[inline(always)]
    pub fn has_filter(&self) -> bool {
        self.has_filter
    }

    /// True when the expression can be served by the single-pass
    /// streaming strategy without materializing the document.
    #[inline(always)]
    pub fn can_use_simple_streaming(&self) -> bool {
        self.can_simple_stream
    }

    /// True when array parsing can stop once a known index is reached.
    #[inline(always)]
    pub fn has_early_termination(&self) -> bool {
        self.termination_index.is_some()
    }

    /// The first index past every element the expression can still
    /// match, when bounded.
    #[inline(always)]
    pub fn termination_index(&self) -> Option<usize> {
        self.termination_index
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
