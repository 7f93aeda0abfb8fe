// this_file: src/path/segment.rs

//! JSONPath segment types and structural key matching.
//!
//! A compiled path is a sequence of segments; the evaluator aligns them
//! against the keys of the current descent into the JSON tree. Structural
//! matching (keys and indices only) lives here; filter predicates are
//! evaluated by the [`crate::path::PathEvaluator`] because they need the
//! value at the level.

use crate::path::filter::FilterPredicate;
use std::fmt;

/// One component of a compiled JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// The `$` root. Always the first segment and never matched against a
    /// stack level.
    Root,
    /// Property access: `.name`, `['name']`, or the recursive `..name`.
    Property {
        /// Member name to match.
        name: String,
        /// True for `..name` (matches at any depth below the current
        /// position).
        recursive: bool,
    },
    /// Array index access: `[3]`. Negative indices count from the end and
    /// only resolve when the enclosing array's length is known.
    ArrayIndex {
        /// The index, possibly negative.
        index: i64,
    },
    /// Wildcard: `.*`, `[*]`, or the recursive `..*`.
    Wildcard {
        /// True for `..*`.
        recursive: bool,
    },
    /// Array slice `[start:end:step]` with optional bounds.
    ArraySlice {
        /// Inclusive start, defaults to 0.
        start: Option<i64>,
        /// Exclusive end, defaults to the array length.
        end: Option<i64>,
        /// Stride, at least 1.
        step: i64,
    },
    /// Filter predicate `[?(...)]`, compiled at path-parse time.
    Filter {
        /// The predicate text as written, kept for display.
        expression: String,
        /// Compiled predicate.
        predicate: FilterPredicate,
    },
}

/// A key on the evaluator's path stack: one level of descent into the
/// JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PathKey {
    /// Object member key.
    Name(String),
    /// Array element index, with the array length when it is known (the
    /// buffered fallback knows it; the streaming engine does not).
    Index {
        /// 0-based element index.
        index: usize,
        /// Length of the enclosing array, if known.
        len: Option<usize>,
    },
}

impl PathKey {
    /// Creates an object member key.
    pub fn name(name: impl Into<String>) -> Self {
        PathKey::Name(name.into())
    }

    /// Creates an array index key with unknown array length.
    pub fn index(index: usize) -> Self {
        PathKey::Index { index, len: None }
    }

    /// Creates an array index key with the array length attached.
    pub fn index_in(index: usize, len: usize) -> Self {
        PathKey::Index {
            index,
            len: Some(len),
        }
    }

    /// Returns true for array index keys.
    #[inline(always)]
    pub fn is_index(&self) -> bool {
        matches!(self, PathKey::Index { .. })
    }

    /// The index value for array keys, None for member keys.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index { index, .. } => Some(*index),
            PathKey::Name(_) => None,
        }
    }
}

impl PathSegment {
    /// True for `..name` and `..*` segments.
    pub fn is_recursive(&self) -> bool {
        matches!(
            self,
            PathSegment::Property { recursive: true, .. }
                | PathSegment::Wildcard { recursive: true }
        )
    }

    /// True for segments that select within arrays: wildcard, index, and
    /// slice.
    pub fn is_array_operation(&self) -> bool {
        matches!(
            self,
            PathSegment::Wildcard { .. }
                | PathSegment::ArrayIndex { .. }
                | PathSegment::ArraySlice { .. }
        )
    }

    /// True when any index or bound is negative.
    pub fn has_negative_bound(&self) -> bool {
        match self {
            PathSegment::ArrayIndex { index } => *index < 0,
            PathSegment::ArraySlice { start, end, .. } => {
                start.is_some_and(|s| s < 0) || end.is_some_and(|e| e < 0)
            }
            _ => false,
        }
    }

    /// Structural match of this segment against a stack key. Filter
    /// segments match any integer key here; their predicate runs in the
    /// evaluator where the level's value is available.
    pub(crate) fn matches_key(&self, key: &PathKey) -> bool {
        match self {
            PathSegment::Root => false,
            PathSegment::Property { name, .. } => match key {
                PathKey::Name(k) => k == name,
                PathKey::Index { .. } => false,
            },
            PathSegment::Wildcard { .. } => true,
            PathSegment::ArrayIndex { index } => match key {
                PathKey::Index { index: k, len } => resolve_index(*index, *len)
                    .is_some_and(|want| want == *k),
                PathKey::Name(_) => false,
            },
            PathSegment::ArraySlice { start, end, step } => match key {
                PathKey::Index { index: k, len } => {
                    slice_contains(*start, *end, *step, *k, *len)
                }
                PathKey::Name(_) => false,
            },
            PathSegment::Filter { .. } => key.is_index(),
        }
    }
}

/// Resolves a possibly-negative index against an optional array length.
/// Negative indices with unknown length resolve to nothing.
fn resolve_index(index: i64, len: Option<usize>) -> Option<usize> {
    if index >= 0 {
        return Some(index as usize);
    }
    let len = len? as i64;
    let resolved = len + index;
    if resolved >= 0 {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Slice membership: `k >= start`, `k < end` when bounded, and stride
/// alignment from the resolved start.
fn slice_contains(start: Option<i64>, end: Option<i64>, step: i64, k: usize, len: Option<usize>) -> bool {
    let resolve_bound = |bound: i64| -> Option<i64> {
        if bound >= 0 {
            Some(bound)
        } else {
            len.map(|l| (l as i64 + bound).max(0))
        }
    };
    let lo = match start {
        Some(s) => match resolve_bound(s) {
            Some(v) => v,
            None => return false,
        },
        None => 0,
    };
    let hi = match end {
        Some(e) => match resolve_bound(e) {
            Some(v) => Some(v),
            None => return false,
        },
        None => None,
    };
    let k = k as i64;
    k >= lo && hi.map_or(true, |h| k < h) && (k - lo) % step == 0
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Root => write!(f, "$"),
            PathSegment::Property { name, recursive } => {
                write!(f, "{}{name}", if *recursive { ".." } else { "." })
            }
            PathSegment::ArrayIndex { index } => write!(f, "[{index}]"),
            PathSegment::Wildcard { recursive } => {
                write!(f, "{}*", if *recursive { ".." } else { "." })
            }
            PathSegment::ArraySlice { start, end, step } => {
                write!(f, "[")?;
                if let Some(s) = start {
                    write!(f, "{s}")?;
                }
                write!(f, ":")?;
                if let Some(e) = end {
                    write!(f, "{e}")?;
                }
                if *step != 1 {
                    write!(f, ":{step}")?;
                }
                write!(f, "]")
            }
            PathSegment::Filter { expression, .. } => write!(f, "[?({expression})]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str) -> PathSegment {
        PathSegment::Property {
            name: name.to_string(),
            recursive: false,
        }
    }

    #[test]
    fn test_property_matches_name_only() {
        let seg = prop("items");
        assert!(seg.matches_key(&PathKey::name("items")));
        assert!(!seg.matches_key(&PathKey::name("other")));
        assert!(!seg.matches_key(&PathKey::index(0)));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let seg = PathSegment::Wildcard { recursive: false };
        assert!(seg.matches_key(&PathKey::name("x")));
        assert!(seg.matches_key(&PathKey::index(7)));
    }

    #[test]
    fn test_array_index_matching() {
        let seg = PathSegment::ArrayIndex { index: 2 };
        assert!(seg.matches_key(&PathKey::index(2)));
        assert!(!seg.matches_key(&PathKey::index(3)));
        assert!(!seg.matches_key(&PathKey::name("2")));
    }

    #[test]
    fn test_negative_index_needs_length() {
        let seg = PathSegment::ArrayIndex { index: -1 };
        assert!(!seg.matches_key(&PathKey::index(4)));
        assert!(seg.matches_key(&PathKey::index_in(4, 5)));
        assert!(!seg.matches_key(&PathKey::index_in(3, 5)));
        // Out of range stays unmatched.
        let far = PathSegment::ArrayIndex { index: -9 };
        assert!(!far.matches_key(&PathKey::index_in(0, 5)));
    }

    #[test]
    fn test_slice_matching_with_step() {
        let seg = PathSegment::ArraySlice {
            start: Some(1),
            end: Some(8),
            step: 2,
        };
        for k in [1usize, 3, 5, 7] {
            assert!(seg.matches_key(&PathKey::index(k)), "expected {k} in slice");
        }
        for k in [0usize, 2, 4, 8, 9] {
            assert!(!seg.matches_key(&PathKey::index(k)), "expected {k} out of slice");
        }
    }

    #[test]
    fn test_slice_open_bounds() {
        let seg = PathSegment::ArraySlice {
            start: None,
            end: None,
            step: 1,
        };
        assert!(seg.matches_key(&PathKey::index(0)));
        assert!(seg.matches_key(&PathKey::index(100)));

        let tail = PathSegment::ArraySlice {
            start: Some(3),
            end: None,
            step: 1,
        };
        assert!(!tail.matches_key(&PathKey::index(2)));
        assert!(tail.matches_key(&PathKey::index(3)));
    }

    #[test]
    fn test_slice_negative_bounds_resolve_against_length() {
        let seg = PathSegment::ArraySlice {
            start: Some(-3),
            end: None,
            step: 1,
        };
        assert!(!seg.matches_key(&PathKey::index(1)));
        assert!(seg.matches_key(&PathKey::index_in(7, 10)));
        assert!(!seg.matches_key(&PathKey::index_in(6, 10)));
        // Unknown length: negative bounds match nothing.
        assert!(!seg.matches_key(&PathKey::index(7)));
    }

    #[test]
    fn test_segment_classification() {
        assert!(PathSegment::Wildcard { recursive: true }.is_recursive());
        assert!(PathSegment::Property {
            name: "a".to_string(),
            recursive: true
        }
        .is_recursive());
        assert!(!prop("a").is_recursive());
        assert!(PathSegment::ArrayIndex { index: 0 }.is_array_operation());
        assert!(!prop("a").is_array_operation());
        assert!(PathSegment::ArrayIndex { index: -1 }.has_negative_bound());
        assert!(PathSegment::ArraySlice {
            start: None,
            end: Some(-2),
            step: 1
        }
        .has_negative_bound());
    }

    #[test]
    fn test_display() {
        assert_eq!(prop("a").to_string(), ".a");
        assert_eq!(
            PathSegment::Property {
                name: "a".to_string(),
                recursive: true
            }
            .to_string(),
            "..a"
        );
        assert_eq!(PathSegment::ArrayIndex { index: 3 }.to_string(), "[3]");
        assert_eq!(
            PathSegment::ArraySlice {
                start: Some(1),
                end: Some(8),
                step: 2
            }
            .to_string(),
            "[1:8:2]"
        );
    }
}
