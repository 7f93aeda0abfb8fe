// this_file: src/path/evaluator.rs

//! The path evaluator: a mutable cursor over the current descent into the
//! JSON tree.
//!
//! The parser calls [`PathEvaluator::enter_level`] / `exit_level` in
//! pairs as it walks containers; the evaluator answers match queries by
//! aligning the expression's segments against the stack of keys.
//! Non-recursive segments consume exactly one stack level each; a
//! recursive segment may skip any number of levels before matching
//! (classical ancestor search).
//!
//! Values are optional per level. The buffered fallback borrows them from
//! the materialized tree so filter predicates can run; the streaming
//! engine stores none and uses the transient `*_with_current` queries
//! instead.

use crate::ast::Value;
use crate::path::expression::PathExpression;
use crate::path::segment::{PathKey, PathSegment};

/// One level of the evaluator's stack: the key taken to get here and the
/// value at this level, when known.
#[derive(Debug, Clone)]
pub struct PathLevel<'a> {
    /// Key of this descent step.
    pub key: PathKey,
    /// The value at this level, if it has been parsed.
    pub value: Option<&'a Value>,
}

/// Mutable cursor tracking the current position in the JSON tree against
/// a compiled expression.
#[derive(Debug)]
pub struct PathEvaluator<'a> {
    expression: PathExpression,
    stack: Vec<PathLevel<'a>>,
}

impl<'a> PathEvaluator<'a> {
    /// Creates an evaluator for one parse run.
    pub fn new(expression: PathExpression) -> Self {
        PathEvaluator {
            expression,
            stack: Vec::new(),
        }
    }

    /// The expression this evaluator serves.
    pub fn expression(&self) -> &PathExpression {
        &self.expression
    }

    /// Pushes a descent step. `value` may be absent when the level has
    /// not been parsed yet.
    pub fn enter_level(&mut self, key: PathKey, value: Option<&'a Value>) {
        self.stack.push(PathLevel { key, value });
    }

    /// Pops the most recent descent step.
    pub fn exit_level(&mut self) {
        self.stack.pop();
    }

    /// Clears the stack.
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// Current stack depth.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True when the current position matches the full expression,
    /// evaluating filter predicates against the stacked values.
    pub fn matches(&self) -> bool {
        self.match_from(0, 0, false, None)
    }

    /// Like [`PathEvaluator::matches`], with `current` standing in as the
    /// top level's value. Lets the streaming engine test a freshly
    /// materialized element without storing it in the stack.
    pub fn matches_with_current(&self, current: &Value) -> bool {
        self.match_from(0, 0, false, Some(current))
    }

    /// Structural match: filter segments count as matched on any integer
    /// key, no values needed. Used to decide whether a sub-tree is worth
    /// descending into.
    pub fn matches_structure(&self) -> bool {
        self.match_from(0, 0, true, None)
    }

    /// True when the segment aligned with the current depth is a filter,
    /// meaning the element must be materialized before a match decision.
    pub fn needs_value_for_match(&self) -> bool {
        if self.stack.is_empty() {
            return false;
        }
        let top = &self.stack[self.stack.len() - 1];
        if !top.key.is_index() {
            return false;
        }
        matches!(
            self.expression.tail().get(self.stack.len() - 1),
            Some(PathSegment::Filter { .. })
        )
    }

    /// True when the expression is index-bounded and the top-of-stack
    /// integer key is at or past the bound, so the rest of the enclosing
    /// array cannot match.
    pub fn can_terminate_early(&self) -> bool {
        let Some(termination) = self.expression.termination_index() else {
            return false;
        };
        match self.stack.last().and_then(|level| level.key.as_index()) {
            Some(index) => index >= termination,
            None => false,
        }
    }

    /// For the streaming hand-off: the run of `Property` / `ArrayIndex`
    /// segments that remain past the current depth and can be walked into
    /// a materialized value. Stops at the first segment that cannot.
    pub fn remaining_segments(&self) -> &[PathSegment] {
        let tail = self.expression.tail();
        let consumed = self.stack.len().min(tail.len());
        let rest = &tail[consumed..];
        let walkable = rest
            .iter()
            .take_while(|segment| {
                matches!(
                    segment,
                    PathSegment::Property { recursive: false, .. }
                        | PathSegment::ArrayIndex { .. }
                )
            })
            .count();
        &rest[..walkable]
    }

    /// True when the stack is consistent with a prefix of the expression,
    /// i.e. descending further may still reach a match. Structural only.
    pub fn matches_prefix(&self) -> bool {
        self.prefix_from(0, 0)
    }

    /// Aligns segments (from `si`) against stack levels (from `li`).
    /// Success requires complete consumption of both.
    fn match_from(&self, si: usize, li: usize, structural: bool, current: Option<&Value>) -> bool {
        let tail = self.expression.tail();
        if si == tail.len() {
            return li == self.stack.len();
        }
        if li == self.stack.len() {
            return false;
        }
        let segment = &tail[si];
        if segment.is_recursive() {
            // Try here, then retry the same segment one level deeper.
            if self.level_matches(segment, li, structural, current)
                && self.match_from(si + 1, li + 1, structural, current)
            {
                return true;
            }
            return self.match_from(si, li + 1, structural, current);
        }
        self.level_matches(segment, li, structural, current)
            && self.match_from(si + 1, li + 1, structural, current)
    }

    /// Prefix alignment: every stack level consumed, segments may remain.
    fn prefix_from(&self, si: usize, li: usize) -> bool {
        if li == self.stack.len() {
            return true;
        }
        let tail = self.expression.tail();
        if si == tail.len() {
            // Deeper than the expression reaches; nothing below can match.
            return false;
        }
        let segment = &tail[si];
        if segment.is_recursive() {
            if self.level_matches(segment, li, true, None) && self.prefix_from(si + 1, li + 1) {
                return true;
            }
            return self.prefix_from(si, li + 1);
        }
        self.level_matches(segment, li, true, None) && self.prefix_from(si + 1, li + 1)
    }

    /// Matches one segment against one stack level. Filter predicates run
    /// against the level's value unless `structural` is set.
    fn level_matches(
        &self,
        segment: &PathSegment,
        li: usize,
        structural: bool,
        current: Option<&Value>,
    ) -> bool {
        let level = &self.stack[li];
        match segment {
            PathSegment::Filter { predicate, .. } => {
                if !level.key.is_index() {
                    return false;
                }
                if structural {
                    return true;
                }
                let value = if li + 1 == self.stack.len() {
                    current.or(level.value)
                } else {
                    level.value
                };
                value.map_or(false, |v| predicate.evaluate(v))
            }
            _ => segment.matches_key(&level.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Map, Number};
    use crate::path::PathExpression;

    fn evaluator(text: &str) -> PathEvaluator<'static> {
        PathEvaluator::new(PathExpression::parse(text).unwrap())
    }

    #[test]
    fn test_root_only_matches_empty_stack() {
        let mut ev = evaluator("$");
        assert!(ev.matches());
        ev.enter_level(PathKey::name("a"), None);
        assert!(!ev.matches());
        ev.exit_level();
        assert!(ev.matches());
    }

    #[test]
    fn test_property_chain_alignment() {
        let mut ev = evaluator("$.a.b");
        ev.enter_level(PathKey::name("a"), None);
        assert!(!ev.matches());
        assert!(ev.matches_prefix());
        ev.enter_level(PathKey::name("b"), None);
        assert!(ev.matches());
        ev.enter_level(PathKey::name("c"), None);
        assert!(!ev.matches());
        assert!(!ev.matches_prefix());
    }

    #[test]
    fn test_wildcard_matches_any_index() {
        let mut ev = evaluator("$.items[*]");
        ev.enter_level(PathKey::name("items"), None);
        for i in 0..3 {
            ev.enter_level(PathKey::index(i), None);
            assert!(ev.matches(), "index {i}");
            ev.exit_level();
        }
        ev.enter_level(PathKey::name("nested"), None);
        assert!(ev.matches());
        ev.exit_level();
        ev.exit_level();
        ev.enter_level(PathKey::name("other"), None);
        assert!(!ev.matches_prefix());
    }

    #[test]
    fn test_recursive_descent_matches_at_any_depth() {
        let mut ev = evaluator("$..name");
        ev.enter_level(PathKey::name("name"), None);
        assert!(ev.matches());
        ev.exit_level();

        ev.enter_level(PathKey::name("a"), None);
        ev.enter_level(PathKey::name("b"), None);
        ev.enter_level(PathKey::name("name"), None);
        assert!(ev.matches());
        ev.exit_level();
        assert!(!ev.matches());
    }

    #[test]
    fn test_recursive_descent_with_prefix() {
        let mut ev = evaluator("$.a..name");
        ev.enter_level(PathKey::name("a"), None);
        ev.enter_level(PathKey::index(0), None);
        ev.enter_level(PathKey::name("name"), None);
        assert!(ev.matches());
        ev.reset();
        ev.enter_level(PathKey::name("x"), None);
        ev.enter_level(PathKey::name("name"), None);
        assert!(!ev.matches());
    }

    #[test]
    fn test_filter_needs_value() {
        let mut ev = evaluator("$.items[?(@.p > 10)]");
        ev.enter_level(PathKey::name("items"), None);
        assert!(!ev.needs_value_for_match());
        ev.enter_level(PathKey::index(0), None);
        assert!(ev.needs_value_for_match());
        // Without a value the filter cannot pass, structurally it can.
        assert!(!ev.matches());
        assert!(ev.matches_structure());

        let mut passing = Map::default();
        passing.insert("p".to_string(), Value::Number(Number::Integer(15)));
        let passing = Value::Object(passing);
        assert!(ev.matches_with_current(&passing));

        let mut failing = Map::default();
        failing.insert("p".to_string(), Value::Number(Number::Integer(5)));
        let failing = Value::Object(failing);
        assert!(!ev.matches_with_current(&failing));
    }

    #[test]
    fn test_filter_on_object_key_never_matches() {
        let mut ev = evaluator("$.items[?(@.p)]");
        ev.enter_level(PathKey::name("items"), None);
        ev.enter_level(PathKey::name("k"), None);
        assert!(!ev.matches_structure());
        assert!(!ev.needs_value_for_match());
    }

    #[test]
    fn test_stored_values_drive_filters() {
        let value = {
            let mut map = Map::default();
            map.insert("p".to_string(), Value::Number(Number::Integer(25)));
            Value::Object(map)
        };
        let mut ev = PathEvaluator::new(PathExpression::parse("$.items[?(@.p > 10)]").unwrap());
        ev.enter_level(PathKey::name("items"), None);
        ev.enter_level(PathKey::index_in(0, 1), Some(&value));
        assert!(ev.matches());
    }

    #[test]
    fn test_can_terminate_early() {
        let mut ev = evaluator("$[2]");
        ev.enter_level(PathKey::index(1), None);
        assert!(!ev.can_terminate_early());
        ev.exit_level();
        ev.enter_level(PathKey::index(3), None);
        assert!(ev.can_terminate_early());
        ev.exit_level();
        ev.enter_level(PathKey::name("a"), None);
        assert!(!ev.can_terminate_early());
    }

    #[test]
    fn test_no_early_termination_without_bound() {
        let mut ev = evaluator("$.items[*]");
        ev.enter_level(PathKey::name("items"), None);
        ev.enter_level(PathKey::index(1000), None);
        assert!(!ev.can_terminate_early());
    }

    #[test]
    fn test_remaining_segments_walkable_run() {
        let mut ev = evaluator("$.items[?(@.p)].meta.tags[0]");
        ev.enter_level(PathKey::name("items"), None);
        ev.enter_level(PathKey::index(0), None);
        let rest = ev.remaining_segments();
        assert_eq!(rest.len(), 3);
        assert!(matches!(rest[0], PathSegment::Property { ref name, .. } if name == "meta"));
        assert!(matches!(rest[2], PathSegment::ArrayIndex { index: 0 }));
    }

    #[test]
    fn test_remaining_segments_stops_at_wildcard() {
        let mut ev = evaluator("$.a.b[*]");
        ev.enter_level(PathKey::name("a"), None);
        let rest = ev.remaining_segments();
        assert_eq!(rest.len(), 1);
        assert!(matches!(rest[0], PathSegment::Property { ref name, .. } if name == "b"));
    }

    #[test]
    fn test_reset_clears_stack() {
        let mut ev = evaluator("$.a");
        ev.enter_level(PathKey::name("a"), None);
        assert_eq!(ev.depth(), 1);
        ev.reset();
        assert_eq!(ev.depth(), 0);
        assert!(!ev.matches());
    }

    #[test]
    fn test_slice_alignment() {
        let mut ev = evaluator("$[1:8:2]");
        for (i, expected) in [(0, false), (1, true), (2, false), (3, true), (8, false)] {
            ev.enter_level(PathKey::index(i), None);
            assert_eq!(ev.matches(), expected, "index {i}");
            ev.exit_level();
        }
    }
}
