// this_file: src/streaming/fallback.rs

//! Buffered fallback: materialize the root value, then filter it with a
//! recursive walk.
//!
//! This path serves every expression the streaming walk cannot: recursive
//! descent, filter predicates, negative indices, multiple wildcards, and
//! property-after-wildcard shapes. Memory is proportional to the document
//! here by definition; the dispatch in [`crate::streaming::StreamMode`]
//! only routes expressions this way when it has to.

use crate::ast::Value;
use crate::error::Result;
use crate::input::ByteSource;
use crate::parser::Parser;
use crate::path::{PathEvaluator, PathExpression, PathKey};
use std::collections::VecDeque;

/// Materializes on first pull, then drains the collected matches.
pub struct FallbackEngine {
    expression: PathExpression,
    results: VecDeque<Value>,
    materialized: bool,
}

impl FallbackEngine {
    /// Creates the engine for a non-streamable expression.
    pub fn new(expression: PathExpression) -> Self {
        FallbackEngine {
            expression,
            results: VecDeque::new(),
            materialized: false,
        }
    }

    /// Produces the next matched value, materializing the document on the
    /// first call.
    pub fn advance<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<Option<Value>> {
        if !self.materialized {
            self.materialized = true;
            let root = parser.parse_value()?;
            parser.expect_eof()?;
            let mut evaluator = PathEvaluator::new(self.expression.clone());
            self.results = filter_tree(&mut evaluator, &root).into();
        }
        Ok(self.results.pop_front())
    }
}

/// Collects every value in `root` matching the evaluator's expression.
///
/// Within each container, direct children are matched before any of them
/// is descended into, so shallower matches surface first; recursion then
/// visits every descendant regardless of match to serve `..` segments.
pub fn filter_tree<'v>(evaluator: &mut PathEvaluator<'v>, root: &'v Value) -> Vec<Value> {
    evaluator.reset();
    let mut results = Vec::new();
    if evaluator.matches() {
        results.push(root.clone());
    }
    walk(evaluator, root, &mut results);
    results
}

fn walk<'v>(evaluator: &mut PathEvaluator<'v>, value: &'v Value, results: &mut Vec<Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                evaluator.enter_level(PathKey::name(key.clone()), Some(child));
                if evaluator.matches() {
                    results.push(child.clone());
                }
                evaluator.exit_level();
            }
            for (key, child) in map {
                evaluator.enter_level(PathKey::name(key.clone()), Some(child));
                walk(evaluator, child, results);
                evaluator.exit_level();
            }
        }
        Value::Array(items) => {
            let len = items.len();
            for (index, child) in items.iter().enumerate() {
                evaluator.enter_level(PathKey::index_in(index, len), Some(child));
                if evaluator.matches() {
                    results.push(child.clone());
                }
                evaluator.exit_level();
            }
            for (index, child) in items.iter().enumerate() {
                evaluator.enter_level(PathKey::index_in(index, len), Some(child));
                walk(evaluator, child, results);
                evaluator.exit_level();
            }
        }
        _ => {}
    }
}
