// this_file: src/streaming/engine.rs

//! Resumable traversals for the unfiltered and simple-streaming modes.
//!
//! Both engines keep an explicit frame stack instead of recursing, so the
//! walk can suspend after every yielded value and resume on the next
//! pull. Depth accounting stays in the parser: every frame push goes
//! through `begin_container` and every pop through `end_container`.

use crate::ast::{Token, TokenKind, Value};
use crate::error::{Error, Result};
use crate::input::ByteSource;
use crate::parser::Parser;
use crate::path::{PathEvaluator, PathExpression, PathKey, PathSegment};

/// Traversal state for the no-path mode: yield each element of a root
/// array, each member value of a root object, or a scalar root once.
pub struct UnfilteredEngine {
    root: RootState,
}

#[derive(Clone, Copy)]
enum RootState {
    NotStarted,
    Array { at_start: bool },
    Object { at_start: bool },
    Done,
}

impl UnfilteredEngine {
    /// Fresh engine, nothing read yet.
    pub fn new() -> Self {
        UnfilteredEngine {
            root: RootState::NotStarted,
        }
    }

    /// Produces the next top-level value.
    pub fn advance<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<Option<Value>> {
        loop {
            match self.root {
                RootState::NotStarted => {
                    let token = parser.next_token()?;
                    match token.kind {
                        TokenKind::LBracket => {
                            parser.begin_container(&token)?;
                            self.root = RootState::Array { at_start: true };
                        }
                        TokenKind::LBrace => {
                            parser.begin_container(&token)?;
                            self.root = RootState::Object { at_start: true };
                        }
                        TokenKind::Eof => {
                            return Err(Error::parse(
                                "unexpected end of file",
                                token.line,
                                token.column,
                            ))
                        }
                        _ => {
                            let value = parser.parse_value_from(token)?;
                            parser.expect_eof()?;
                            self.root = RootState::Done;
                            return Ok(Some(value));
                        }
                    }
                }
                RootState::Array { at_start } => {
                    self.root = RootState::Array { at_start: false };
                    match next_element_token(parser, at_start, ContainerKind::Array)? {
                        Some(element) => {
                            let value = parser.parse_value_from(element)?;
                            return Ok(Some(value));
                        }
                        None => {
                            parser.end_container();
                            parser.expect_eof()?;
                            self.root = RootState::Done;
                        }
                    }
                }
                RootState::Object { at_start } => {
                    self.root = RootState::Object { at_start: false };
                    match next_element_token(parser, at_start, ContainerKind::Object)? {
                        Some(key_token) => {
                            parser.member_key(key_token)?;
                            parser.expect_colon()?;
                            let value = parser.parse_value()?;
                            return Ok(Some(value));
                        }
                        None => {
                            parser.end_container();
                            parser.expect_eof()?;
                            self.root = RootState::Done;
                        }
                    }
                }
                RootState::Done => return Ok(None),
            }
        }
    }
}

/// Traversal state for simple streaming: walk the structural skeleton
/// toward the path target, materializing only matched elements.
pub struct SimpleEngine {
    evaluator: PathEvaluator<'static>,
    frames: Vec<Frame>,
    state: EngineState,
}

#[derive(Clone, Copy)]
enum EngineState {
    NotStarted,
    Running,
    Done,
}

/// One open container in the walk.
enum Frame {
    Array { index: usize, at_start: bool },
    Object { at_start: bool },
}

impl Frame {
    fn array() -> Self {
        Frame::Array {
            index: 0,
            at_start: true,
        }
    }

    fn object() -> Self {
        Frame::Object { at_start: true }
    }
}

/// Which container grammar a separator belongs to.
#[derive(Clone, Copy)]
enum ContainerKind {
    Array,
    Object,
}

impl ContainerKind {
    fn close(self) -> TokenKind {
        match self {
            ContainerKind::Array => TokenKind::RBracket,
            ContainerKind::Object => TokenKind::RBrace,
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            ContainerKind::Array => "expected ',' or ']'",
            ContainerKind::Object => "expected ',' or '}'",
        }
    }

    fn close_description(self) -> &'static str {
        match self {
            ContainerKind::Array => "unexpected token ']'",
            ContainerKind::Object => "unexpected token '}'",
        }
    }
}

/// Shared separator handling: returns the first token of the next
/// element (or member key), or `None` when the container closed.
fn next_element_token<S: ByteSource>(
    parser: &mut Parser<S>,
    first: bool,
    kind: ContainerKind,
) -> Result<Option<Token>> {
    let token = parser.next_token()?;
    if first {
        if token.kind == kind.close() {
            return Ok(None);
        }
        return Ok(Some(token));
    }
    match token.kind {
        TokenKind::Comma => {
            let next = parser.next_token()?;
            if next.kind == kind.close() {
                // Trailing comma.
                return Err(Error::parse(kind.close_description(), next.line, next.column));
            }
            Ok(Some(next))
        }
        ref close if *close == kind.close() => Ok(None),
        TokenKind::Eof => Err(Error::parse(
            "unexpected end of file",
            token.line,
            token.column,
        )),
        ref other => Err(Error::parse(
            format!("{}, found {}", kind.expectation(), other.describe()),
            token.line,
            token.column,
        )),
    }
}

impl SimpleEngine {
    /// Creates the engine for a streamable expression.
    pub fn new(expression: PathExpression) -> Self {
        SimpleEngine {
            evaluator: PathEvaluator::new(expression),
            frames: Vec::new(),
            state: EngineState::NotStarted,
        }
    }

    /// Produces the next matched value.
    pub fn advance<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<Option<Value>> {
        loop {
            match self.state {
                EngineState::NotStarted => {
                    self.state = EngineState::Running;
                    let token = parser.next_token()?;
                    match token.kind {
                        TokenKind::LBracket => {
                            parser.begin_container(&token)?;
                            self.frames.push(Frame::array());
                        }
                        TokenKind::LBrace => {
                            parser.begin_container(&token)?;
                            self.frames.push(Frame::object());
                        }
                        TokenKind::Eof => {
                            return Err(Error::parse(
                                "unexpected end of file",
                                token.line,
                                token.column,
                            ))
                        }
                        _ => {
                            // A scalar root cannot match a multi-segment
                            // path; the token itself is already validated.
                            parser.expect_eof()?;
                            self.state = EngineState::Done;
                            return Ok(None);
                        }
                    }
                }
                EngineState::Running => {
                    if self.frames.is_empty() {
                        self.state = EngineState::Done;
                        continue;
                    }
                    let in_array = matches!(self.frames.last(), Some(Frame::Array { .. }));
                    let step = if in_array {
                        self.array_step(parser)?
                    } else {
                        self.object_step(parser)?
                    };
                    if let Some(value) = step {
                        return Ok(Some(value));
                    }
                }
                EngineState::Done => return Ok(None),
            }
        }
    }

    /// Processes one array element (or the closing bracket).
    fn array_step<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<Option<Value>> {
        let first = match self.frames.last_mut() {
            Some(Frame::Array { at_start, .. }) => std::mem::replace(at_start, false),
            _ => return Ok(None),
        };
        let element = match next_element_token(parser, first, ContainerKind::Array)? {
            Some(token) => token,
            None => {
                self.close_frame(parser)?;
                return Ok(None);
            }
        };
        let index = match self.frames.last_mut() {
            Some(Frame::Array { index, .. }) => {
                let current = *index;
                *index += 1;
                current
            }
            _ => 0,
        };
        self.evaluator.enter_level(PathKey::index(index), None);

        // Index-bounded paths: nothing at or past the bound can match, so
        // the rest of this array is drained structurally.
        if self.evaluator.can_terminate_early() {
            self.evaluator.exit_level();
            parser.skip_value_from(element)?;
            self.drain_array(parser)?;
            return Ok(None);
        }

        if self.evaluator.needs_value_for_match() {
            let value = parser.parse_value_from(element)?;
            let matched = self.evaluator.matches_with_current(&value);
            let result = if matched {
                Some(walk_remaining(self.evaluator.remaining_segments(), value))
            } else {
                None
            };
            self.evaluator.exit_level();
            return Ok(result);
        }

        if self.evaluator.matches() {
            let value = parser.parse_value_from(element)?;
            self.evaluator.exit_level();
            return Ok(Some(value));
        }

        if self.evaluator.matches_prefix() {
            match element.kind {
                TokenKind::LBrace => {
                    parser.begin_container(&element)?;
                    self.frames.push(Frame::object());
                    return Ok(None);
                }
                TokenKind::LBracket => {
                    parser.begin_container(&element)?;
                    self.frames.push(Frame::array());
                    return Ok(None);
                }
                _ => {}
            }
        }
        parser.skip_value_from(element)?;
        self.evaluator.exit_level();
        Ok(None)
    }

    /// Processes one object member (or the closing brace).
    fn object_step<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<Option<Value>> {
        let first = match self.frames.last_mut() {
            Some(Frame::Object { at_start }) => std::mem::replace(at_start, false),
            _ => return Ok(None),
        };
        let key_token = match next_element_token(parser, first, ContainerKind::Object)? {
            Some(token) => token,
            None => {
                self.close_frame(parser)?;
                return Ok(None);
            }
        };
        let key = parser.member_key(key_token)?;
        parser.expect_colon()?;
        self.evaluator.enter_level(PathKey::name(key), None);

        if self.evaluator.matches() {
            let value = parser.parse_value()?;
            self.evaluator.exit_level();
            return Ok(Some(value));
        }

        if self.evaluator.matches_prefix() {
            let opens = matches!(
                parser.peek_token()?.kind,
                TokenKind::LBrace | TokenKind::LBracket
            );
            if opens {
                let open = parser.next_token()?;
                parser.begin_container(&open)?;
                match open.kind {
                    TokenKind::LBrace => self.frames.push(Frame::object()),
                    _ => self.frames.push(Frame::array()),
                }
                return Ok(None);
            }
        }
        parser.skip_value()?;
        self.evaluator.exit_level();
        Ok(None)
    }

    /// Pops the current frame. For non-root frames the evaluator level
    /// that led into the container is popped with it; closing the root
    /// requires end of input.
    fn close_frame<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<()> {
        parser.end_container();
        self.frames.pop();
        if self.frames.is_empty() {
            parser.expect_eof()?;
            self.state = EngineState::Done;
        } else {
            self.evaluator.exit_level();
        }
        Ok(())
    }

    /// Structurally drains the rest of the current array after early
    /// termination, then closes its frame.
    fn drain_array<S: ByteSource>(&mut self, parser: &mut Parser<S>) -> Result<()> {
        loop {
            let token = parser.next_token()?;
            match token.kind {
                TokenKind::Comma => parser.skip_value()?,
                TokenKind::RBracket => {
                    self.close_frame(parser)?;
                    return Ok(());
                }
                TokenKind::Eof => {
                    return Err(Error::parse(
                        "unexpected end of file",
                        token.line,
                        token.column,
                    ))
                }
                other => {
                    return Err(Error::parse(
                        format!("expected ',' or ']', found {}", other.describe()),
                        token.line,
                        token.column,
                    ))
                }
            }
        }
    }
}

/// Walks a run of property/index segments into a materialized value,
/// extracting the addressed inner value. Misses resolve to null.
fn walk_remaining(segments: &[PathSegment], value: Value) -> Value {
    let mut current = value;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Property { name, .. }, Value::Object(mut map)) => {
                match map.swap_remove(name) {
                    Some(inner) => inner,
                    None => return Value::Null,
                }
            }
            (PathSegment::ArrayIndex { index }, Value::Array(mut items)) => {
                if *index >= 0 && (*index as usize) < items.len() {
                    items.swap_remove(*index as usize)
                } else {
                    return Value::Null;
                }
            }
            _ => return Value::Null,
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Map, Number};

    #[test]
    fn test_walk_remaining_extracts_nested() {
        let mut inner = Map::default();
        inner.insert("name".to_string(), Value::String("x".to_string()));
        let mut outer = Map::default();
        outer.insert("meta".to_string(), Value::Object(inner));
        let value = Value::Object(outer);

        let segments = vec![
            PathSegment::Property {
                name: "meta".to_string(),
                recursive: false,
            },
            PathSegment::Property {
                name: "name".to_string(),
                recursive: false,
            },
        ];
        assert_eq!(
            walk_remaining(&segments, value),
            Value::String("x".to_string())
        );
    }

    #[test]
    fn test_walk_remaining_missing_is_null() {
        let value = Value::Object(Map::default());
        let segments = vec![PathSegment::Property {
            name: "absent".to_string(),
            recursive: false,
        }];
        assert_eq!(walk_remaining(&segments, value), Value::Null);
    }

    #[test]
    fn test_walk_remaining_index_bounds() {
        let value = Value::Array(vec![
            Value::Number(Number::Integer(1)),
            Value::Number(Number::Integer(2)),
        ]);
        let hit = vec![PathSegment::ArrayIndex { index: 1 }];
        assert_eq!(
            walk_remaining(&hit, value.clone()),
            Value::Number(Number::Integer(2))
        );
        let miss = vec![PathSegment::ArrayIndex { index: 5 }];
        assert_eq!(walk_remaining(&miss, value), Value::Null);
    }

    #[test]
    fn test_walk_remaining_empty_is_identity() {
        let value = Value::Bool(true);
        assert_eq!(walk_remaining(&[], value.clone()), value);
    }
}
