// this_file: src/ast/builder.rs

//! Fluent builders for constructing JSON values.
//!
//! Mostly a convenience for tests and callers assembling expected values
//! by hand; the parser builds its containers directly.

use crate::ast::{Map, Number, Value};

/// Fluent builder for objects. Keys keep insertion order; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    map: Map,
}

impl ObjectBuilder {
    /// Creates an empty object builder.
    pub fn new() -> Self {
        ObjectBuilder { map: Map::default() }
    }

    /// Adds a key-value pair.
    pub fn insert<S: Into<String>>(mut self, key: S, value: Value) -> Self {
        self.map.insert(key.into(), value);
        self
    }

    /// Adds a string value.
    pub fn string<S: Into<String>, V: Into<String>>(self, key: S, value: V) -> Self {
        self.insert(key, Value::String(value.into()))
    }

    /// Adds an integer value.
    pub fn integer<S: Into<String>>(self, key: S, value: i64) -> Self {
        self.insert(key, Value::Number(Number::Integer(value)))
    }

    /// Adds a float value.
    pub fn float<S: Into<String>>(self, key: S, value: f64) -> Self {
        self.insert(key, Value::Number(Number::Float(value)))
    }

    /// Adds a boolean value.
    pub fn bool<S: Into<String>>(self, key: S, value: bool) -> Self {
        self.insert(key, Value::Bool(value))
    }

    /// Adds a null value.
    pub fn null<S: Into<String>>(self, key: S) -> Self {
        self.insert(key, Value::Null)
    }

    /// Builds the object.
    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}

/// Fluent builder for arrays.
#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    vec: Vec<Value>,
}

impl ArrayBuilder {
    /// Creates an empty array builder.
    pub fn new() -> Self {
        ArrayBuilder { vec: Vec::new() }
    }

    /// Appends a value.
    pub fn push(mut self, value: Value) -> Self {
        self.vec.push(value);
        self
    }

    /// Appends a string.
    pub fn string<V: Into<String>>(self, value: V) -> Self {
        self.push(Value::String(value.into()))
    }

    /// Appends an integer.
    pub fn integer(self, value: i64) -> Self {
        self.push(Value::Number(Number::Integer(value)))
    }

    /// Appends a float.
    pub fn float(self, value: f64) -> Self {
        self.push(Value::Number(Number::Float(value)))
    }

    /// Appends a boolean.
    pub fn bool(self, value: bool) -> Self {
        self.push(Value::Bool(value))
    }

    /// Appends a null.
    pub fn null(self) -> Self {
        self.push(Value::Null)
    }

    /// Builds the array.
    pub fn build(self) -> Value {
        Value::Array(self.vec)
    }
}
