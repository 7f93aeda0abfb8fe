// this_file: src/path/filter.rs

//! Filter predicate compilation and evaluation.
//!
//! A filter segment carries a predicate of the form
//! `@.dotted.property OP literal`, or a bare `@.dotted.property` existence
//! check. Predicates compile once at path-parse time into a compact
//! `(property path, operator, literal)` triple and evaluate per element
//! without re-parsing.

use crate::ast::{Number, Value};

/// Comparison operators accepted in filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `==` (loose: integer and float compare numerically)
    Eq,
    /// `!=`
    NotEq,
    /// `===` (strict: the JSON type must match as well)
    StrictEq,
    /// `!==`
    StrictNotEq,
}

/// Literal operand of a filter comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// Quoted string, or a bareword treated as a string.
    String(String),
}

impl FilterValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FilterValue::Integer(i) => Some(*i as f64),
            FilterValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// A compiled filter predicate.
///
/// With an operator, the referenced property is compared against the
/// literal. Without one, the predicate is an existence check: true when
/// the property resolves to a non-null value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    path: Vec<String>,
    op: Option<ComparisonOp>,
    literal: Option<FilterValue>,
}

impl FilterPredicate {
    /// Compiles a predicate from the text between `?(` and `)`.
    /// Errors are returned as plain messages; the path parser attaches
    /// position and expression context.
    pub fn compile(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let rest = text
            .strip_prefix('@')
            .ok_or_else(|| "filter must start with '@'".to_string())?;
        let (path, rest) = parse_property_path(rest)?;
        if path.is_empty() {
            return Err("filter is missing a property path after '@'".to_string());
        }
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(FilterPredicate {
                path,
                op: None,
                literal: None,
            });
        }
        let (op, rest) = parse_operator(rest)?;
        let literal = parse_literal(rest.trim())?;
        Ok(FilterPredicate {
            path,
            op: Some(op),
            literal: Some(literal),
        })
    }

    /// The dotted property path the predicate inspects.
    pub fn property_path(&self) -> &[String] {
        &self.path
    }

    /// Evaluates the predicate against an element value.
    pub fn evaluate(&self, value: &Value) -> bool {
        let resolved = self.resolve(value);
        match (&self.op, &self.literal) {
            (None, _) => resolved.map_or(false, |v| !v.is_null()),
            (Some(op), Some(literal)) => match resolved {
                Some(v) => compare(v, *op, literal),
                // A missing property satisfies no comparison.
                None => false,
            },
            (Some(_), None) => false,
        }
    }

    /// Walks the dotted property path inside `value`.
    fn resolve<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        let mut current = value;
        for name in &self.path {
            current = current.get(name)?;
        }
        Some(current)
    }
}

/// Parses `.prop(.prop)*` and returns the components plus the remaining
/// text.
fn parse_property_path(text: &str) -> Result<(Vec<String>, &str), String> {
    let mut path = Vec::new();
    let mut rest = text;
    while let Some(after_dot) = rest.strip_prefix('.') {
        let end = after_dot
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after_dot.len());
        if end == 0 {
            return Err("filter has an empty property name".to_string());
        }
        path.push(after_dot[..end].to_string());
        rest = &after_dot[end..];
    }
    Ok((path, rest))
}

/// Parses a comparison operator, longest form first.
fn parse_operator(text: &str) -> Result<(ComparisonOp, &str), String> {
    const OPS: [(&str, ComparisonOp); 8] = [
        ("===", ComparisonOp::StrictEq),
        ("!==", ComparisonOp::StrictNotEq),
        ("==", ComparisonOp::Eq),
        ("!=", ComparisonOp::NotEq),
        ("<=", ComparisonOp::LessEq),
        (">=", ComparisonOp::GreaterEq),
        ("<", ComparisonOp::Less),
        (">", ComparisonOp::Greater),
    ];
    for (symbol, op) in OPS {
        if let Some(rest) = text.strip_prefix(symbol) {
            return Ok((op, rest));
        }
    }
    Err(format!("unsupported filter operator in '{text}'"))
}

/// Parses a JSON-like literal: null, booleans, numbers, quoted strings,
/// or a bareword treated as a string.
fn parse_literal(text: &str) -> Result<FilterValue, String> {
    if text.is_empty() {
        return Err("filter is missing a literal after the operator".to_string());
    }
    match text {
        "null" => return Ok(FilterValue::Null),
        "true" => return Ok(FilterValue::Bool(true)),
        "false" => return Ok(FilterValue::Bool(false)),
        _ => {}
    }
    if let Some(quoted) = strip_quotes(text, '\'').or_else(|| strip_quotes(text, '"')) {
        return Ok(FilterValue::String(quoted.to_string()));
    }
    if text.starts_with('\'') || text.starts_with('"') {
        return Err(format!("unterminated string literal '{text}'"));
    }
    if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(FilterValue::Integer(i));
        }
        if let Ok(f) = text.parse::<f64>() {
            return Ok(FilterValue::Float(f));
        }
        return Err(format!("invalid numeric literal '{text}'"));
    }
    // Barewords compare as strings.
    Ok(FilterValue::String(text.to_string()))
}

fn strip_quotes(text: &str, quote: char) -> Option<&str> {
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(inner)
}

/// Applies a comparison between a resolved value and the literal.
fn compare(value: &Value, op: ComparisonOp, literal: &FilterValue) -> bool {
    match op {
        ComparisonOp::Eq => loose_eq(value, literal),
        ComparisonOp::NotEq => !loose_eq(value, literal),
        ComparisonOp::StrictEq => strict_eq(value, literal),
        ComparisonOp::StrictNotEq => !strict_eq(value, literal),
        ComparisonOp::Less => ordering(value, literal, |o| o == std::cmp::Ordering::Less),
        ComparisonOp::LessEq => ordering(value, literal, |o| o != std::cmp::Ordering::Greater),
        ComparisonOp::Greater => ordering(value, literal, |o| o == std::cmp::Ordering::Greater),
        ComparisonOp::GreaterEq => ordering(value, literal, |o| o != std::cmp::Ordering::Less),
    }
}

/// Loose equality: numbers compare numerically across integer/float,
/// everything else by type and value.
fn loose_eq(value: &Value, literal: &FilterValue) -> bool {
    match (value, literal) {
        (Value::Null, FilterValue::Null) => true,
        (Value::Bool(a), FilterValue::Bool(b)) => a == b,
        (Value::Number(n), lit) => lit.as_f64().map_or(false, |f| n.as_f64() == f),
        (Value::String(s), FilterValue::String(l)) => s == l,
        _ => false,
    }
}

/// Strict equality: the JSON type must match, and numbers must agree in
/// integer/float representation.
fn strict_eq(value: &Value, literal: &FilterValue) -> bool {
    match (value, literal) {
        (Value::Null, FilterValue::Null) => true,
        (Value::Bool(a), FilterValue::Bool(b)) => a == b,
        (Value::Number(Number::Integer(a)), FilterValue::Integer(b)) => a == b,
        (Value::Number(Number::Float(a)), FilterValue::Float(b)) => a == b,
        (Value::String(s), FilterValue::String(l)) => s == l,
        _ => false,
    }
}

/// Ordering comparisons: number/number as f64, string/string
/// lexicographic, anything else false.
fn ordering(
    value: &Value,
    literal: &FilterValue,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    match (value, literal) {
        (Value::Number(n), lit) => match lit.as_f64() {
            Some(f) => n.as_f64().partial_cmp(&f).map_or(false, accept),
            None => false,
        },
        (Value::String(s), FilterValue::String(l)) => accept(s.as_str().cmp(l.as_str())),
        _ => false,
    }
}
