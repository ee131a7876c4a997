//! Untyped values and rows returned by graph queries

use std::fmt;

// ============================================================================
// Values
// ============================================================================

/// A single cell of a graph query result, or a query parameter.
///
/// The graph backend is dynamically typed: a property may hold any scalar,
/// or be absent (`Null`). Anything that is not a plain scalar is carried as
/// [`GraphValue::Other`] with the name of its kind, so that decoding can
/// report what it found instead of what it expected.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Other(&'static str),
}

/// Kind of a [`GraphValue`], used by row schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Other,
}

impl GraphValue {
    /// Kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            GraphValue::Null => ValueKind::Null,
            GraphValue::Boolean(_) => ValueKind::Boolean,
            GraphValue::Integer(_) => ValueKind::Integer,
            GraphValue::Float(_) => ValueKind::Float,
            GraphValue::String(_) => ValueKind::String,
            GraphValue::Other(_) => ValueKind::Other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GraphValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GraphValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GraphValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<String> for GraphValue {
    fn from(value: String) -> Self {
        GraphValue::String(value)
    }
}

impl From<&str> for GraphValue {
    fn from(value: &str) -> Self {
        GraphValue::String(value.to_string())
    }
}

impl From<i64> for GraphValue {
    fn from(value: i64) -> Self {
        GraphValue::Integer(value)
    }
}

impl From<bool> for GraphValue {
    fn from(value: bool) -> Self {
        GraphValue::Boolean(value)
    }
}

impl From<f64> for GraphValue {
    fn from(value: f64) -> Self {
        GraphValue::Float(value)
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One result row: named columns in projection order.
///
/// A column may be missing entirely (the backend did not return it) or be
/// present with a `Null` value (the property does not exist on the node).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphRow {
    columns: Vec<(String, GraphValue)>,
}

impl GraphRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append
    pub fn with(mut self, name: impl Into<String>, value: impl Into<GraphValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a column, replacing any previous column with the same name
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<GraphValue>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Value of a column, if the row has it
    pub fn get(&self, name: &str) -> Option<&GraphValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Column names in projection order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, GraphValue)> for GraphRow {
    fn from_iter<I: IntoIterator<Item = (N, GraphValue)>>(iter: I) -> Self {
        let mut row = GraphRow::new();
        for (name, value) in iter {
            row.push(name, value);
        }
        row
    }
}
