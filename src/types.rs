//! Core value types shared across the frame, engine and export layers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single record: column name to scalar value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, used mostly by tests and the CLI loader.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Column names in row order.
    pub fn columns(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// New row holding only `columns`, keeping this row's key order.
    pub fn project(&self, columns: &[String]) -> Row {
        Row(self
            .0
            .iter()
            .filter(|(key, _)| columns.iter().any(|c| c == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scalar equality used by filters. Numbers compare by value so `1 == 1.0`.
///
/// Two integers compare exactly; floats are only involved when one side is
/// already a float.
pub fn scalar_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => number_eq(a, b),
        _ => left == right,
    }
}

fn number_eq(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        // At least one side is above i64::MAX.
        _ => a.as_u64().is_some() && a.as_u64() == b.as_u64(),
    }
}
