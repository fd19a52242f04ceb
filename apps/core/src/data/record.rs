//! Dataset rows and their cell values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single cell, coerced once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Coerces text to a number when the whole (trimmed) string is a finite float.
    pub fn parse_text(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() && !raw.trim().is_empty() => CellValue::Number(n),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Converts a parsed JSON value into a cell.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Missing,
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(n.to_string())),
            Value::String(s) => CellValue::parse_text(s),
            Value::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => Ok(()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::parse_text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::parse_text(&value)
    }
}

/// One immutable dataset row. Column order follows the source object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    cells: Vec<(String, CellValue)>,
}

impl Record {
    /// Builds a record from `(column, value)` pairs, trimming column names.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<CellValue>,
    {
        let mut record = Record::default();
        for (key, value) in pairs {
            record.insert(key.as_ref().trim().to_string(), value.into());
        }
        record
    }

    /// Builds a record from a JSON object as exported by the preprocessing pipeline.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut record = Record::default();
        for (key, value) in map {
            record.insert(key.trim().to_string(), CellValue::from_json(value));
        }
        record
    }

    fn insert(&mut self, key: String, value: CellValue) {
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    /// Numeric value of `column`, if present and numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }

    /// Column names in source order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
