//! Statistics over dataset columns.
//!
//! Aggregates skip non-numeric cells instead of treating them as zero, and return
//! `None` when nothing numeric is left. Rounding only happens in [`format_number`].

use super::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Numeric values of `column`, skipping rows where it is absent or not a number.
pub fn numeric_values<'a, I>(records: I, column: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|r| r.number(column))
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Count, mean and spread of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

pub fn summarize(values: &[f64]) -> Option<ColumnSummary> {
    Some(ColumnSummary {
        count: values.len(),
        mean: mean(values)?,
        std_dev: std_dev(values)?,
    })
}

/// Rounds half away from zero at `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Display form of a number at `places` decimals.
pub fn format_number(value: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_to(value, places))
}

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
}

impl ComparisonOp {
    /// Parses an operator symbol. Two-character operators are distinct symbols here;
    /// the extractor is responsible for matching them before their prefixes.
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            ">=" => Some(ComparisonOp::Ge),
            "<=" => Some(ComparisonOp::Le),
            ">" => Some(ComparisonOp::Gt),
            "<" => Some(ComparisonOp::Lt),
            "=" => Some(ComparisonOp::Eq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Eq => "=",
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Eq => (lhs - rhs).abs() < 1e-9,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A comparison against a resolved column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub op: ComparisonOp,
    pub threshold: f64,
}

impl ColumnFilter {
    /// Rows without a numeric value in the column never match.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .number(&self.column)
            .is_some_and(|v| self.op.apply(v, self.threshold))
    }
}

/// Positions of the rows satisfying every filter (logical AND).
pub fn filter_rows(records: &[Record], filters: &[ColumnFilter]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.iter().all(|f| f.matches(r)))
        .map(|(i, _)| i)
        .collect()
}

/// Row positions sorted by `column`, largest first. Non-numeric cells sort as 0 and
/// ties keep dataset order.
pub fn rank_descending(records: &[Record], column: &str) -> Vec<usize> {
    let mut order: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i, r.number(column).unwrap_or(0.0)))
        .collect();
    order.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    order.into_iter().map(|(i, _)| i).collect()
}
