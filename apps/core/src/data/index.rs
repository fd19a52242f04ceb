//! Dataset snapshot with derived column metadata.

use super::record::{CellValue, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::info;

/// Column holding the quality label in the raw export.
pub const LABEL_COLUMN: &str = "Quality";
/// Column holding the `{good: 1, bad: 0}` encoded label in the processed export.
pub const ENCODED_LABEL_COLUMN: &str = "Quality_encoded";
/// Identifier columns used to name rows, in preference order.
const ID_COLUMNS: &[&str] = &["A_id", "id"];

/// Quality label family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFamily {
    Good,
    Bad,
}

impl LabelFamily {
    /// Surface words that name this family, in questions and in label cells alike.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            LabelFamily::Good => &["good", "boa", "boas", "bom", "bons"],
            LabelFamily::Bad => &["bad", "ruim", "ruins"],
        }
    }

    /// Value of the encoded label column for this family.
    pub fn encoded(&self) -> f64 {
        match self {
            LabelFamily::Good => 1.0,
            LabelFamily::Bad => 0.0,
        }
    }

    /// Plural Portuguese name used in answers.
    pub fn plural(&self) -> &'static str {
        match self {
            LabelFamily::Good => "boas",
            LabelFamily::Bad => "ruins",
        }
    }

    /// Label as stored in the dataset.
    pub fn canonical(&self) -> &'static str {
        match self {
            LabelFamily::Good => "good",
            LabelFamily::Bad => "bad",
        }
    }

    /// Whether a label cell belongs to this family.
    pub fn matches(&self, cell: &CellValue) -> bool {
        match cell {
            CellValue::Text(text) => {
                let lower = text.to_lowercase();
                self.keywords().iter().any(|k| lower.contains(k))
            }
            CellValue::Number(n) => (*n - self.encoded()).abs() < f64::EPSILON,
            CellValue::Missing => false,
        }
    }
}

impl fmt::Display for LabelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// An immutable dataset snapshot. Replaced wholesale on reload, never mutated.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    records: Vec<Record>,
    columns: Vec<String>,
    numeric_columns: Vec<String>,
    label_column: Option<String>,
}

impl DatasetIndex {
    /// Indexes `records`, classifying a column as numeric when at least `numeric_ratio`
    /// of its values among the first `sample_size` rows are numbers.
    pub fn new(records: Vec<Record>, sample_size: usize, numeric_ratio: f64) -> Self {
        let columns: Vec<String> = records
            .first()
            .map(|r| r.columns().map(str::to_string).collect())
            .unwrap_or_default();

        let sample = &records[..records.len().min(sample_size)];
        let numeric_columns: Vec<String> = columns
            .iter()
            .filter(|column| {
                if sample.is_empty() {
                    return false;
                }
                let numeric = sample
                    .iter()
                    .filter(|r| r.get(column).is_some_and(CellValue::is_number))
                    .count();
                numeric as f64 / sample.len() as f64 >= numeric_ratio
            })
            .cloned()
            .collect();

        let label_column = [LABEL_COLUMN, ENCODED_LABEL_COLUMN]
            .iter()
            .find(|c| columns.iter().any(|col| col == *c))
            .map(|c| c.to_string());

        info!(
            rows = records.len(),
            columns = columns.len(),
            numeric = numeric_columns.len(),
            "Dataset indexed"
        );

        Self {
            records,
            columns,
            numeric_columns,
            label_column,
        }
    }

    /// Indexes rows as parsed from the JSON export.
    pub fn from_json_rows(
        rows: &[Map<String, Value>],
        sample_size: usize,
        numeric_ratio: f64,
    ) -> Self {
        let records = rows.iter().map(Record::from_json_map).collect();
        Self::new(records, sample_size, numeric_ratio)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    pub fn label_column(&self) -> Option<&str> {
        self.label_column.as_deref()
    }

    /// Rows whose label belongs to `family`, in dataset order.
    pub fn rows_with_label(&self, family: LabelFamily) -> Vec<&Record> {
        let Some(column) = self.label_column() else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| r.get(column).is_some_and(|cell| family.matches(cell)))
            .collect()
    }

    pub fn count_label(&self, family: LabelFamily) -> usize {
        self.rows_with_label(family).len()
    }

    /// Short human name for the row at `position`: its id when the dataset has one,
    /// otherwise its 1-based row number, followed by the label when present.
    pub fn row_label(&self, position: usize) -> String {
        let Some(record) = self.records.get(position) else {
            return format!("linha {}", position + 1);
        };

        let name = ID_COLUMNS
            .iter()
            .find_map(|c| match record.get(c) {
                Some(CellValue::Missing) | None => None,
                Some(value) => Some(format!("{} {}", c, value)),
            })
            .unwrap_or_else(|| format!("linha {}", position + 1));

        let label = self.label_column().and_then(|c| record.get(c)).and_then(|cell| {
            match cell {
                CellValue::Text(t) if !t.is_empty() => Some(t.clone()),
                CellValue::Number(_) => [LabelFamily::Good, LabelFamily::Bad]
                    .into_iter()
                    .find(|f| f.matches(cell))
                    .map(|f| f.canonical().to_string()),
                _ => None,
            }
        });

        match label {
            Some(label) => format!("{} ({})", name, label),
            None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> DatasetIndex {
        DatasetIndex::new(
            vec![
                Record::from_pairs([
                    ("Quality", CellValue::from("good")),
                    ("Size", CellValue::from(1.0)),
                ]),
                Record::from_pairs([
                    ("Quality", CellValue::from("bad")),
                    ("Size", CellValue::from(2.0)),
                ]),
            ],
            30,
            0.6,
        )
    }

    #[test]
    fn test_columns_from_first_record() {
        let index = sample_index();
        assert_eq!(index.columns(), &["Quality".to_string(), "Size".to_string()]);
        assert_eq!(index.numeric_columns(), &["Size".to_string()]);
        assert_eq!(index.label_column(), Some("Quality"));
    }

    #[test]
    fn test_numeric_ratio_threshold() {
        let rows: Vec<Record> = ["1", "2", "x", "4", "y"]
            .iter()
            .map(|v| Record::from_pairs([("Mixed", *v)]))
            .collect();
        // 3 of 5 numeric = 0.6
        assert!(DatasetIndex::new(rows.clone(), 30, 0.6).is_numeric("Mixed"));
        assert!(!DatasetIndex::new(rows, 30, 0.7).is_numeric("Mixed"));
    }

    #[test]
    fn test_sample_limits_detection() {
        let mut rows: Vec<Record> = (0..3)
            .map(|_| Record::from_pairs([("Late", "texto")]))
            .collect();
        rows.extend((0..10).map(|i| Record::from_pairs([("Late", CellValue::from(i as f64))])));
        let index = DatasetIndex::new(rows, 3, 0.6);
        assert!(!index.is_numeric("Late"));
        assert!(index.has_column("Late"));
    }

    #[test]
    fn test_encoded_label_column() {
        let index = DatasetIndex::new(
            vec![
                Record::from_pairs([("Size", 0.1), ("Quality_encoded", 1.0)]),
                Record::from_pairs([("Size", 0.2), ("Quality_encoded", 0.0)]),
                Record::from_pairs([("Size", 0.3), ("Quality_encoded", 1.0)]),
            ],
            30,
            0.6,
        );
        assert_eq!(index.label_column(), Some(ENCODED_LABEL_COLUMN));
        assert_eq!(index.count_label(LabelFamily::Good), 2);
        assert_eq!(index.count_label(LabelFamily::Bad), 1);
        assert_eq!(index.row_label(1), "linha 2 (bad)");
    }

    #[test]
    fn test_label_matching_is_case_insensitive() {
        assert!(LabelFamily::Good.matches(&CellValue::Text("GOOD".into())));
        assert!(LabelFamily::Bad.matches(&CellValue::Text("Ruim".into())));
        assert!(!LabelFamily::Bad.matches(&CellValue::Text("good".into())));
    }

    #[test]
    fn test_row_label_prefers_id() {
        let index = DatasetIndex::new(
            vec![Record::from_pairs([
                ("A_id", CellValue::from(42.0)),
                ("Quality", CellValue::from("good")),
            ])],
            30,
            0.6,
        );
        assert_eq!(index.row_label(0), "A_id 42 (good)");
    }

    #[test]
    fn test_empty_dataset() {
        let index = DatasetIndex::new(Vec::new(), 30, 0.6);
        assert!(index.is_empty());
        assert!(index.columns().is_empty());
        assert!(index.numeric_columns().is_empty());
    }
}
