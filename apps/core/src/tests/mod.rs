//! Test Module
//!
//! Cross-component test suite for the AppleChat core.
//!
//! ## Test Categories
//! - `brain_tests`: Intent classification, matcher, synthesizer and analyzer routing
//! - `data_tests`: Records, dataset index, column resolution and statistics
//! - `config_tests`: Environment-driven configuration
//! - `supervisor_tests`: Supervisor actor, snapshots and reloads
//! - `integration_tests`: Question-to-answer scenarios and properties

pub mod data_tests;
pub mod supervisor_tests;

use crate::data::{CellValue, DatasetIndex, Record};

/// Two-row dataset used across suites.
pub(crate) fn two_apples() -> DatasetIndex {
    DatasetIndex::new(
        vec![
            Record::from_pairs([("Quality", "good"), ("Size", "1.0")]),
            Record::from_pairs([("Quality", "bad"), ("Size", "2.0")]),
        ],
        30,
        0.6,
    )
}

/// Small apple dataset with every feature column of the real export.
pub(crate) fn orchard() -> DatasetIndex {
    let rows = [
        (0, -3.97, -2.51, 5.34, -1.01, 1.84, 0.32, -0.49, "good"),
        (1, -1.19, -2.83, 3.03, -1.43, 0.88, 2.19, -2.99, "good"),
        (2, -0.29, -1.35, -1.74, -0.34, 2.84, -1.57, -1.60, "bad"),
        (3, -0.65, -1.68, 1.57, 0.31, 1.64, -0.94, -0.76, "good"),
        (4, 1.36, -1.03, -1.31, 0.55, 2.85, -0.81, 0.32, "bad"),
        (5, -3.43, -1.90, 0.47, 1.08, 2.23, 3.21, 1.15, "good"),
        (6, 1.33, 0.92, -1.74, 1.23, -0.37, 0.89, -1.03, "bad"),
        (7, -2.37, -1.00, 1.40, 0.74, 1.29, 1.53, 1.08, "good"),
    ];
    let records = rows
        .iter()
        .map(|(id, size, weight, sweet, crunch, juicy, ripe, acid, quality)| {
            Record::from_pairs([
                ("A_id", CellValue::from(*id as f64)),
                ("Size", CellValue::from(*size)),
                ("Weight", CellValue::from(*weight)),
                ("Sweetness", CellValue::from(*sweet)),
                ("Crunchiness", CellValue::from(*crunch)),
                ("Juiciness", CellValue::from(*juicy)),
                ("Ripeness", CellValue::from(*ripe)),
                ("Acidity", CellValue::from(*acid)),
                ("Quality", CellValue::from(*quality)),
            ])
        })
        .collect();
    DatasetIndex::new(records, 30, 0.6)
}
