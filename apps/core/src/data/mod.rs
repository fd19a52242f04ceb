//! # Data Module
//!
//! In-memory view of the artifacts produced by the preprocessing and training scripts.
//!
//! ## Components
//! - `record`: rows and coerced cell values
//! - `index`: dataset snapshot with column metadata and label handling
//! - `columns`: alias table and column resolution
//! - `stats`: aggregation, filtering, ranking and number formatting
//! - `metrics`: model metrics summary
//! - `snapshot`: dataset and metrics published together

pub mod columns;
pub mod index;
pub mod metrics;
pub mod record;
pub mod snapshot;
pub mod stats;

pub use columns::{ColumnResolution, ColumnResolver, NumericLookup};
pub use index::{DatasetIndex, LabelFamily};
pub use metrics::{BestModel, ModelMetrics, ModelScores};
pub use record::{CellValue, Record};
pub use snapshot::{Snapshot, SnapshotStatus};
pub use stats::{ColumnFilter, ColumnSummary, ComparisonOp};
