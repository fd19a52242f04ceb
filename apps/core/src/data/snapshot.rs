//! The read-only state a question is answered from.

use super::index::DatasetIndex;
use super::metrics::ModelMetrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Dataset and metrics as published at one instant. Cloning shares the data.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub dataset: Option<Arc<DatasetIndex>>,
    pub metrics: Option<Arc<ModelMetrics>>,
}

impl Snapshot {
    pub fn new(dataset: Option<DatasetIndex>, metrics: Option<ModelMetrics>) -> Self {
        Self {
            dataset: dataset.map(Arc::new),
            metrics: metrics.map(Arc::new),
        }
    }

    pub fn status(&self) -> SnapshotStatus {
        SnapshotStatus {
            dataset_loaded: self.dataset.is_some(),
            rows: self.dataset.as_ref().map_or(0, |d| d.len()),
            columns: self.dataset.as_ref().map_or(0, |d| d.columns().len()),
            numeric_columns: self
                .dataset
                .as_ref()
                .map(|d| d.numeric_columns().to_vec())
                .unwrap_or_default(),
            metrics_loaded: self.metrics.is_some(),
            models: self.metrics.as_ref().map_or(0, |m| m.models.len()),
        }
    }
}

/// What is currently loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub dataset_loaded: bool,
    pub rows: usize,
    pub columns: usize,
    pub numeric_columns: Vec<String>,
    pub metrics_loaded: bool,
    pub models: usize,
}

impl SnapshotStatus {
    /// One-line description for the console.
    pub fn describe(&self) -> String {
        let dataset = if self.dataset_loaded {
            format!(
                "dataset: {} linhas, {} colunas ({} numéricas)",
                self.rows,
                self.columns,
                self.numeric_columns.len()
            )
        } else {
            "dataset: não carregado".to_string()
        };
        let metrics = if self.metrics_loaded {
            format!("métricas: {} modelos", self.models)
        } else {
            "métricas: não carregadas".to_string()
        };
        format!("{} | {}", dataset, metrics)
    }
}
