//! JSON file artifacts written by the preprocessing and training scripts.

use crate::actors::messages::AppError;
use crate::actors::traits::{ArtifactSource, DatasetRows};
use crate::config::ChatConfig;
use crate::data::ModelMetrics;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{info, warn};

/// Shapes the dataset file can take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetPayload {
    /// `orient="records"` export.
    Rows(DatasetRows),
    /// Pipeline stdout summary carrying a sample of the rows.
    Envelope {
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        rows_total: Option<usize>,
        data_sample: DatasetRows,
    },
}

impl DatasetPayload {
    fn into_rows(self) -> DatasetRows {
        match self {
            DatasetPayload::Rows(rows) => rows,
            DatasetPayload::Envelope {
                status,
                rows_total,
                data_sample,
            } => {
                info!(
                    status = status.as_deref().unwrap_or("unknown"),
                    rows_total = rows_total.unwrap_or(data_sample.len()),
                    sample = data_sample.len(),
                    "Dataset read from pipeline summary"
                );
                data_sample
            }
        }
    }
}

/// Reads artifacts from JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dataset_path: PathBuf,
    metrics_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(dataset_path: impl Into<PathBuf>, metrics_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            metrics_path: metrics_path.into(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(&config.dataset_path, &config.metrics_path)
    }
}

#[async_trait]
impl ArtifactSource for JsonFileSource {
    async fn load_dataset(&self) -> Result<DatasetRows, AppError> {
        let raw = tokio::fs::read_to_string(&self.dataset_path).await?;
        let payload: DatasetPayload = serde_json::from_str(&raw).map_err(|e| {
            AppError::Json(format!("{}: {}", self.dataset_path.display(), e))
        })?;
        let rows = payload.into_rows();
        info!("Loaded {} rows from {}", rows.len(), self.dataset_path.display());
        Ok(rows)
    }

    async fn load_metrics(&self) -> Result<Option<ModelMetrics>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.metrics_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No model metrics at {}", self.metrics_path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let metrics: ModelMetrics = serde_json::from_str(&raw).map_err(|e| {
            AppError::Json(format!("{}: {}", self.metrics_path.display(), e))
        })?;
        info!(
            "Loaded metrics for {} models from {}",
            metrics.models.len(),
            self.metrics_path.display()
        );
        Ok(Some(metrics))
    }
}
