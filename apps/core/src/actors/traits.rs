use crate::actors::messages::AppError;
use crate::data::ModelMetrics;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Raw dataset rows, one JSON object per record.
pub type DatasetRows = Vec<Map<String, Value>>;

/// Defines where the preprocessing and training artifacts are read from.
///
/// This trait abstracts the storage of the artifacts, so the supervisor can reload from
/// files on disk in production and from in-memory fixtures in tests.
#[async_trait]
pub trait ArtifactSource: Send + Sync + 'static {
    /// Loads the processed dataset rows.
    async fn load_dataset(&self) -> Result<DatasetRows, AppError>;

    /// Loads the model metrics summary, `None` when training has not produced one.
    async fn load_metrics(&self) -> Result<Option<ModelMetrics>, AppError>;
}
