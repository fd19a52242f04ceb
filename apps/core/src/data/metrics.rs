//! Model metrics summary written by the training script (`model_metrics.json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best model as selected by mean cross-validation accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestModel {
    /// `null` when training produced no model.
    pub name: Option<String>,
    pub accuracy_mean: f64,
}

/// Cross-validation scores of one classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub accuracy_mean: f64,
    pub f1_mean: f64,
    #[serde(default)]
    pub accuracy_std: Option<f64>,
    #[serde(default)]
    pub f1_std: Option<f64>,
}

/// Read-only snapshot of the training results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub best_model: BestModel,
    /// Keyed by model name; iterated in name order.
    #[serde(default)]
    pub models: BTreeMap<String, ModelScores>,
}

impl ModelMetrics {
    /// Models sorted by mean accuracy, best first. Ties keep name order.
    pub fn ranked(&self) -> Vec<(&str, &ModelScores)> {
        let mut ranked: Vec<(&str, &ModelScores)> =
            self.models.iter().map(|(k, v)| (k.as_str(), v)).collect();
        ranked.sort_by(|a, b| {
            b.1.accuracy_mean
                .partial_cmp(&a.1.accuracy_mean)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}
