//! Supervisor Tests
//!
//! Snapshot publication, reloads through `ArtifactSource`, and failure handling.

use super::two_apples;
use crate::actors::messages::AppError;
use crate::actors::supervisor::ChatSupervisorHandle;
use crate::actors::traits::{ArtifactSource, DatasetRows};
use crate::actors::JsonFileSource;
use crate::brain::{AnswerSource, BrainAnalyzer};
use crate::config::ChatConfig;
use crate::data::{BestModel, ModelMetrics};
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

// --- Mock Components ---

struct MockSource {
    rows: Result<DatasetRows, AppError>,
    metrics: Result<Option<ModelMetrics>, AppError>,
    dataset_loads: AtomicUsize,
}

impl MockSource {
    fn new(rows: Result<DatasetRows, AppError>, metrics: Result<Option<ModelMetrics>, AppError>) -> Self {
        Self {
            rows,
            metrics,
            dataset_loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ArtifactSource for MockSource {
    async fn load_dataset(&self) -> Result<DatasetRows, AppError> {
        self.dataset_loads.fetch_add(1, Ordering::SeqCst);
        self.rows.clone()
    }

    async fn load_metrics(&self) -> Result<Option<ModelMetrics>, AppError> {
        self.metrics.clone()
    }
}

fn rows(values: serde_json::Value) -> DatasetRows {
    values
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_object().cloned()).collect())
        .unwrap_or_default()
}

fn apple_rows() -> DatasetRows {
    rows(json!([
        {"A_id": 0, "Size": 1.0, "Weight": 0.5, "Quality": "good"},
        {"A_id": 1, "Size": 2.0, "Weight": 0.1, "Quality": "bad"},
        {"A_id": 2, "Size": 3.0, "Weight": 0.9, "Quality": "good"}
    ]))
}

fn best_only(name: &str) -> ModelMetrics {
    ModelMetrics {
        best_model: BestModel {
            name: Some(name.to_string()),
            accuracy_mean: 0.875,
        },
        models: BTreeMap::new(),
    }
}

fn config() -> ChatConfig {
    let mut config = ChatConfig::with_resources_dir(PathBuf::from("resources"));
    config.matcher_enabled = false;
    config
}

// --- Tests ---

#[tokio::test]
async fn test_reload_publishes_dataset_and_metrics() {
    let handle = ChatSupervisorHandle::spawn(config());
    let source = MockSource::new(Ok(apple_rows()), Ok(Some(best_only("svm"))));

    let report = handle.reload_from(&source).await.unwrap();
    assert!(report.metrics_error.is_none());
    assert_eq!(report.status.rows, 3);
    assert!(report.status.metrics_loaded);

    let reply = handle.ask("quantas boas?".to_string()).await.unwrap();
    assert_eq!(reply.answer, "Total: 3\nBoas: 2\nRuins: 1");

    let reply = handle.ask("melhor modelo".to_string()).await.unwrap();
    assert_eq!(reply.source, AnswerSource::ModelMetrics);
    assert_eq!(reply.answer, "Melhor modelo: svm\nAcurácia média: 0.875");
}

#[tokio::test]
async fn test_failed_dataset_load_keeps_previous_snapshot() {
    let handle = ChatSupervisorHandle::spawn(config());
    handle.publish_dataset(two_apples()).await.unwrap();

    let source = MockSource::new(
        Err(AppError::Json("broken export".to_string())),
        Ok(None),
    );
    let result = handle.reload_from(&source).await;
    assert!(matches!(result, Err(AppError::Json(_))));
    assert_eq!(source.dataset_loads.load(Ordering::SeqCst), 1);

    let status = handle.status().await.unwrap();
    assert_eq!(status.rows, 2);
}

#[tokio::test]
async fn test_metrics_failure_still_publishes_dataset() {
    let handle = ChatSupervisorHandle::spawn(config());
    handle.publish_metrics(Some(best_only("knn"))).await.unwrap();

    let source = MockSource::new(
        Ok(apple_rows()),
        Err(AppError::Json("bad metrics".to_string())),
    );
    let report = handle.reload_from(&source).await.unwrap();
    assert!(report.metrics_error.unwrap().contains("bad metrics"));
    assert_eq!(report.status.rows, 3);
    assert!(!report.status.metrics_loaded);
}

#[tokio::test]
async fn test_publish_metrics_keeps_dataset() {
    let handle = ChatSupervisorHandle::spawn(config());
    handle.publish_dataset(two_apples()).await.unwrap();

    let status = handle.publish_metrics(Some(best_only("lda"))).await.unwrap();
    assert!(status.dataset_loaded);
    assert!(status.metrics_loaded);

    let status = handle.publish_metrics(None).await.unwrap();
    assert!(!status.metrics_loaded);
    assert_eq!(status.rows, 2);
}

#[tokio::test]
async fn test_dataset_swap_changes_answers() {
    let handle = ChatSupervisorHandle::spawn(config());

    handle.publish_dataset(two_apples()).await.unwrap();
    let before = handle.ask("quantas boas".to_string()).await.unwrap();

    let source = MockSource::new(Ok(apple_rows()), Ok(None));
    handle.reload_from(&source).await.unwrap();
    let after = handle.ask("quantas boas".to_string()).await.unwrap();

    assert_eq!(before.answer, "Total: 2\nBoas: 1\nRuins: 1");
    assert_eq!(after.answer, "Total: 3\nBoas: 2\nRuins: 1");
}

#[tokio::test]
async fn test_concurrent_questions() {
    let handle = ChatSupervisorHandle::spawn(config());
    handle.publish_dataset(two_apples()).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle.ask("média de size".to_string()).await
        }));
    }

    for task in tasks {
        let reply = task.await.unwrap().unwrap();
        assert!(reply.answer.starts_with("Média de Size: 1.500"));
    }
}

#[tokio::test]
async fn test_matcher_trained_at_startup() {
    let mut config = config();
    config.matcher_enabled = true;
    let handle = ChatSupervisorHandle::spawn(config);

    // Small talk needs no dataset once the matcher is ready
    let reply = handle.ask("muito obrigado".to_string()).await.unwrap();
    assert_eq!(reply.source, AnswerSource::Matcher);
    assert_eq!(reply.intent, "thanks");
}

#[tokio::test]
async fn test_with_analyzer() {
    let config = config();
    let analyzer = BrainAnalyzer::with_matcher(&config, None);
    let handle = ChatSupervisorHandle::with_analyzer(config, analyzer);

    handle.publish_dataset(two_apples()).await.unwrap();
    let reply = handle.ask("oi".to_string()).await.unwrap();
    assert_eq!(reply.source, AnswerSource::Dataset);
    assert_eq!(reply.intent, "greeting");
}

#[tokio::test]
async fn test_reload_from_json_files() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("processed_apple_quality.json");
    let metrics = dir.path().join("model_metrics.json");
    std::fs::write(&dataset, apple_rows_json()).unwrap();
    std::fs::write(
        &metrics,
        r#"{"models": {"svm": {"accuracy_mean": 0.9, "accuracy_std": 0.01, "f1_mean": 0.88, "f1_std": 0.02}},
            "best_model": {"name": "svm", "accuracy_mean": 0.9}}"#,
    )
    .unwrap();

    let handle = ChatSupervisorHandle::spawn(config());
    let source = JsonFileSource::new(&dataset, &metrics);
    let report = handle.reload_from(&source).await.unwrap();
    assert_eq!(report.status.rows, 3);
    assert_eq!(report.status.models, 1);

    let reply = handle.ask("como foi o svm?".to_string()).await.unwrap();
    assert_eq!(
        reply.answer,
        "Modelo: svm\nAcurácia média: 0.900 (± 0.010)\nF1 médio: 0.880 (± 0.020)"
    );
}

fn apple_rows_json() -> String {
    serde_json::to_string(&apple_rows()).unwrap_or_default()
}
