use crate::actors::messages::{AppError, SupervisorMessage};
use crate::actors::traits::ArtifactSource;
use crate::brain::{BrainAnalyzer, ChatReply, IntentMatcher};
use crate::config::ChatConfig;
use crate::data::{DatasetIndex, ModelMetrics, Snapshot, SnapshotStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument, warn};

const ASK_TIMEOUT: Duration = Duration::from_secs(10);
const RELOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// What a reload managed to publish.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    pub status: SnapshotStatus,
    /// Set when the metrics could not be read; the dataset was still published.
    pub metrics_error: Option<String>,
}

/// A handle to the `ChatSupervisor` actor.
///
/// This is the primary entry point for answering questions. The actor owns the current
/// snapshot; new datasets and metrics are built by the caller and swapped in whole.
#[derive(Clone)]
pub struct ChatSupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    config: Arc<ChatConfig>,
}

impl ChatSupervisorHandle {
    /// Spawns the supervisor with an empty snapshot.
    ///
    /// The statistical matcher (when enabled) is trained on a blocking thread before the
    /// first message is handled; messages sent meanwhile wait in the channel.
    pub fn spawn(config: ChatConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let config = Arc::new(config);
        let actor_config = Arc::clone(&config);

        tokio::spawn(async move {
            let matcher = if actor_config.matcher_enabled {
                match tokio::task::spawn_blocking(IntentMatcher::train).await {
                    Ok(matcher) => Some(matcher),
                    Err(e) => {
                        error!("Intent matcher training failed, continuing without it: {}", e);
                        None
                    }
                }
            } else {
                None
            };
            let analyzer = BrainAnalyzer::with_matcher(&actor_config, matcher);
            ChatSupervisor::new(receiver, analyzer).run().await
        });

        Self { sender, config }
    }

    /// Spawns the supervisor around a ready analyzer.
    pub fn with_analyzer(config: ChatConfig, analyzer: BrainAnalyzer) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        tokio::spawn(async move { ChatSupervisor::new(receiver, analyzer).run().await });
        Self {
            sender,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Answers a question from the snapshot current when the actor picks it up.
    ///
    /// # Returns
    ///
    /// The reply, or `AppError::NotReady` when the question needs a dataset and none has
    /// been published.
    #[instrument(skip(self))]
    pub async fn ask(&self, question: String) -> Result<ChatReply, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::Ask {
            question,
            responder: send,
        };
        self.send(msg).await?;
        timeout(ASK_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Publishes a new dataset, keeping the current metrics.
    #[instrument(skip(self, dataset), fields(rows = dataset.len()))]
    pub async fn publish_dataset(&self, dataset: DatasetIndex) -> Result<SnapshotStatus, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::PublishDataset {
            dataset: Arc::new(dataset),
            responder: send,
        };
        self.send(msg).await?;
        self.receive(recv).await
    }

    /// Publishes new metrics (`None` clears them), keeping the current dataset.
    #[instrument(skip(self, metrics))]
    pub async fn publish_metrics(
        &self,
        metrics: Option<ModelMetrics>,
    ) -> Result<SnapshotStatus, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::PublishMetrics {
            metrics: metrics.map(Arc::new),
            responder: send,
        };
        self.send(msg).await?;
        self.receive(recv).await
    }

    /// Loads both artifacts from `source`, builds the new snapshot and swaps it in.
    ///
    /// A dataset failure aborts the reload and leaves the current snapshot untouched.
    /// A metrics failure is reported and the snapshot is published without metrics.
    #[instrument(skip(self, source))]
    pub async fn reload_from<S>(&self, source: &S) -> Result<ReloadReport, AppError>
    where
        S: ArtifactSource + ?Sized,
    {
        timeout(RELOAD_TIMEOUT, self.reload_inner(source)).await?
    }

    async fn reload_inner<S>(&self, source: &S) -> Result<ReloadReport, AppError>
    where
        S: ArtifactSource + ?Sized,
    {
        let rows = source.load_dataset().await?;
        let sample_size = self.config.numeric_sample_size;
        let ratio = self.config.numeric_ratio;
        let dataset = tokio::task::spawn_blocking(move || {
            DatasetIndex::from_json_rows(&rows, sample_size, ratio)
        })
        .await?;

        let (metrics, metrics_error) = match source.load_metrics().await {
            Ok(metrics) => (metrics, None),
            Err(e) => {
                warn!("Metrics not loaded: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::PublishSnapshot {
            snapshot: Snapshot::new(Some(dataset), metrics),
            responder: send,
        };
        self.send(msg).await?;
        let status = self.receive(recv).await?;

        Ok(ReloadReport {
            status,
            metrics_error,
        })
    }

    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<SnapshotStatus, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(SupervisorMessage::Status { responder: send }).await?;
        self.receive(recv).await
    }

    /// Stops the actor loop. Later requests fail with `AppError::Actor`.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.send(SupervisorMessage::Shutdown).await
    }

    async fn send(&self, msg: SupervisorMessage) -> Result<(), AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    async fn receive<T>(&self, recv: oneshot::Receiver<T>) -> Result<T, AppError> {
        timeout(ASK_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct ChatSupervisor {
    receiver: mpsc::Receiver<SupervisorMessage>,
    analyzer: BrainAnalyzer,
    snapshot: Snapshot,
}

impl ChatSupervisor {
    fn new(receiver: mpsc::Receiver<SupervisorMessage>, analyzer: BrainAnalyzer) -> Self {
        Self {
            receiver,
            analyzer,
            snapshot: Snapshot::default(),
        }
    }

    async fn run(mut self) {
        info!(matcher = self.analyzer.has_matcher(), "Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, SupervisorMessage::Shutdown) {
                info!("Supervisor shutting down...");
                break;
            }
            self.handle_message(msg);
        }
        info!("Supervisor stopped");
    }

    fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::Ask {
                question,
                responder,
            } => {
                let result = self.analyzer.answer(&question, &self.snapshot);
                match &result {
                    Ok(reply) => debug!("{}", reply.summary()),
                    Err(e) => warn!("Question not answered: {}", e),
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::PublishDataset { dataset, responder } => {
                self.snapshot.dataset = Some(dataset);
                self.published(responder);
            }
            SupervisorMessage::PublishMetrics { metrics, responder } => {
                self.snapshot.metrics = metrics;
                self.published(responder);
            }
            SupervisorMessage::PublishSnapshot {
                snapshot,
                responder,
            } => {
                self.snapshot = snapshot;
                self.published(responder);
            }
            SupervisorMessage::Status { responder } => {
                let _ = responder.send(self.snapshot.status());
            }
            SupervisorMessage::Shutdown => {}
        }
    }

    fn published(&self, responder: oneshot::Sender<SnapshotStatus>) {
        let status = self.snapshot.status();
        info!(
            rows = status.rows,
            columns = status.columns,
            models = status.models,
            "Snapshot published"
        );
        let _ = responder.send(status);
    }
}
