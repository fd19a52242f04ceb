use crate::brain::ChatReply;
use crate::data::{DatasetIndex, ModelMetrics, Snapshot, SnapshotStatus};
use std::sync::Arc;
use tokio::sync::oneshot;

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `ChatSupervisor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A question to answer from the current snapshot.
    Ask {
        question: String,
        /// A channel to send the reply back.
        responder: oneshot::Sender<Result<ChatReply, AppError>>,
    },
    /// Replaces the dataset, keeping the current metrics.
    PublishDataset {
        dataset: Arc<DatasetIndex>,
        responder: oneshot::Sender<SnapshotStatus>,
    },
    /// Replaces the metrics (`None` clears them), keeping the current dataset.
    PublishMetrics {
        metrics: Option<Arc<ModelMetrics>>,
        responder: oneshot::Sender<SnapshotStatus>,
    },
    /// Replaces dataset and metrics together.
    PublishSnapshot {
        snapshot: Snapshot,
        responder: oneshot::Sender<SnapshotStatus>,
    },
    /// A request for what is currently loaded.
    Status {
        responder: oneshot::Sender<SnapshotStatus>,
    },
    /// A command to stop the supervisor loop.
    Shutdown,
}
