//! AppleChat core: answers questions about the apple quality dataset and the models
//! trained on it.

pub mod actors;
pub mod brain;
pub mod config;
pub mod data;
pub mod error;
pub mod fs_manager;

pub use actors::{ArtifactSource, ChatSupervisorHandle, JsonFileSource};
pub use brain::{AnswerSource, BrainAnalyzer, ChatReply};
pub use config::ChatConfig;
pub use data::{DatasetIndex, ModelMetrics, Snapshot};
pub use error::AppError;

#[cfg(test)]
mod tests;
