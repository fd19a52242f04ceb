use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
///
/// Conditions a user can recover from by rephrasing (unknown column, empty result set,
/// unrecognized question) are answers, not errors. The only error raised while answering
/// a question is [`AppError::NotReady`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents malformed JSON artifacts.
    #[error("JSON error: {0}")]
    Json(String),

    /// Represents data validation errors (e.g., out-of-range configuration values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., unparseable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The dataset snapshot has not been published yet.
    #[error("Dataset not loaded yet")]
    NotReady,

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Json(s) => AppError::Json(s.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::NotReady => AppError::NotReady,
            AppError::Actor(s) => AppError::Actor(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl AppError {
    /// Whether the caller should ask the user to wait and retry.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, AppError::NotReady)
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {}", err))
    }
}
