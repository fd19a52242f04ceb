//! Chat Reply - Output structure for one answered question.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Model metrics reporter
    ModelMetrics,
    /// Statistical matcher canned answer
    Matcher,
    /// Computed from the dataset snapshot
    Dataset,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnswerSource::ModelMetrics => "model_metrics",
            AnswerSource::Matcher => "matcher",
            AnswerSource::Dataset => "dataset",
        };
        write!(f, "{}", name)
    }
}

/// Complete reply for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Original user question
    pub question: String,

    /// Answer text, possibly multi-line
    pub answer: String,

    pub source: AnswerSource,

    /// Intent label of the tier that answered
    pub intent: String,

    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Timestamp of the answer. Presentation only, never part of `answer`.
    pub timestamp: DateTime<Utc>,
}

impl ChatReply {
    pub fn new(
        question: impl Into<String>,
        answer: String,
        source: AnswerSource,
        intent: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            question: question.into(),
            answer,
            source,
            intent: intent.into(),
            confidence,
            processing_time_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Source: {}, Intent: {} ({:.0}%), Lines: {}, Time: {}ms",
            self.source,
            self.intent,
            self.confidence * 100.0,
            self.answer.lines().count(),
            self.processing_time_ms
        )
    }
}
