//! Brain Analyzer - Main orchestrator for the Brain module.
//!
//! Routes one question through the answering tiers, first hit wins:
//! 1. Model metrics reporter (only when metrics are loaded)
//! 2. Statistical matcher, when confident and holding a ready-made answer
//! 3. Keyword classifier + answer synthesizer over the dataset snapshot
//!
//! Only tier 3 needs the dataset; without one it reports [`AppError::NotReady`].

use std::time::Instant;
use tracing::debug;

use super::intent::{IntentClassifier, IntentResult, QueryIntent};
use super::matcher::{IntentMatcher, MatchedIntent};
use super::model_report::ModelReporter;
use super::reply::{AnswerSource, ChatReply};
use super::synthesizer::AnswerSynthesizer;
use crate::config::ChatConfig;
use crate::data::Snapshot;
use crate::error::AppError;

/// Outcome of the two classification tiers
#[derive(Debug, Clone)]
pub enum Classification {
    /// The matcher is sure and already has the answer
    Confident {
        answer: String,
        intent: MatchedIntent,
        confidence: f32,
    },
    /// The answer has to be computed from the dataset
    NeedsComputation(IntentResult),
}

/// Main Brain analyzer that orchestrates all answering components
pub struct BrainAnalyzer {
    intent_classifier: IntentClassifier,
    matcher: Option<IntentMatcher>,
    matcher_threshold: f32,
    synthesizer: AnswerSynthesizer,
    reporter: ModelReporter,
}

impl BrainAnalyzer {
    /// Analyzer for `config`, training the matcher inline when it is enabled.
    pub fn new(config: &ChatConfig) -> Self {
        let matcher = config.matcher_enabled.then(IntentMatcher::train);
        Self::with_matcher(config, matcher)
    }

    /// Analyzer using an already trained matcher (or none).
    pub fn with_matcher(config: &ChatConfig, matcher: Option<IntentMatcher>) -> Self {
        Self {
            intent_classifier: IntentClassifier::with_default_top_n(config.default_top_n),
            matcher,
            matcher_threshold: config.matcher_threshold,
            synthesizer: AnswerSynthesizer::new(config.decimal_places, config.filter_sample_limit),
            reporter: ModelReporter::new(config.decimal_places),
        }
    }

    pub fn has_matcher(&self) -> bool {
        self.matcher.is_some()
    }

    /// Two-tier classification: matcher first, keyword rules as fallback.
    ///
    /// A canned matcher answer is only kept when the keyword rules find nothing to
    /// compute in the same text, so "bom dia, quantas boas?" still counts.
    pub fn classify(&self, question: &str) -> Classification {
        let keywords = self.intent_classifier.classify(question);
        let computable = !matches!(
            keywords.intent,
            QueryIntent::Greeting | QueryIntent::Unrecognized
        );

        if let Some(matcher) = &self.matcher {
            let outcome = matcher.classify(question);
            if outcome.confidence > self.matcher_threshold && !computable {
                if let Some(answer) = outcome.answer {
                    return Classification::Confident {
                        answer,
                        intent: outcome.intent,
                        confidence: outcome.confidence,
                    };
                }
            }
            debug!(
                "Matcher fell through: {} ({:.2}), keywords: {}",
                outcome.intent, outcome.confidence, keywords.intent
            );
        }

        Classification::NeedsComputation(keywords)
    }

    /// Answer `question` from `snapshot`.
    pub fn answer(&self, question: &str, snapshot: &Snapshot) -> Result<ChatReply, AppError> {
        let start = Instant::now();

        let mut reply = self.route(question, snapshot)?;
        reply.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!("Answered: {}", reply.summary());
        Ok(reply)
    }

    fn route(&self, question: &str, snapshot: &Snapshot) -> Result<ChatReply, AppError> {
        if let Some(answer) = self.reporter.answer(question, snapshot.metrics.as_deref()) {
            return Ok(ChatReply::new(
                question,
                answer,
                AnswerSource::ModelMetrics,
                "model_question",
                1.0,
            ));
        }

        match self.classify(question) {
            Classification::Confident {
                answer,
                intent,
                confidence,
            } => Ok(ChatReply::new(
                question,
                answer,
                AnswerSource::Matcher,
                intent.label(),
                confidence,
            )),
            Classification::NeedsComputation(result) => {
                let dataset = snapshot.dataset.as_deref().ok_or(AppError::NotReady)?;
                let answer = self.synthesizer.synthesize(&result.intent, dataset);
                Ok(ChatReply::new(
                    question,
                    answer,
                    AnswerSource::Dataset,
                    result.intent.label(),
                    result.confidence,
                ))
            }
        }
    }
}
