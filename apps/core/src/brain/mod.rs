//! # Brain Module
//!
//! Question understanding and answer synthesis for AppleChat.
//! Everything here is synchronous and works on an immutable [`crate::data::Snapshot`].
//!
//! ## Components
//! - `lexicon`: trigger words, example questions and text normalization
//! - `intent`: Intent classification using keywords and regex patterns (deterministic path)
//! - `matcher`: Statistical matcher trained on example utterances (small-talk tier)
//! - `model_report`: Answers about trained-model metrics
//! - `synthesizer`: Computes answers from the dataset for a classified intent
//! - `reply`: Output data structure
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod intent;
pub mod lexicon;
pub mod matcher;
pub mod model_report;
pub mod reply;
pub mod synthesizer;

pub use analyzer::{BrainAnalyzer, Classification};
pub use intent::{Comparison, Comparisons, IntentClassifier, IntentResult, QueryIntent};
pub use matcher::{IntentMatcher, MatchOutcome, MatchedIntent};
pub use model_report::ModelReporter;
pub use reply::{AnswerSource, ChatReply};
pub use synthesizer::AnswerSynthesizer;
