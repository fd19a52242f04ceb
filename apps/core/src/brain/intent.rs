//! Intent Classification using keyword triggers and regex patterns.
//!
//! Deterministic path: rules are evaluated top-down on the lowercased question and
//! the first one that matches wins, carrying the parameters it extracted.

use super::lexicon;
use crate::data::{ComparisonOp, LabelFamily};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// One `<column> <op> <threshold>` comparison as typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Column token, not yet resolved.
    pub column: String,
    pub op: ComparisonOp,
    pub threshold: f64,
}

/// Conjunction of at least one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Comparison>", into = "Vec<Comparison>")]
pub struct Comparisons(Vec<Comparison>);

impl Comparisons {
    /// `None` when `comparisons` is empty.
    pub fn new(comparisons: Vec<Comparison>) -> Option<Self> {
        if comparisons.is_empty() {
            None
        } else {
            Some(Self(comparisons))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comparison> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Comparison] {
        &self.0
    }
}

impl TryFrom<Vec<Comparison>> for Comparisons {
    type Error = String;

    fn try_from(comparisons: Vec<Comparison>) -> Result<Self, Self::Error> {
        Self::new(comparisons).ok_or_else(|| "filter needs at least one comparison".to_string())
    }
}

impl From<Comparisons> for Vec<Comparison> {
    fn from(comparisons: Comparisons) -> Self {
        comparisons.0
    }
}

/// Detected question type with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum QueryIntent {
    /// Good/bad counts
    CountByLabel,
    /// Row/column overview
    Summary,
    MeanOfColumn { column: String },
    TopNByColumn { column: String, count: usize },
    FilterByComparison { filters: Comparisons },
    /// Per-column means over one label family
    LabelProfile { family: LabelFamily },
    Greeting,
    Unrecognized,
}

impl QueryIntent {
    pub fn label(&self) -> &'static str {
        match self {
            QueryIntent::CountByLabel => "count_by_label",
            QueryIntent::Summary => "summary",
            QueryIntent::MeanOfColumn { .. } => "mean_of_column",
            QueryIntent::TopNByColumn { .. } => "top_n_by_column",
            QueryIntent::FilterByComparison { .. } => "filter_by_comparison",
            QueryIntent::LabelProfile { .. } => "label_profile",
            QueryIntent::Greeting => "greeting",
            QueryIntent::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of intent classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: QueryIntent,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Text fragments that triggered the rule
    pub matched_patterns: Vec<String>,
}

impl IntentResult {
    fn unrecognized() -> Self {
        Self {
            intent: QueryIntent::Unrecognized,
            confidence: 0.0,
            matched_patterns: vec![],
        }
    }
}

/// A rule hit before it is turned into an [`IntentResult`].
struct RuleMatch {
    intent: QueryIntent,
    weight: f32,
    evidence: Vec<String>,
}

impl RuleMatch {
    fn new(intent: QueryIntent, weight: f32, evidence: impl Into<String>) -> Self {
        Self {
            intent,
            weight,
            evidence: vec![evidence.into()],
        }
    }
}

// NOTE: expect() is acceptable here: the patterns are literals and compile or never ship.
static MEAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:médias?|medias?|average)\b.*?\b(?:de|do|da|dos|das|of)\s+(\S+)")
        .expect("Invalid regex: mean pattern")
});

static TOP_N_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btop\s+(\d+)\b.*?\bpor\s+(\S+)").expect("Invalid regex: top-n pattern")
});

static RANKING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b(\d+)\s+)?\b(?:maiores|melhores|top)\b.*?\bpor\s+(\S+)")
        .expect("Invalid regex: ranking pattern")
});

// Two-character operators come first in the alternation so `>=` never reads as `>`.
static COMPARISON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\p{L}_][\p{L}\p{N}_]*)\s*(>=|<=|>|<|=)\s*(\S+)")
        .expect("Invalid regex: comparison pattern")
});

/// Intent classifier using keyword triggers and regex extraction
pub struct IntentClassifier {
    default_top_n: usize,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::with_default_top_n(5)
    }

    /// Classifier whose top-n rule uses `default_top_n` when the question names no count.
    pub fn with_default_top_n(default_top_n: usize) -> Self {
        Self {
            default_top_n: default_top_n.max(1),
        }
    }

    /// Classify the intent of a question
    pub fn classify(&self, text: &str) -> IntentResult {
        let lowered = text.trim().to_lowercase();
        if lowered.is_empty() {
            return IntentResult::unrecognized();
        }
        let words = lexicon::words(&lowered);
        let family = lexicon::label_family(&words);

        let matched = self
            .match_count(&words, family)
            .or_else(|| self.match_summary(&lowered))
            .or_else(|| self.match_mean(&lowered))
            .or_else(|| self.match_top_n(&lowered))
            .or_else(|| self.match_filter(&lowered))
            .or_else(|| family.map(|f| RuleMatch::new(QueryIntent::LabelProfile { family: f }, 0.7, f.canonical())))
            .or_else(|| {
                lexicon::find_trigger(&words, lexicon::GREETING_TRIGGERS)
                    .map(|g| RuleMatch::new(QueryIntent::Greeting, 0.9, g))
            });

        match matched {
            Some(rule) => IntentResult {
                intent: rule.intent,
                confidence: rule.weight,
                matched_patterns: rule.evidence,
            },
            None => IntentResult::unrecognized(),
        }
    }

    fn match_count(&self, words: &[&str], family: Option<LabelFamily>) -> Option<RuleMatch> {
        let trigger = lexicon::find_prefix_trigger(words, lexicon::COUNT_TRIGGERS)?;
        let family = family?;
        Some(RuleMatch {
            intent: QueryIntent::CountByLabel,
            weight: 1.0,
            evidence: vec![trigger.to_string(), family.canonical().to_string()],
        })
    }

    fn match_summary(&self, lowered: &str) -> Option<RuleMatch> {
        lexicon::SUMMARY_TRIGGERS
            .iter()
            .find(|t| lowered.contains(*t))
            .map(|t| RuleMatch::new(QueryIntent::Summary, 0.9, *t))
    }

    fn match_mean(&self, lowered: &str) -> Option<RuleMatch> {
        let caps = MEAN_PATTERN.captures(lowered)?;
        let column = caps.get(1)?.as_str().to_string();
        Some(RuleMatch::new(
            QueryIntent::MeanOfColumn { column },
            1.0,
            caps.get(0)?.as_str(),
        ))
    }

    fn match_top_n(&self, lowered: &str) -> Option<RuleMatch> {
        let (count, column, evidence) = if let Some(caps) = TOP_N_PATTERN.captures(lowered) {
            (
                caps.get(1).map(|m| m.as_str()),
                caps.get(2)?.as_str(),
                caps.get(0)?.as_str(),
            )
        } else {
            let caps = RANKING_PATTERN.captures(lowered)?;
            (
                caps.get(1).map(|m| m.as_str()),
                caps.get(2)?.as_str(),
                caps.get(0)?.as_str(),
            )
        };

        let count = count
            .map(parse_count)
            .unwrap_or(self.default_top_n)
            .max(1);

        Some(RuleMatch::new(
            QueryIntent::TopNByColumn {
                column: column.to_string(),
                count,
            },
            1.0,
            evidence,
        ))
    }

    fn match_filter(&self, lowered: &str) -> Option<RuleMatch> {
        let mut comparisons = Vec::new();
        let mut evidence = Vec::new();

        for caps in COMPARISON_PATTERN.captures_iter(lowered) {
            let (Some(column), Some(op), Some(raw)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let Some(op) = ComparisonOp::parse(op.as_str()) else {
                continue;
            };
            let Some(threshold) = parse_threshold(raw.as_str()) else {
                continue;
            };
            comparisons.push(Comparison {
                column: column.as_str().to_string(),
                op,
                threshold,
            });
            if let Some(m) = caps.get(0) {
                evidence.push(m.as_str().to_string());
            }
        }

        let filters = Comparisons::new(comparisons)?;
        Some(RuleMatch {
            intent: QueryIntent::FilterByComparison { filters },
            weight: 1.0,
            evidence,
        })
    }
}

/// Digits-only count; values past `usize::MAX` saturate.
fn parse_count(digits: &str) -> usize {
    digits.parse::<usize>().unwrap_or(usize::MAX)
}

/// Parses a threshold accepting `,` or `.` as decimal separator.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim_end_matches(|c: char| matches!(c, '?' | '!' | ';' | ':' | ',' | '.' | ')'))
        .replace(',', ".");
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
