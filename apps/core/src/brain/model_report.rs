//! Answers about trained-model performance, read from the metrics summary.
//!
//! Consulted before any dataset question. Returns `None` whenever it has nothing to
//! say so the caller falls through to the dataset path.

use super::lexicon;
use crate::data::stats::format_number;
use crate::data::{ModelMetrics, ModelScores};

pub struct ModelReporter {
    decimals: u32,
}

impl Default for ModelReporter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ModelReporter {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Answer for `text`, or `None` when metrics are absent or the question is not
    /// about models.
    pub fn answer(&self, text: &str, metrics: Option<&ModelMetrics>) -> Option<String> {
        let metrics = metrics?;
        let lowered = text.to_lowercase();

        if lowered.contains(lexicon::BEST_MODEL_TRIGGER) {
            return Some(self.best_model(metrics));
        }

        // BTreeMap order: the first model named in sorted order wins.
        if let Some((name, scores)) = metrics
            .models
            .iter()
            .find(|(name, _)| mentions_model(&lowered, name))
        {
            return Some(self.model_line(name, scores));
        }

        let words = lexicon::words(&lowered);
        if lexicon::find_trigger(&words, lexicon::MODEL_LISTING_TRIGGERS).is_some() {
            return Some(self.listing(metrics));
        }

        None
    }

    fn best_model(&self, metrics: &ModelMetrics) -> String {
        match &metrics.best_model.name {
            Some(name) => format!(
                "Melhor modelo: {}\nAcurácia média: {}",
                name,
                format_number(metrics.best_model.accuracy_mean, self.decimals)
            ),
            None => "Nenhum melhor modelo registrado.".to_string(),
        }
    }

    fn model_line(&self, name: &str, scores: &ModelScores) -> String {
        format!(
            "Modelo: {}\nAcurácia média: {}\nF1 médio: {}",
            name,
            self.with_spread(scores.accuracy_mean, scores.accuracy_std),
            self.with_spread(scores.f1_mean, scores.f1_std)
        )
    }

    fn listing(&self, metrics: &ModelMetrics) -> String {
        let ranked = metrics.ranked();
        if ranked.is_empty() {
            return "Nenhum modelo registrado.".to_string();
        }

        let mut lines = vec![format!("Modelos por acurácia média ({}):", ranked.len())];
        for (position, (name, scores)) in ranked.iter().enumerate() {
            lines.push(format!(
                "{}. {}: acurácia {} | F1 {}",
                position + 1,
                name,
                format_number(scores.accuracy_mean, self.decimals),
                format_number(scores.f1_mean, self.decimals)
            ));
        }
        lines.join("\n")
    }

    fn with_spread(&self, value: f64, spread: Option<f64>) -> String {
        match spread {
            Some(spread) => format!(
                "{} (± {})",
                format_number(value, self.decimals),
                format_number(spread, self.decimals)
            ),
            None => format_number(value, self.decimals),
        }
    }
}

/// Whether lowercased `text` names `model`, verbatim or with underscores as spaces.
fn mentions_model(text: &str, model: &str) -> bool {
    let model = model.to_lowercase();
    if model.is_empty() {
        return false;
    }
    text.contains(&model) || (model.contains('_') && text.contains(&model.replace('_', " ")))
}
