//! Statistical intent matcher trained on example utterances.
//!
//! Each utterance becomes a TF-IDF vector over the training vocabulary; a question is
//! matched to its nearest utterance by cosine similarity. Small-talk intents carry a
//! ready-made answer. Data intents only classify: their answers need live computation.

use super::lexicon;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::info;

/// Intent labels known to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedIntent {
    Greeting,
    Thanks,
    Farewell,
    Help,
    About,
    CountByLabel,
    Summary,
    MeanOfColumn,
    TopNByColumn,
    FilterByComparison,
    LabelProfile,
    ModelQuestion,
    Unknown,
}

impl MatchedIntent {
    pub fn label(&self) -> &'static str {
        match self {
            MatchedIntent::Greeting => "greeting",
            MatchedIntent::Thanks => "thanks",
            MatchedIntent::Farewell => "farewell",
            MatchedIntent::Help => "help",
            MatchedIntent::About => "about",
            MatchedIntent::CountByLabel => "count_by_label",
            MatchedIntent::Summary => "summary",
            MatchedIntent::MeanOfColumn => "mean_of_column",
            MatchedIntent::TopNByColumn => "top_n_by_column",
            MatchedIntent::FilterByComparison => "filter_by_comparison",
            MatchedIntent::LabelProfile => "label_profile",
            MatchedIntent::ModelQuestion => "model_question",
            MatchedIntent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MatchedIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Training examples for one intent
struct IntentTemplate {
    intent: MatchedIntent,
    utterances: &'static [&'static str],
    answer: Option<&'static str>,
}

const HELP_ANSWER: &str = "Posso contar maçãs boas e ruins, resumir o dataset, calcular médias, \
listar as maiores por uma coluna, filtrar por comparações (ex.: peso > 0.5) e mostrar o perfil \
de cada rótulo. Também respondo sobre a acurácia dos modelos treinados.";

const INTENT_TEMPLATES: &[IntentTemplate] = &[
    IntentTemplate {
        intent: MatchedIntent::Greeting,
        utterances: &[
            "oi",
            "olá",
            "oi tudo bem",
            "olá tudo bem",
            "bom dia",
            "boa tarde",
            "boa noite",
            "e aí",
            "hello",
            "hi",
        ],
        answer: Some(
            "Olá! Pergunte sobre o dataset de maçãs, por exemplo: \"quantas boas?\", \
\"média de peso\" ou \"qual o melhor modelo?\".",
        ),
    },
    IntentTemplate {
        intent: MatchedIntent::Thanks,
        utterances: &["obrigado", "obrigada", "muito obrigado", "valeu", "agradeço", "thanks"],
        answer: Some("De nada! Se quiser, faça outra pergunta sobre as maçãs."),
    },
    IntentTemplate {
        intent: MatchedIntent::Farewell,
        utterances: &["tchau", "até logo", "até mais", "adeus", "até a próxima", "bye"],
        answer: Some("Até logo!"),
    },
    IntentTemplate {
        intent: MatchedIntent::Help,
        utterances: &[
            "ajuda",
            "me ajuda",
            "preciso de ajuda",
            "o que você sabe fazer",
            "quais perguntas posso fazer",
            "como funciona",
            "help",
        ],
        answer: Some(HELP_ANSWER),
    },
    IntentTemplate {
        intent: MatchedIntent::About,
        utterances: &["quem é você", "qual seu nome", "você é um robô", "o que é você"],
        answer: Some(
            "Sou o assistente do projeto de qualidade de maçãs: respondo perguntas sobre os \
dados processados e sobre os modelos treinados.",
        ),
    },
    IntentTemplate {
        intent: MatchedIntent::CountByLabel,
        utterances: &[
            "quantas maçãs boas",
            "quantas ruins existem",
            "contagem de boas e ruins",
            "total de maçãs boas",
            "quantos bons",
        ],
        answer: None,
    },
    IntentTemplate {
        intent: MatchedIntent::Summary,
        utterances: &[
            "resumo do dataset",
            "estatísticas gerais",
            "quantas linhas tem o dataset",
            "descrição dos dados",
            "tamanho do dataset",
        ],
        answer: None,
    },
    IntentTemplate {
        intent: MatchedIntent::MeanOfColumn,
        utterances: &[
            "média de peso",
            "qual a média do tamanho",
            "média de doçura",
            "average of size",
        ],
        answer: None,
    },
    IntentTemplate {
        intent: MatchedIntent::TopNByColumn,
        utterances: &[
            "top 5 por peso",
            "maiores por doçura",
            "melhores por suculência",
            "top 10 por acidez",
        ],
        answer: None,
    },
    IntentTemplate {
        intent: MatchedIntent::FilterByComparison,
        utterances: &[
            "peso maior que 0.5",
            "tamanho menor que 1",
            "maçãs com acidez acima de 2",
        ],
        answer: None,
    },
    IntentTemplate {
        intent: MatchedIntent::LabelProfile,
        utterances: &[
            "perfil das boas",
            "como são as ruins",
            "características das maçãs boas",
        ],
        answer: None,
    },
    IntentTemplate {
        intent: MatchedIntent::ModelQuestion,
        utterances: &[
            "qual o melhor modelo",
            "acurácia do svm",
            "desempenho dos modelos",
            "f1 do knn",
        ],
        answer: None,
    },
];

/// Outcome of matching one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub intent: MatchedIntent,
    /// Cosine similarity with the nearest training utterance (0.0 - 1.0)
    pub confidence: f32,
    /// Ready-made answer, only for intents that need no computation
    pub answer: Option<String>,
}

type SparseVector = HashMap<String, f32>;

struct TrainedUtterance {
    template: usize,
    vector: SparseVector,
}

/// Nearest-utterance intent matcher
pub struct IntentMatcher {
    idf: HashMap<String, f32>,
    /// IDF given to words never seen in training
    unseen_idf: f32,
    utterances: Vec<TrainedUtterance>,
}

impl IntentMatcher {
    /// Trains on the built-in utterance corpus.
    pub fn train() -> Self {
        let documents: Vec<(usize, Vec<String>)> = INTENT_TEMPLATES
            .iter()
            .enumerate()
            .flat_map(|(i, t)| t.utterances.iter().map(move |u| (i, lexicon::tokenize(u))))
            .collect();

        let total = documents.len() as f32;
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for (_, tokens) in &documents {
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let idf: HashMap<String, f32> = document_frequency
            .into_iter()
            .map(|(token, df)| (token, ((1.0 + total) / (1.0 + df as f32)).ln() + 1.0))
            .collect();
        let unseen_idf = (1.0 + total).ln() + 1.0;

        let mut matcher = Self {
            idf,
            unseen_idf,
            utterances: Vec::new(),
        };
        matcher.utterances = documents
            .iter()
            .map(|(template, tokens)| TrainedUtterance {
                template: *template,
                vector: matcher.vectorize(tokens),
            })
            .collect();

        info!(
            "Trained intent matcher: {} utterances, {} terms",
            matcher.utterances.len(),
            matcher.idf.len()
        );

        matcher
    }

    fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let mut vector = SparseVector::new();
        for token in tokens {
            let weight = self.idf.get(token).copied().unwrap_or(self.unseen_idf);
            *vector.entry(token.clone()).or_insert(0.0) += weight;
        }
        vector
    }

    /// Best matching intent for `query`.
    pub fn classify(&self, query: &str) -> MatchOutcome {
        let tokens = lexicon::tokenize(query);
        let unknown = MatchOutcome {
            intent: MatchedIntent::Unknown,
            confidence: 0.0,
            answer: None,
        };
        if !tokens.iter().any(|t| self.idf.contains_key(t)) {
            return unknown;
        }

        let query_vector = self.vectorize(&tokens);
        let mut best: Option<(usize, f32)> = None;
        for utterance in &self.utterances {
            let similarity = cosine_similarity(&query_vector, &utterance.vector);
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((utterance.template, similarity));
            }
        }

        // Threshold: if similarity is too low, return Unknown
        match best {
            Some((template, similarity)) if similarity >= 0.25 => {
                let template = &INTENT_TEMPLATES[template];
                MatchOutcome {
                    intent: template.intent,
                    confidence: similarity.clamp(0.0, 1.0),
                    answer: template.answer.map(str::to_string),
                }
            }
            Some((_, similarity)) => MatchOutcome {
                confidence: similarity.clamp(0.0, 1.0),
                ..unknown
            },
            None => unknown,
        }
    }

    /// Classify with top-k intents (best similarity per intent)
    pub fn classify_top_k(&self, query: &str, k: usize) -> Vec<(MatchedIntent, f32)> {
        let query_vector = self.vectorize(&lexicon::tokenize(query));
        let mut per_intent: HashMap<MatchedIntent, f32> = HashMap::new();
        for utterance in &self.utterances {
            let similarity = cosine_similarity(&query_vector, &utterance.vector);
            let entry = per_intent
                .entry(INTENT_TEMPLATES[utterance.template].intent)
                .or_insert(0.0);
            *entry = entry.max(similarity);
        }

        let mut results: Vec<(MatchedIntent, f32)> = per_intent.into_iter().collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.label().cmp(b.0.label()))
        });
        results.truncate(k);
        results
    }

    pub fn utterance_count(&self) -> usize {
        self.utterances.len()
    }
}

/// Calculate cosine similarity between two sparse vectors
fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a
        .iter()
        .filter_map(|(k, x)| b.get(k).map(|y| x * y))
        .sum();
    let magnitude_a: f32 = a.values().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.values().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(&str, f32)]) -> SparseVector {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vector(&[("x", 1.0)]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.001);

        let c = vector(&[("y", 1.0)]);
        assert!(cosine_similarity(&a, &c).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &SparseVector::new()), 0.0);
    }

    #[test]
    fn test_greetings_are_answered() {
        let matcher = IntentMatcher::train();

        for greeting in ["oi", "Olá!", "bom dia", "boa noite"] {
            let outcome = matcher.classify(greeting);
            assert_eq!(outcome.intent, MatchedIntent::Greeting, "for '{}'", greeting);
            assert!(outcome.confidence > 0.75, "for '{}'", greeting);
            assert!(outcome.answer.is_some());
        }
    }

    #[test]
    fn test_data_questions_have_no_answer() {
        let matcher = IntentMatcher::train();

        let outcome = matcher.classify("quantas maçãs boas");
        assert_eq!(outcome.intent, MatchedIntent::CountByLabel);
        assert!(outcome.answer.is_none());
    }

    #[test]
    fn test_unknown_words() {
        let matcher = IntentMatcher::train();

        let outcome = matcher.classify("xyz abc");
        assert_eq!(outcome.intent, MatchedIntent::Unknown);
        assert_eq!(outcome.confidence, 0.0);
    }

    #[test]
    fn test_top_k_is_sorted() {
        let matcher = IntentMatcher::train();

        let results = matcher.classify_top_k("obrigado", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, MatchedIntent::Thanks);
        assert!(results[0].1 >= results[1].1);
    }
}
