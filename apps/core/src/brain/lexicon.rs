//! Trigger vocabulary and text normalization.
//!
//! Every word list the classifier and the matcher react to lives here, so the
//! vocabulary can grow without touching the matching logic.

use crate::data::LabelFamily;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Word stems that turn a label mention into a counting question ("contar", "totalizar").
pub const COUNT_TRIGGERS: &[&str] = &["quantas", "quantos", "conta", "contagem", "total"];

/// Substrings that ask for an overview of the dataset.
pub const SUMMARY_TRIGGERS: &[&str] = &[
    "resumo",
    "sumário",
    "estatística",
    "estatisticas",
    "descrição",
    "quantas linhas",
    "tamanho do dataset",
    "quantidade",
];

/// Greeting phrases. "boa tarde" / "boa noite" share a word with the good label family.
pub const GREETING_TRIGGERS: &[&str] = &["oi", "olá", "bom dia", "boa tarde", "boa noite"];

/// Phrase asking for the best trained model.
pub const BEST_MODEL_TRIGGER: &str = "melhor modelo";

/// Phrases asking for every trained model.
pub const MODEL_LISTING_TRIGGERS: &[&str] = &[
    "comparar modelos",
    "todos os modelos",
    "ranking de modelos",
    "lista de modelos",
];

/// Example questions shown in greeting and help answers.
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "quantas boas?",
    "resumo do dataset",
    "média de peso",
    "top 5 por doçura",
    "peso > 0.5 e acidez < 1",
    "perfil das ruins",
    "qual o melhor modelo?",
];

/// Portuguese/English function words ignored by the statistical matcher.
const STOPWORDS: &[&str] = &[
    "a", "o", "as", "os", "de", "da", "do", "das", "dos", "e", "em", "no", "na", "nos", "nas",
    "um", "uma", "uns", "umas", "que", "com", "para", "pra", "me", "se", "eu", "ao", "aos",
    "the", "of", "is", "are", "to",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Splits lowercase text into words; anything that is not alphanumeric or `_` separates.
pub fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whether `phrase` occurs in `words` as a run of whole words.
pub fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// First trigger of `triggers` found as whole words.
pub fn find_trigger<'t>(words: &[&str], triggers: &[&'t str]) -> Option<&'t str> {
    triggers.iter().copied().find(|t| contains_phrase(words, t))
}

/// First single-word trigger that begins one of `words`.
pub fn find_prefix_trigger<'t>(words: &[&str], triggers: &[&'t str]) -> Option<&'t str> {
    triggers
        .iter()
        .copied()
        .find(|t| words.iter().any(|w| w.starts_with(t)))
}

/// Words with greeting phrases removed, so "bom dia" never reads as the label "bom".
pub fn without_greetings<'a>(words: &[&'a str]) -> Vec<&'a str> {
    let mut kept = Vec::with_capacity(words.len());
    let mut i = 0;
    'outer: while i < words.len() {
        for greeting in GREETING_TRIGGERS {
            let parts: Vec<&str> = greeting.split_whitespace().collect();
            if parts.len() > 1 && words[i..].starts_with(&parts) {
                i += parts.len();
                continue 'outer;
            }
        }
        kept.push(words[i]);
        i += 1;
    }
    kept
}

/// The label family named first in `words`, ignoring greeting phrases.
pub fn label_family(words: &[&str]) -> Option<LabelFamily> {
    without_greetings(words).into_iter().find_map(|w| {
        [LabelFamily::Good, LabelFamily::Bad]
            .into_iter()
            .find(|family| family.keywords().iter().any(|k| *k == w))
    })
}

/// Replaces Portuguese accented letters with their base letter.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Matcher tokens: lowercase, accent-folded, no stopwords, no bare numbers.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = fold_accents(&text.to_lowercase());
    words(&folded)
        .into_iter()
        .filter(|w| !STOPWORD_SET.contains(w))
        .filter(|w| !w.chars().all(|c| c.is_numeric()))
        .map(str::to_string)
        .collect()
}

/// Fixed greeting answer.
pub fn greeting_message() -> String {
    let mut message = String::from(
        "Olá! Posso responder perguntas sobre o dataset de qualidade de maçãs e sobre os modelos treinados. Experimente:",
    );
    for example in EXAMPLE_QUESTIONS {
        message.push_str("\n- ");
        message.push_str(example);
    }
    message
}
