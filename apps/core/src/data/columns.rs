//! Column name resolution.
//!
//! Maps what a user types ("peso", "doçura", "size?") to a canonical dataset column.

use super::index::DatasetIndex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// User vocabulary (lowercase) to canonical column. Each alias names exactly one column.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("id", "A_id"),
    ("a_id", "A_id"),
    ("size", "Size"),
    ("tamanho", "Size"),
    ("weight", "Weight"),
    ("peso", "Weight"),
    ("sweetness", "Sweetness"),
    ("doçura", "Sweetness"),
    ("docura", "Sweetness"),
    ("doce", "Sweetness"),
    ("crunchiness", "Crunchiness"),
    ("crocância", "Crunchiness"),
    ("crocancia", "Crunchiness"),
    ("crocante", "Crunchiness"),
    ("juiciness", "Juiciness"),
    ("suculência", "Juiciness"),
    ("suculencia", "Juiciness"),
    ("suculento", "Juiciness"),
    ("ripeness", "Ripeness"),
    ("maturação", "Ripeness"),
    ("maturacao", "Ripeness"),
    ("maturidade", "Ripeness"),
    ("madureza", "Ripeness"),
    ("acidity", "Acidity"),
    ("acidez", "Acidity"),
    ("ácido", "Acidity"),
    ("acido", "Acidity"),
    ("quality", "Quality"),
    ("qualidade", "Quality"),
];

static ALIAS_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| COLUMN_ALIASES.iter().copied().collect());

/// Outcome of resolving a user token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnResolution {
    Found(String),
    NotFound {
        token: String,
        /// Known columns containing the token's first three characters.
        suggestions: Vec<String>,
    },
}

/// Outcome of resolving a token that must name a numeric column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericLookup {
    Numeric(String),
    NotNumeric(String),
    NotFound {
        token: String,
        suggestions: Vec<String>,
    },
}

/// Resolves tokens against the columns of one dataset snapshot.
pub struct ColumnResolver<'a> {
    index: &'a DatasetIndex,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(index: &'a DatasetIndex) -> Self {
        Self { index }
    }

    pub fn resolve(&self, token: &str) -> ColumnResolution {
        let token = normalize_token(token);

        if let Some(canonical) = ALIAS_TABLE.get(token.as_str()) {
            if self.index.has_column(canonical) {
                return ColumnResolution::Found(canonical.to_string());
            }
        }

        let capitalized = capitalize(&token);
        if !capitalized.is_empty() && self.index.has_column(&capitalized) {
            return ColumnResolution::Found(capitalized);
        }

        let suggestions = self.suggestions(&token);
        ColumnResolution::NotFound { token, suggestions }
    }

    pub fn resolve_numeric(&self, token: &str) -> NumericLookup {
        match self.resolve(token) {
            ColumnResolution::Found(column) if self.index.is_numeric(&column) => {
                NumericLookup::Numeric(column)
            }
            ColumnResolution::Found(column) => NumericLookup::NotNumeric(column),
            ColumnResolution::NotFound { token, suggestions } => {
                NumericLookup::NotFound { token, suggestions }
            }
        }
    }

    fn suggestions(&self, token: &str) -> Vec<String> {
        let prefix: String = token.chars().take(3).collect();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.index
            .columns()
            .iter()
            .filter(|c| c.to_lowercase().contains(&prefix))
            .cloned()
            .collect()
    }
}

/// Lowercases and strips surrounding punctuation ("Peso?" -> "peso").
pub fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '_')
        .to_lowercase()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
