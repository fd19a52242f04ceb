//! Answer Synthesizer - turns a classified intent into answer text.
//!
//! Every intent produces a string. Unknown columns, non-numeric columns and empty
//! results are answered with an explanatory message, never surfaced as errors.

use super::intent::{Comparisons, QueryIntent};
use super::lexicon;
use crate::data::stats::{self, format_number};
use crate::data::{
    ColumnFilter, ColumnResolver, DatasetIndex, LabelFamily, NumericLookup,
};

pub struct AnswerSynthesizer {
    decimals: u32,
    filter_sample_limit: usize,
}

impl Default for AnswerSynthesizer {
    fn default() -> Self {
        Self::new(3, 6)
    }
}

impl AnswerSynthesizer {
    pub fn new(decimals: u32, filter_sample_limit: usize) -> Self {
        Self {
            decimals,
            filter_sample_limit: filter_sample_limit.max(1),
        }
    }

    pub fn synthesize(&self, intent: &QueryIntent, index: &DatasetIndex) -> String {
        match intent {
            QueryIntent::CountByLabel => self.count_by_label(index),
            QueryIntent::Summary => self.summary(index),
            QueryIntent::MeanOfColumn { column } => self.mean_of_column(column, index),
            QueryIntent::TopNByColumn { column, count } => self.top_n(column, *count, index),
            QueryIntent::FilterByComparison { filters } => self.filter(filters, index),
            QueryIntent::LabelProfile { family } => self.label_profile(*family, index),
            QueryIntent::Greeting => lexicon::greeting_message(),
            QueryIntent::Unrecognized => self.help(index),
        }
    }

    fn count_by_label(&self, index: &DatasetIndex) -> String {
        format!(
            "Total: {}\nBoas: {}\nRuins: {}",
            index.len(),
            index.count_label(LabelFamily::Good),
            index.count_label(LabelFamily::Bad)
        )
    }

    fn summary(&self, index: &DatasetIndex) -> String {
        format!(
            "Resumo do dataset:\nLinhas: {}\nColunas: {}\nColunas numéricas: {}",
            index.len(),
            index.columns().len(),
            list_or_none(index.numeric_columns())
        )
    }

    fn mean_of_column(&self, token: &str, index: &DatasetIndex) -> String {
        let column = match self.numeric_column(token, index) {
            Ok(column) => column,
            Err(message) => return message,
        };

        let values = stats::numeric_values(index.records(), &column);
        match stats::summarize(&values) {
            Some(summary) => format!(
                "Média de {}: {}\nDesvio padrão: {}\nValores válidos: {}",
                column,
                format_number(summary.mean, self.decimals),
                format_number(summary.std_dev, self.decimals),
                summary.count
            ),
            None => format!("Sem dados numéricos na coluna '{}'.", column),
        }
    }

    fn top_n(&self, token: &str, count: usize, index: &DatasetIndex) -> String {
        let column = match self.numeric_column(token, index) {
            Ok(column) => column,
            Err(message) => return message,
        };
        if index.is_empty() {
            return "Nenhuma linha encontrada (0 resultados).".to_string();
        }

        let ranked = stats::rank_descending(index.records(), &column);
        let taken: Vec<usize> = ranked.into_iter().take(count.max(1)).collect();

        let mut lines = vec![format!("Top {} por {}:", taken.len(), column)];
        for (rank, position) in taken.iter().enumerate() {
            let value = index.records()[*position]
                .number(&column)
                .map(|v| format_number(v, self.decimals))
                .unwrap_or_else(|| "n/d".to_string());
            lines.push(format!("{}. {}: {}", rank + 1, index.row_label(*position), value));
        }
        lines.join("\n")
    }

    fn filter(&self, comparisons: &Comparisons, index: &DatasetIndex) -> String {
        let resolver = ColumnResolver::new(index);
        let mut filters = Vec::with_capacity(comparisons.as_slice().len());
        let mut skipped = Vec::new();

        for comparison in comparisons.iter() {
            match resolver.resolve_numeric(&comparison.column) {
                NumericLookup::Numeric(column) => filters.push(ColumnFilter {
                    column,
                    op: comparison.op,
                    threshold: comparison.threshold,
                }),
                NumericLookup::NotNumeric(column) => skipped.push(column),
                NumericLookup::NotFound { token, .. } => skipped.push(token),
            }
        }

        if filters.is_empty() {
            return self.help(index);
        }

        let matches = stats::filter_rows(index.records(), &filters);
        let description = filters
            .iter()
            .map(|f| format!("{} {} {}", f.column, f.op, format_number(f.threshold, self.decimals)))
            .collect::<Vec<_>>()
            .join(" E ");

        let mut lines = vec![format!("Filtros: {}", description)];
        if !skipped.is_empty() {
            lines.push(format!("Filtros ignorados: {}", skipped.join(", ")));
        }

        if matches.is_empty() {
            lines.push("Nenhuma linha encontrada (0 resultados).".to_string());
            return lines.join("\n");
        }

        lines.push(format!("Linhas encontradas: {} de {}", matches.len(), index.len()));
        for position in matches.iter().take(self.filter_sample_limit) {
            let record = &index.records()[*position];
            let values = filters
                .iter()
                .map(|f| {
                    let value = record
                        .number(&f.column)
                        .map(|v| format_number(v, self.decimals))
                        .unwrap_or_default();
                    format!("{}={}", f.column, value)
                })
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("- {}: {}", index.row_label(*position), values));
        }
        if matches.len() > self.filter_sample_limit {
            lines.push(format!("... e mais {}", matches.len() - self.filter_sample_limit));
        }
        lines.join("\n")
    }

    fn label_profile(&self, family: LabelFamily, index: &DatasetIndex) -> String {
        let rows = index.rows_with_label(family);
        if rows.is_empty() {
            return format!(
                "Nenhuma amostra encontrada para o rótulo '{}'.",
                family.canonical()
            );
        }

        let mut lines = vec![format!(
            "Perfil das maçãs {} ({} amostras):",
            family.plural(),
            rows.len()
        )];
        for column in index.numeric_columns() {
            if Some(column.as_str()) == index.label_column() {
                continue;
            }
            let values = stats::numeric_values(rows.iter().copied(), column);
            let value = stats::mean(&values)
                .map(|m| format_number(m, self.decimals))
                .unwrap_or_else(|| "sem dados".to_string());
            lines.push(format!("{}: {}", column, value));
        }
        lines.join("\n")
    }

    fn help(&self, index: &DatasetIndex) -> String {
        let mut message = String::from("Não entendi a pergunta. Exemplos do que posso responder:");
        for example in lexicon::EXAMPLE_QUESTIONS {
            message.push_str("\n- ");
            message.push_str(example);
        }
        message.push_str(&format!(
            "\nColunas numéricas: {}",
            list_or_none(index.numeric_columns())
        ));
        message
    }

    /// Resolves `token` to a numeric column, or the message explaining why it cannot.
    fn numeric_column(&self, token: &str, index: &DatasetIndex) -> Result<String, String> {
        match ColumnResolver::new(index).resolve_numeric(token) {
            NumericLookup::Numeric(column) => Ok(column),
            NumericLookup::NotNumeric(column) => Err(format!(
                "A coluna '{}' não é numérica.\nColunas numéricas: {}",
                column,
                list_or_none(index.numeric_columns())
            )),
            NumericLookup::NotFound { token, suggestions } => {
                if suggestions.is_empty() {
                    Err(format!("Coluna '{}' não encontrada.\nSugestões: nenhuma", token))
                } else {
                    Err(format!(
                        "Coluna '{}' não encontrada.\nVocê quis dizer: {}?",
                        token,
                        suggestions.join(", ")
                    ))
                }
            }
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "nenhuma".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::intent::Comparison;
    use crate::data::{ComparisonOp, Record};

    fn two_apples() -> DatasetIndex {
        DatasetIndex::new(
            vec![
                Record::from_pairs([("Quality", "good"), ("Size", "1.0")]),
                Record::from_pairs([("Quality", "bad"), ("Size", "2.0")]),
            ],
            30,
            0.6,
        )
    }

    #[test]
    fn test_count_by_label() {
        let answer = AnswerSynthesizer::default().synthesize(&QueryIntent::CountByLabel, &two_apples());
        assert_eq!(answer, "Total: 2\nBoas: 1\nRuins: 1");
    }

    #[test]
    fn test_mean_reports_spread() {
        let intent = QueryIntent::MeanOfColumn { column: "size".into() };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert_eq!(answer, "Média de Size: 1.500\nDesvio padrão: 0.500\nValores válidos: 2");
    }

    #[test]
    fn test_non_numeric_column_is_distinct() {
        let intent = QueryIntent::MeanOfColumn { column: "quality".into() };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert_eq!(answer, "A coluna 'Quality' não é numérica.\nColunas numéricas: Size");
    }

    #[test]
    fn test_unknown_column() {
        let intent = QueryIntent::MeanOfColumn { column: "flavor".into() };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert_eq!(answer, "Coluna 'flavor' não encontrada.\nSugestões: nenhuma");

        let intent = QueryIntent::MeanOfColumn { column: "sizes".into() };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert!(answer.ends_with("Você quis dizer: Size?"));
    }

    #[test]
    fn test_top_n() {
        let intent = QueryIntent::TopNByColumn { column: "size".into(), count: 1 };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert_eq!(answer, "Top 1 por Size:\n1. linha 2 (bad): 2.000");
    }

    #[test]
    fn test_filter_skips_unresolved_comparisons() {
        let filters = Comparisons::new(vec![
            Comparison { column: "size".into(), op: ComparisonOp::Gt, threshold: 1.5 },
            Comparison { column: "flavor".into(), op: ComparisonOp::Lt, threshold: 1.0 },
        ])
        .unwrap();
        let intent = QueryIntent::FilterByComparison { filters };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert_eq!(
            answer,
            "Filtros: Size > 1.500\nFiltros ignorados: flavor\nLinhas encontradas: 1 de 2\n- linha 2 (bad): Size=2.000"
        );
    }

    #[test]
    fn test_filter_with_no_matches() {
        let filters = Comparisons::new(vec![Comparison {
            column: "size".into(),
            op: ComparisonOp::Gt,
            threshold: 10.0,
        }])
        .unwrap();
        let intent = QueryIntent::FilterByComparison { filters };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert!(answer.ends_with("Nenhuma linha encontrada (0 resultados)."));
    }

    #[test]
    fn test_filter_without_resolvable_columns_is_help() {
        let filters = Comparisons::new(vec![Comparison {
            column: "flavor".into(),
            op: ComparisonOp::Gt,
            threshold: 1.0,
        }])
        .unwrap();
        let intent = QueryIntent::FilterByComparison { filters };
        let synthesizer = AnswerSynthesizer::default();
        assert_eq!(
            synthesizer.synthesize(&intent, &two_apples()),
            synthesizer.synthesize(&QueryIntent::Unrecognized, &two_apples())
        );
    }

    #[test]
    fn test_label_profile() {
        let intent = QueryIntent::LabelProfile { family: LabelFamily::Bad };
        let answer = AnswerSynthesizer::default().synthesize(&intent, &two_apples());
        assert_eq!(answer, "Perfil das maçãs ruins (1 amostras):\nSize: 2.000");

        let empty = DatasetIndex::new(vec![Record::from_pairs([("Size", "1")])], 30, 0.6);
        let answer = AnswerSynthesizer::default().synthesize(&intent, &empty);
        assert_eq!(answer, "Nenhuma amostra encontrada para o rótulo 'bad'.");
    }

    #[test]
    fn test_help_lists_numeric_columns() {
        let answer = AnswerSynthesizer::default().synthesize(&QueryIntent::Unrecognized, &two_apples());
        assert!(answer.starts_with("Não entendi a pergunta."));
        assert!(answer.ends_with("Colunas numéricas: Size"));
    }
}
