//! Data Module Tests
//!
//! Tests for record coercion, dataset indexing, column resolution and statistics
//! over a realistic apple dataset.

use super::orchard;
use crate::data::columns::COLUMN_ALIASES;
use crate::data::stats::{self, filter_rows, rank_descending};
use crate::data::{
    CellValue, ColumnFilter, ColumnResolution, ColumnResolver, ComparisonOp, DatasetIndex,
    LabelFamily, NumericLookup, Record,
};
use serde_json::json;

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn test_json_rows_are_coerced() {
        let rows = vec![
            json!({" Size ": "1.5", "Weight": 2, "Quality": "good", "Note": null}),
            json!({" Size ": "abc", "Weight": "3,5", "Quality": "bad", "Note": "x"}),
        ];
        let rows: Vec<_> = rows
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        let index = DatasetIndex::from_json_rows(&rows, 30, 0.6);

        let first = &index.records()[0];
        assert_eq!(first.get("Size"), Some(&CellValue::Number(1.5)));
        assert_eq!(first.get("Weight"), Some(&CellValue::Number(2.0)));
        assert_eq!(first.get("Note"), Some(&CellValue::Missing));

        let second = &index.records()[1];
        assert_eq!(second.get("Size"), Some(&CellValue::Text("abc".into())));
        // Only a clean float parse counts as a number
        assert_eq!(second.get("Weight"), Some(&CellValue::Text("3,5".into())));
    }

    #[test]
    fn test_column_names_are_trimmed() {
        let record = Record::from_pairs([("  Acidity\t", "0.5")]);
        assert_eq!(record.number("Acidity"), Some(0.5));
    }
}

#[cfg(test)]
mod index_tests {
    use super::*;

    #[test]
    fn test_numeric_columns_subset_of_columns() {
        let index = orchard();
        for column in index.numeric_columns() {
            assert!(index.has_column(column));
        }
        assert!(!index.is_numeric("Quality"));
        assert_eq!(index.numeric_columns().len(), 8);
    }

    #[test]
    fn test_label_counts() {
        let index = orchard();
        assert_eq!(index.count_label(LabelFamily::Good), 5);
        assert_eq!(index.count_label(LabelFamily::Bad), 3);
    }

    #[test]
    fn test_labels_match_by_substring() {
        let index = DatasetIndex::new(
            vec![
                Record::from_pairs([("Quality", "Good apple")]),
                Record::from_pairs([("Quality", "muito ruim")]),
                Record::from_pairs([("Quality", "")]),
            ],
            30,
            0.6,
        );
        assert_eq!(index.count_label(LabelFamily::Good), 1);
        assert_eq!(index.count_label(LabelFamily::Bad), 1);
    }

    #[test]
    fn test_dataset_without_label_column() {
        let index = DatasetIndex::new(vec![Record::from_pairs([("Size", "1")])], 30, 0.6);
        assert_eq!(index.label_column(), None);
        assert_eq!(index.count_label(LabelFamily::Good), 0);
        assert_eq!(index.row_label(0), "linha 1");
    }
}

#[cfg(test)]
mod resolver_tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves_in_full_dataset() {
        let index = orchard();
        let resolver = ColumnResolver::new(&index);

        for (alias, canonical) in COLUMN_ALIASES {
            assert_eq!(
                resolver.resolve(alias),
                ColumnResolution::Found(canonical.to_string()),
                "alias '{}'",
                alias
            );
        }
    }

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        let index = orchard();
        let resolver = ColumnResolver::new(&index);

        assert_eq!(resolver.resolve("SuCuLêNcIa"), ColumnResolution::Found("Juiciness".into()));
        assert_eq!(resolver.resolve("ACIDEZ!"), ColumnResolution::Found("Acidity".into()));
    }

    #[test]
    fn test_unknown_versus_non_numeric() {
        let index = orchard();
        let resolver = ColumnResolver::new(&index);

        assert_eq!(
            resolver.resolve_numeric("qualidade"),
            NumericLookup::NotNumeric("Quality".into())
        );
        assert_eq!(
            resolver.resolve_numeric("cor"),
            NumericLookup::NotFound {
                token: "cor".into(),
                suggestions: vec![]
            }
        );
    }

    #[test]
    fn test_suggestions_use_three_letter_prefix() {
        let index = orchard();
        let resolver = ColumnResolver::new(&index);

        match resolver.resolve("ripe") {
            ColumnResolution::NotFound { suggestions, .. } => {
                assert_eq!(suggestions, vec!["Ripeness".to_string()])
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    fn gt(column: &str, threshold: f64) -> ColumnFilter {
        ColumnFilter {
            column: column.to_string(),
            op: ComparisonOp::Gt,
            threshold,
        }
    }

    #[test]
    fn test_filter_count_matches_brute_force() {
        let index = orchard();
        let filters = vec![gt("Weight", -1.5), gt("Sweetness", -2.0)];

        let expected = index
            .records()
            .iter()
            .filter(|r| {
                r.number("Weight").is_some_and(|v| v > -1.5)
                    && r.number("Sweetness").is_some_and(|v| v > -2.0)
            })
            .count();
        assert_eq!(filter_rows(index.records(), &filters).len(), expected);
        assert_eq!(expected, 4);
    }

    #[test]
    fn test_widening_threshold_never_shrinks() {
        let index = orchard();
        let mut previous = 0;
        for threshold in [2.0, 1.0, 0.0, -1.0, -2.0, -3.0, -4.0] {
            let count = filter_rows(index.records(), &[gt("Size", threshold)]).len();
            assert!(count >= previous, "threshold {}", threshold);
            previous = count;
        }
        assert_eq!(previous, index.len());
    }

    #[test]
    fn test_ranking_is_non_increasing() {
        let index = orchard();
        let order = rank_descending(index.records(), "Acidity");
        assert_eq!(order.len(), index.len());

        let values: Vec<f64> = order
            .iter()
            .map(|i| index.records()[*i].number("Acidity").unwrap_or(0.0))
            .collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_label_profile_mean() {
        let index = orchard();
        let bad = index.rows_with_label(LabelFamily::Bad);
        let sizes = stats::numeric_values(bad.iter().copied(), "Size");
        let mean = stats::mean(&sizes).unwrap();
        assert!((mean - (-0.29 + 1.36 + 1.33) / 3.0).abs() < 1e-9);
    }
}
