//! Pipeline-wide overview of check results.

use dagscope_core::semantic::{CheckResult, Table};

/// Column names of the summary table.
pub const SUMMARY_COLUMNS: [&str; 3] = ["check_name", "status", "description"];

/// One row per check result, in result-set order.
///
/// The check name is the display form of the check with its parameters. A
/// result without description gets an empty cell.
pub fn summarize(checks: &[CheckResult]) -> Table {
    let mut table = Table::new(SUMMARY_COLUMNS);
    for result in checks {
        table.push_row([
            result.check().to_string(),
            result.status().to_string(),
            result.description().unwrap_or_default().to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use dagscope_core::semantic::{CheckDetails, CheckStatus};

    use super::*;

    #[test]
    fn test_one_row_per_check() {
        let checks = vec![
            CheckResult::new(
                CheckStatus::Failure,
                CheckDetails::NoIllegalFeatures {
                    additional_illegal_feature_names: vec!["income".to_string()],
                    illegal_features: vec!["race".to_string()],
                },
            )
            .with_description("Used illegal columns: ['race']"),
            CheckResult::new(
                CheckStatus::Success,
                CheckDetails::NoMissingEmbeddings {
                    example_threshold: 10,
                    dag_node_to_missing_embeddings: Default::default(),
                },
            ),
        ];

        let table = summarize(&checks);

        assert_eq!(table.columns(), SUMMARY_COLUMNS);
        assert_eq!(
            table.rows(),
            [
                vec![
                    "NoIllegalFeatures(['income'])".to_string(),
                    "Failure".to_string(),
                    "Used illegal columns: ['race']".to_string(),
                ],
                vec![
                    "NoMissingEmbeddings(10)".to_string(),
                    "Success".to_string(),
                    String::new(),
                ],
            ]
        );
    }

    #[test]
    fn test_skipped_check_keeps_its_row() {
        let checks = vec![CheckResult::new(
            CheckStatus::SkippedDueToMissingInspectionResult,
            CheckDetails::NoBiasIntroducedFor {
                sensitive_columns: vec!["race".to_string()],
                min_allowed_relative_ratio_change: -0.3,
                max_allowed_probability_difference: 2.0,
                bias_distribution_change: Default::default(),
            },
        )];

        let table = summarize(&checks);

        assert_eq!(
            table.rows(),
            [vec![
                "NoBiasIntroducedFor(['race'])".to_string(),
                "SkippedDueToMissingInspectionResult".to_string(),
                String::new(),
            ]]
        );
    }

    #[test]
    fn test_no_checks_gives_header_only() {
        let table = summarize(&[]);
        assert_eq!(table.columns().len(), 3);
        assert!(table.rows().is_empty());
    }
}
