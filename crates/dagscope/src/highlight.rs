//! Problem node detection and highlighting.
//!
//! A node is a problem node if
//! - the bias check tracking exactly the requested sensitive columns found a
//!   column whose distribution change is not compliant at that node, or
//! - the missing embeddings check recorded at least one example there.
//!
//! Checks without a result, or whose result was skipped for a missing
//! inspection, contribute nothing. If several bias results track the
//! requested columns, the first one in result order is used.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use log::{debug, info};

use dagscope_core::{
    identifier::Id,
    semantic::{CheckDetails, CheckResult},
};

use crate::scene::{MarkerSeries, Scene};

/// Name of the highlight series holding the problem nodes.
pub const PROBLEM_SERIES: &str = "problem-nodes";

/// Distinct problem nodes, in the order they were first flagged.
///
/// Only the first bias result matching `sensitive_columns` is consulted.
pub fn problem_nodes(sensitive_columns: &[String], checks: &[CheckResult]) -> IndexSet<Id> {
    let requested: BTreeSet<&str> = sensitive_columns.iter().map(String::as_str).collect();
    let mut problems = IndexSet::new();

    let ran = || checks.iter().filter(|check| !check.status().is_skipped());

    let bias_report = ran().find_map(|check| match check.details() {
        CheckDetails::NoBiasIntroducedFor {
            sensitive_columns,
            bias_distribution_change,
            ..
        } if sensitive_columns
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            == requested =>
        {
            Some(bias_distribution_change)
        }
        _ => None,
    });
    match bias_report {
        Some(report) => {
            for (node, columns) in report {
                if columns.values().any(|change| !change.is_compliant()) {
                    problems.insert(*node);
                }
            }
        }
        None => debug!(columns:? = sensitive_columns; "No bias result for the sensitive columns"),
    }

    for check in ran() {
        if let CheckDetails::NoMissingEmbeddings {
            dag_node_to_missing_embeddings,
            ..
        } = check.details()
        {
            for (node, info) in dag_node_to_missing_embeddings {
                if !info.missing_embeddings_examples.is_empty() {
                    problems.insert(*node);
                }
            }
        }
    }

    problems
}

/// Returns `scene` with a [`PROBLEM_SERIES`] highlight series of all problem nodes.
///
/// A previous problem series is replaced, so applying this twice with the
/// same inputs gives the same scene.
pub fn highlight(scene: Scene, sensitive_columns: &[String], checks: &[CheckResult]) -> Scene {
    let problems = problem_nodes(sensitive_columns, checks);

    let mut series = MarkerSeries::new(PROBLEM_SERIES);
    for node in &problems {
        match scene.marker(*node) {
            Some(marker) => series.push(marker.clone()),
            None => debug!(node:% = node; "Problem node not in scene"),
        }
    }

    info!(problem_nodes = series.len(); "Problem nodes highlighted");
    scene.with_highlight(series)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use dagscope_core::semantic::{
        CheckStatus, CodeReference, DagNode, DistributionChange, MissingEmbeddingsInfo,
        OperatorType,
    };

    use super::*;
    use crate::{
        config::LayoutConfig, draw::EdgeCurveParams, layout::compute_layout, scene::build_scene,
        structure::Dag,
    };

    fn change(acceptable_change: bool, acceptable_probability_difference: bool) -> DistributionChange {
        DistributionChange {
            acceptable_change,
            min_relative_ratio_change: 0.0,
            acceptable_probability_difference,
            max_probability_difference: 1.0,
            before_and_after: Vec::new(),
        }
    }

    fn bias_result(columns: &[&str], report: &[(&str, &[(&str, bool, bool)])]) -> CheckResult {
        let bias_distribution_change = report
            .iter()
            .map(|(node, entries)| {
                let columns: IndexMap<String, DistributionChange> = entries
                    .iter()
                    .map(|(column, ratio_ok, probability_ok)| {
                        (column.to_string(), change(*ratio_ok, *probability_ok))
                    })
                    .collect();
                (Id::new(node), columns)
            })
            .collect();
        CheckResult::new(
            CheckStatus::Failure,
            CheckDetails::NoBiasIntroducedFor {
                sensitive_columns: columns.iter().map(|c| c.to_string()).collect(),
                min_allowed_relative_ratio_change: -0.3,
                max_allowed_probability_difference: 2.0,
                bias_distribution_change,
            },
        )
    }

    fn embeddings_result(report: &[(&str, &[&str])]) -> CheckResult {
        CheckResult::new(
            CheckStatus::Failure,
            CheckDetails::NoMissingEmbeddings {
                example_threshold: 10,
                dag_node_to_missing_embeddings: report
                    .iter()
                    .map(|(node, examples)| {
                        (
                            Id::new(node),
                            MissingEmbeddingsInfo {
                                missing_embeddings_examples: examples
                                    .iter()
                                    .map(|e| e.to_string())
                                    .collect(),
                            },
                        )
                    })
                    .collect(),
            },
        )
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_node_failing_several_columns_is_flagged_once() {
        let checks = vec![bias_result(
            &["race", "age_group"],
            &[
                ("n1", &[("race", false, true), ("age_group", true, false)]),
                ("n2", &[("race", true, true), ("age_group", true, true)]),
            ],
        )];

        let problems = problem_nodes(&columns(&["race", "age_group"]), &checks);
        assert_eq!(problems.into_iter().collect::<Vec<_>>(), vec![Id::new("n1")]);
    }

    #[test]
    fn test_bias_result_is_matched_as_set() {
        let checks = vec![bias_result(&["race", "age_group"], &[("n1", &[("race", false, false)])])];

        assert_eq!(problem_nodes(&columns(&["age_group", "race"]), &checks).len(), 1);
        assert!(problem_nodes(&columns(&["race"]), &checks).is_empty());
    }

    #[test]
    fn test_missing_embeddings_flag_non_empty_lists_only() {
        let checks = vec![embeddings_result(&[("empty", &[]), ("full", &["Cooper"])])];

        let problems = problem_nodes(&[], &checks);
        assert!(problems.contains(&Id::new("full")));
        assert!(!problems.contains(&Id::new("empty")));
    }

    #[test]
    fn test_node_flagged_by_both_checks_appears_once() {
        let checks = vec![
            bias_result(&["race"], &[("shared", &[("race", false, true)])]),
            embeddings_result(&[("shared", &["Rogers"]), ("other", &["Smith"])]),
        ];

        let problems = problem_nodes(&columns(&["race"]), &checks);
        assert_eq!(
            problems.into_iter().collect::<Vec<_>>(),
            vec![Id::new("shared"), Id::new("other")]
        );
    }

    #[test]
    fn test_first_matching_bias_result_wins() {
        let checks = vec![
            bias_result(&["race"], &[("first", &[("race", false, true)])]),
            bias_result(&["race"], &[("second", &[("race", false, false)])]),
        ];

        let problems = problem_nodes(&columns(&["race"]), &checks);
        assert_eq!(problems.into_iter().collect::<Vec<_>>(), vec![Id::new("first")]);
    }

    #[test]
    fn test_skipped_results_flag_nothing() {
        let skipped = |result: CheckResult| {
            CheckResult::new(
                CheckStatus::SkippedDueToMissingInspectionResult,
                result.details().clone(),
            )
        };
        let checks = vec![
            skipped(bias_result(&["race"], &[("stale", &[("race", false, false)])])),
            skipped(embeddings_result(&[("stale", &["Cooper"])])),
            bias_result(&["race"], &[("fresh", &[("race", true, false)])]),
        ];

        let problems = problem_nodes(&columns(&["race"]), &checks);
        assert_eq!(problems.into_iter().collect::<Vec<_>>(), vec![Id::new("fresh")]);
    }

    #[test]
    fn test_no_results_is_a_no_op() {
        assert!(problem_nodes(&columns(&["race"]), &[]).is_empty());
    }

    #[test]
    fn test_highlight_appends_one_series() {
        let dag = Dag::new(
            [
                DagNode::new(Id::new("n1"), OperatorType::DataSource, CodeReference::new(1)),
                DagNode::new(Id::new("n2"), OperatorType::Selection, CodeReference::new(2)),
            ],
            [(Id::new("n1"), Id::new("n2"))],
        )
        .unwrap();
        let positions = compute_layout(&dag, &LayoutConfig::default()).unwrap();
        let scene = build_scene(&dag, &positions, &EdgeCurveParams::default());
        let checks = vec![embeddings_result(&[("n2", &["x"])])];

        let highlighted = highlight(scene.clone(), &[], &checks);

        assert_eq!(highlighted.highlights().len(), 1);
        assert_eq!(highlighted.highlights()[0].name(), PROBLEM_SERIES);
        assert_eq!(
            highlighted.highlights()[0].nodes().collect::<Vec<_>>(),
            vec![Id::new("n2")]
        );
        assert_eq!(highlighted.node_markers(), scene.node_markers());
    }
}
