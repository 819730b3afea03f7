//! Projection of execution results onto one selected node.
//!
//! [`project_details`] turns the inspection and check results of an epoch
//! into display payloads for a single node. Payloads carry plain data (tables,
//! bar charts, strings); rendering them is left to the front end.

use log::{debug, trace};
use serde::Serialize;

use dagscope_core::{
    identifier::Id,
    semantic::{
        CheckDetails, CheckResult, DagNode, Distribution, DistributionChange, EnabledKinds,
        InspectionResult, Table, ValueChange,
    },
};

use crate::structure::Dag;

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Text shown when hovering the bar.
    pub hover: String,
}

/// A named group of bars. Grouped charts have one series per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    fn single(title: String, name: &str, bars: Vec<Bar>) -> Self {
        Self {
            title,
            series: vec![BarSeries {
                name: name.to_string(),
                bars,
            }],
        }
    }
}

/// Display-ready result of one inspection or check for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum DisplayPayload {
    /// Sampled rows of the node and of its direct inputs.
    RowTables {
        title: String,
        /// Tables of the direct predecessors that have one, in predecessor order.
        inputs: Vec<(Id, Table)>,
        output: Table,
    },
    /// One value distribution chart per tracked column.
    Histograms { title: String, charts: Vec<BarChart> },
    /// Per sensitive column a before/after count chart and a removal probability chart.
    BiasCharts { title: String, charts: Vec<BarChart> },
    MissingEmbeddings {
        title: String,
        examples: Vec<String>,
    },
}

impl DisplayPayload {
    pub fn title(&self) -> &str {
        match self {
            Self::RowTables { title, .. }
            | Self::Histograms { title, .. }
            | Self::BiasCharts { title, .. }
            | Self::MissingEmbeddings { title, .. } => title,
        }
    }
}

/// Header line of the details view of `node`.
pub fn details_header(node: &DagNode) -> String {
    format!(
        "Details: Operator '{}', Line {}",
        node.operator().long_name(),
        node.code_reference().lineno()
    )
}

/// Builds the display payloads of `node` for every enabled result kind.
///
/// Inspections come first, then checks, each in result-set order. Kinds that
/// are not enabled or that recorded nothing for the node are skipped.
/// `NoIllegalFeatures` results apply to the whole pipeline and never produce
/// a per-node payload.
pub fn project_details(
    node: Id,
    enabled: &EnabledKinds,
    dag: &Dag,
    inspections: &[InspectionResult],
    checks: &[CheckResult],
) -> Vec<DisplayPayload> {
    let mut payloads = Vec::new();

    for result in inspections {
        if !enabled.contains(result.kind()) {
            trace!(kind:% = result.kind(); "Inspection not enabled");
            continue;
        }
        let title = result.inspection().to_string();
        let payload = match result {
            InspectionResult::RowLineage { annotations, .. }
            | InspectionResult::MaterializeFirstOutputRows { annotations, .. } => {
                annotations.get(&node).map(|output| {
                    let inputs = dag
                        .predecessors(node)
                        .into_iter()
                        .filter_map(|input| {
                            annotations.get(&input).map(|table| (input, table.clone()))
                        })
                        .collect();
                    DisplayPayload::RowTables {
                        title,
                        inputs,
                        output: output.clone(),
                    }
                })
            }
            InspectionResult::HistogramForColumns { annotations, .. } => {
                annotations.get(&node).map(|columns| DisplayPayload::Histograms {
                    title,
                    charts: columns
                        .iter()
                        .map(|(column, distribution)| distribution_chart(column, distribution))
                        .collect(),
                })
            }
        };
        payloads.extend(payload);
    }

    for result in checks {
        if !enabled.contains(result.kind()) {
            trace!(kind:% = result.kind(); "Check not enabled");
            continue;
        }
        let payload = match result.details() {
            CheckDetails::NoBiasIntroducedFor {
                bias_distribution_change,
                ..
            } => bias_distribution_change
                .get(&node)
                .map(|columns| DisplayPayload::BiasCharts {
                    title: result.check().to_string(),
                    charts: columns
                        .iter()
                        .flat_map(|(column, change)| {
                            [change_chart(column, change), removal_chart(column, change)]
                        })
                        .collect(),
                }),
            CheckDetails::NoIllegalFeatures { .. } => None,
            CheckDetails::NoMissingEmbeddings {
                dag_node_to_missing_embeddings,
                ..
            } => dag_node_to_missing_embeddings.get(&node).map(|info| {
                DisplayPayload::MissingEmbeddings {
                    title: result.check().to_string(),
                    examples: info.missing_embeddings_examples.clone(),
                }
            }),
        };
        payloads.extend(payload);
    }

    debug!(node:% = node, payloads = payloads.len(); "Details projected");
    payloads
}

fn distribution_chart(column: &str, distribution: &Distribution) -> BarChart {
    let bars = distribution
        .iter()
        .map(|(value, count)| Bar {
            label: value.clone(),
            value: *count as f64,
            hover: count.to_string(),
        })
        .collect();
    BarChart::single(format!("Column '{column}' Distribution"), "count", bars)
}

fn change_chart(column: &str, change: &DistributionChange) -> BarChart {
    let series = |name: &str, pick: fn(&ValueChange) -> (u64, f64)| {
        BarSeries {
            name: name.to_string(),
            bars: change
                .before_and_after
                .iter()
                .map(|row| {
                    let (count, ratio) = pick(row);
                    Bar {
                        label: row.sensitive_column_value.clone(),
                        value: count as f64,
                        hover: format!("{ratio:.2}"),
                    }
                })
                .collect(),
        }
    };

    BarChart {
        title: format!("Column '{column}' Distribution Change"),
        series: vec![
            series("before", |row| (row.count_before, row.ratio_before)),
            series("after", |row| (row.count_after, row.ratio_after)),
        ],
    }
}

fn removal_chart(column: &str, change: &DistributionChange) -> BarChart {
    let bars = change
        .before_and_after
        .iter()
        .map(|row| Bar {
            label: row.sensitive_column_value.clone(),
            value: row.removal_probability,
            hover: format!("{:.2}", row.removal_probability),
        })
        .collect();
    BarChart::single(
        format!("Column '{column}' Removal Probabilities"),
        "removal_probability",
        bars,
    )
}
