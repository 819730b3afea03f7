//! Inspections and the per-node annotations they produce.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ResultKind, Table};
use crate::identifier::Id;

/// Value distribution of one column: value -> count, in engine order.
pub type Distribution = IndexMap<String, u64>;

/// A requested inspection together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "inspection")]
pub enum Inspection {
    HistogramForColumns { columns: Vec<String> },
    RowLineage { row_count: usize },
    MaterializeFirstOutputRows { row_count: usize },
}

impl Inspection {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::HistogramForColumns { .. } => ResultKind::HistogramForColumns,
            Self::RowLineage { .. } => ResultKind::RowLineage,
            Self::MaterializeFirstOutputRows { .. } => ResultKind::MaterializeFirstOutputRows,
        }
    }
}

/// Formats a list of column names as a bracketed, quoted list: `['a', 'b']`.
pub(crate) fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HistogramForColumns { columns } => {
                write!(f, "HistogramForColumns({})", quoted_list(columns))
            }
            Self::RowLineage { row_count } => write!(f, "RowLineage({row_count})"),
            Self::MaterializeFirstOutputRows { row_count } => {
                write!(f, "MaterializeFirstOutputRows({row_count})")
            }
        }
    }
}

/// The annotations one inspection attached to the DAG nodes.
///
/// One variant per inspection kind, carrying the inspection parameters and
/// the per-node values. A node missing from `annotations` simply has no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "inspection")]
pub enum InspectionResult {
    HistogramForColumns {
        columns: Vec<String>,
        annotations: IndexMap<Id, IndexMap<String, Distribution>>,
    },
    RowLineage {
        row_count: usize,
        annotations: IndexMap<Id, Table>,
    },
    MaterializeFirstOutputRows {
        row_count: usize,
        annotations: IndexMap<Id, Table>,
    },
}

impl InspectionResult {
    /// The inspection (with parameters) that produced this result.
    pub fn inspection(&self) -> Inspection {
        match self {
            Self::HistogramForColumns { columns, .. } => Inspection::HistogramForColumns {
                columns: columns.clone(),
            },
            Self::RowLineage { row_count, .. } => Inspection::RowLineage {
                row_count: *row_count,
            },
            Self::MaterializeFirstOutputRows { row_count, .. } => {
                Inspection::MaterializeFirstOutputRows {
                    row_count: *row_count,
                }
            }
        }
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            Self::HistogramForColumns { .. } => ResultKind::HistogramForColumns,
            Self::RowLineage { .. } => ResultKind::RowLineage,
            Self::MaterializeFirstOutputRows { .. } => ResultKind::MaterializeFirstOutputRows,
        }
    }

    /// Returns the sampled rows of a node, for row-sampling inspections.
    pub fn row_table(&self, node: Id) -> Option<&Table> {
        match self {
            Self::RowLineage { annotations, .. }
            | Self::MaterializeFirstOutputRows { annotations, .. } => annotations.get(&node),
            Self::HistogramForColumns { .. } => None,
        }
    }

    /// Returns the per-column distributions of a node, for histogram inspections.
    pub fn histograms(&self, node: Id) -> Option<&IndexMap<String, Distribution>> {
        match self {
            Self::HistogramForColumns { annotations, .. } => annotations.get(&node),
            Self::RowLineage { .. } | Self::MaterializeFirstOutputRows { .. } => None,
        }
    }

    /// Returns true if the inspection recorded anything for the node.
    pub fn contains_node(&self, node: Id) -> bool {
        match self {
            Self::HistogramForColumns { annotations, .. } => annotations.contains_key(&node),
            Self::RowLineage { annotations, .. }
            | Self::MaterializeFirstOutputRows { annotations, .. } => {
                annotations.contains_key(&node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        let histogram = Inspection::HistogramForColumns {
            columns: vec!["race".to_string(), "age_group".to_string()],
        };
        assert_eq!(histogram.to_string(), "HistogramForColumns(['race', 'age_group'])");
        assert_eq!(
            Inspection::RowLineage { row_count: 5 }.to_string(),
            "RowLineage(5)"
        );
    }

    #[test]
    fn test_deserialize_row_lineage() {
        let json = r#"{
            "inspection": "RowLineage",
            "row_count": 2,
            "annotations": {
                "0": {"columns": ["age"], "rows": [["23"], ["41"]]}
            }
        }"#;
        let result: InspectionResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.kind(), ResultKind::RowLineage);
        assert_eq!(result.inspection(), Inspection::RowLineage { row_count: 2 });
        let table = result.row_table(Id::new("0")).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert!(result.row_table(Id::new("1")).is_none());
        assert!(result.histograms(Id::new("0")).is_none());
    }

    #[test]
    fn test_histogram_lookup_keeps_value_order() {
        let json = r#"{
            "inspection": "HistogramForColumns",
            "columns": ["race"],
            "annotations": {"4": {"race": {"race3": 5, "race1": 2, "None": 1}}}
        }"#;
        let result: InspectionResult = serde_json::from_str(json).unwrap();
        let histograms = result.histograms(Id::new("4")).unwrap();
        let values: Vec<&String> = histograms["race"].keys().collect();

        assert_eq!(values, ["race3", "race1", "None"]);
        assert!(result.contains_node(Id::new("4")));
        assert!(!result.contains_node(Id::new("5")));
    }
}
