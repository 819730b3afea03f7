//! The result of one pipeline execution, as handed over by an inspection engine.

use serde::{Deserialize, Serialize};

use super::{CheckResult, DagNode, InspectionResult, Table};
use crate::identifier::Id;

/// Nodes and directed edges of the extracted DAG.
///
/// Edges point from producer to consumer. Their order is meaningful: the
/// predecessors of a node are reported in the order their edges appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagSpec {
    pub nodes: Vec<DagNode>,
    #[serde(default)]
    pub edges: Vec<(Id, Id)>,
}

/// Everything an inspection engine returns for one execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub dag: DagSpec,
    #[serde(default)]
    pub inspections: Vec<InspectionResult>,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
    /// Captured standard output of the pipeline run.
    #[serde(default)]
    pub pipeline_output: String,
}

impl ExecutionResult {
    pub fn new(dag: DagSpec) -> Self {
        Self {
            dag,
            ..Self::default()
        }
    }

    /// Returns the sampled rows recorded for `node`, preferring row lineage over
    /// materialized output rows.
    pub fn row_table(&self, node: Id) -> Option<&Table> {
        self.inspections
            .iter()
            .find_map(|inspection| inspection.row_table(node))
    }
}
