//! DAG node model: operator type, source provenance and description.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// The kind of pipeline operator a DAG node stands for.
///
/// Every variant has a long display form used in tooltips and detail headers
/// and a short form drawn on the node marker itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorType {
    DataSource,
    MissingOperation,
    Selection,
    Projection,
    ProjectionModify,
    Transformer,
    Concatenation,
    Estimator,
    Score,
    TrainData,
    TrainLabels,
    TestData,
    TestLabels,
    Join,
    GroupByAgg,
    TrainTestSplit,
}

impl OperatorType {
    /// Long, human readable form, e.g. `"Projection (Modify)"`.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::DataSource => "Data Source",
            Self::MissingOperation => "Encountered unsupported operation! Fallback: Data Source",
            Self::Selection => "Selection",
            Self::Projection => "Projection",
            Self::ProjectionModify => "Projection (Modify)",
            Self::Transformer => "Transformer",
            Self::Concatenation => "Concatenation",
            Self::Estimator => "Estimator",
            Self::Score => "Score",
            Self::TrainData => "Train Data",
            Self::TrainLabels => "Train Labels",
            Self::TestData => "Test Data",
            Self::TestLabels => "Test Labels",
            Self::Join => "Join",
            Self::GroupByAgg => "Groupby and Aggregate",
            Self::TrainTestSplit => "Train Test Split",
        }
    }

    /// Short symbol drawn inside the node marker, e.g. `"σ"` for a selection.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::DataSource => "⊞",
            Self::MissingOperation => "⚠",
            Self::Selection => "σ",
            Self::Projection => "π",
            Self::ProjectionModify => "π'",
            Self::Transformer => "𝑓",
            Self::Concatenation => "+",
            Self::Estimator => "𝑔",
            Self::Score => "✓",
            Self::TrainData => "X",
            Self::TrainLabels => "y",
            Self::TestData => "X'",
            Self::TestLabels => "y'",
            Self::Join => "⋈",
            Self::GroupByAgg => "Γ",
            Self::TrainTestSplit => "÷",
        }
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// Column span of a code reference. Lines and columns are as reported by the
/// engine's source parser (lines 1-based, columns 0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub col_offset: u32,
    pub end_lineno: u32,
    pub end_col_offset: u32,
}

/// Location of the pipeline source code that created a DAG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeReference {
    lineno: u32,
    #[serde(flatten)]
    span: Option<ColumnSpan>,
}

impl CodeReference {
    /// Creates a code reference pointing at a whole line.
    pub fn new(lineno: u32) -> Self {
        Self { lineno, span: None }
    }

    /// Attaches a column span (builder style).
    pub fn with_span(mut self, span: ColumnSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn lineno(&self) -> u32 {
        self.lineno
    }

    pub fn span(&self) -> Option<ColumnSpan> {
        self.span
    }
}

/// One operator instance of an executed pipeline.
///
/// Nodes are owned by the execution result and never mutated by Dagscope.
/// Identity is the [`Id`]: two nodes with the same id are the same node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagNode {
    id: Id,
    #[serde(rename = "operator_type")]
    operator: OperatorType,
    code_reference: CodeReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl DagNode {
    /// Creates a new DAG node.
    ///
    /// # Arguments
    ///
    /// * `id` - Engine-assigned node identity
    /// * `operator` - The operator type of this node
    /// * `code_reference` - Where in the pipeline source this node was created
    pub fn new(id: Id, operator: OperatorType, code_reference: CodeReference) -> Self {
        Self {
            id,
            operator,
            code_reference,
            description: None,
        }
    }

    /// Sets the free-text description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn operator(&self) -> OperatorType {
        self.operator
    }

    pub fn code_reference(&self) -> CodeReference {
        self.code_reference
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Multi-line tooltip text: operator, source line and description.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dagscope_core::{identifier::Id, semantic::{CodeReference, DagNode, OperatorType}};
    /// let node = DagNode::new(Id::new("3"), OperatorType::Selection, CodeReference::new(21))
    ///     .with_description("Select by Series: data[data['county'].isin(...)]");
    ///
    /// assert_eq!(
    ///     node.label(),
    ///     "Selection (L21)\nSelect by Series: data[data['county'].isin(...)]"
    /// );
    /// ```
    pub fn label(&self) -> String {
        let header = format!(
            "{} (L{})",
            self.operator.long_name(),
            self.code_reference.lineno()
        );
        match self.description() {
            Some(description) if !description.is_empty() => format!("{header}\n{description}"),
            _ => header,
        }
    }
}
