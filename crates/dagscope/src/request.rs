//! What to run: the pipeline plus the inspections and checks to attach.
//!
//! [`InspectorForm`] mirrors the raw state of the inspector controls, where
//! every numeric field may be left empty. [`InspectorForm::to_request`]
//! normalizes it into an [`ExecutionRequest`] with all defaults filled in.

use log::debug;
use serde::{Deserialize, Serialize};

use dagscope_core::semantic::{Check, EnabledKinds, Inspection};

/// Rows sampled per node when no row count was entered.
pub const DEFAULT_ROW_COUNT: usize = 5;
/// Lowest accepted relative ratio change, in percent.
pub const DEFAULT_RATIO_THRESHOLD_PERCENT: f64 = -30.0;
/// Highest accepted removal probability factor, in percent.
pub const DEFAULT_PROBABILITY_THRESHOLD_PERCENT: f64 = 200.0;
/// Missing embedding examples kept per node when no threshold was entered.
pub const DEFAULT_EXAMPLE_THRESHOLD: usize = 10;

/// Raw inspector control state. `None` and zero both mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorForm {
    pub pipeline: String,

    pub histogram_for_columns: bool,
    pub histogram_columns: Vec<String>,

    pub row_lineage: bool,
    pub row_lineage_rows: Option<usize>,

    pub materialize_first_output_rows: bool,
    pub materialize_rows: Option<usize>,

    pub no_bias_introduced: bool,
    pub sensitive_columns: Vec<String>,
    pub ratio_threshold_percent: Option<f64>,
    pub probability_threshold_percent: Option<f64>,

    pub no_illegal_features: bool,
    /// Comma separated feature names.
    pub additional_illegal_features: Option<String>,

    pub no_missing_embeddings: bool,
    pub missing_embeddings_threshold: Option<usize>,
}

impl InspectorForm {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            ..Self::default()
        }
    }

    /// Normalizes the form into a request.
    ///
    /// Row lineage already shows the output rows, so when both row sampling
    /// inspections are enabled only `RowLineage` is requested, with the larger
    /// of the two row counts.
    pub fn to_request(&self) -> ExecutionRequest {
        let mut request = ExecutionRequest::new(&self.pipeline);

        if self.histogram_for_columns {
            request = request.with_inspection(Inspection::HistogramForColumns {
                columns: self.histogram_columns.clone(),
            });
        }

        let lineage_rows = non_zero(self.row_lineage_rows).unwrap_or(DEFAULT_ROW_COUNT);
        let materialize_rows = non_zero(self.materialize_rows).unwrap_or(DEFAULT_ROW_COUNT);
        if self.row_lineage {
            let row_count = if self.materialize_first_output_rows {
                lineage_rows.max(materialize_rows)
            } else {
                lineage_rows
            };
            request = request.with_inspection(Inspection::RowLineage { row_count });
        } else if self.materialize_first_output_rows {
            request = request.with_inspection(Inspection::MaterializeFirstOutputRows {
                row_count: materialize_rows,
            });
        }

        if self.no_bias_introduced {
            request = request.with_check(Check::NoBiasIntroducedFor {
                sensitive_columns: self.sensitive_columns.clone(),
                min_allowed_relative_ratio_change: percent(
                    self.ratio_threshold_percent,
                    DEFAULT_RATIO_THRESHOLD_PERCENT,
                ),
                max_allowed_probability_difference: percent(
                    self.probability_threshold_percent,
                    DEFAULT_PROBABILITY_THRESHOLD_PERCENT,
                ),
            });
        }

        if self.no_illegal_features {
            request = request.with_check(Check::NoIllegalFeatures {
                additional_illegal_feature_names: self
                    .additional_illegal_features
                    .as_deref()
                    .map(split_names)
                    .unwrap_or_default(),
            });
        }

        if self.no_missing_embeddings {
            request = request.with_check(Check::NoMissingEmbeddings {
                example_threshold: non_zero(self.missing_embeddings_threshold)
                    .unwrap_or(DEFAULT_EXAMPLE_THRESHOLD),
            });
        }

        debug!(
            pipeline = request.pipeline(),
            inspections = request.inspections().len(),
            checks = request.checks().len();
            "Execution request normalized"
        );
        request
    }
}

fn non_zero(value: Option<usize>) -> Option<usize> {
    value.filter(|value| *value != 0)
}

fn percent(value: Option<f64>, default: f64) -> f64 {
    value.filter(|value| *value != 0.0).unwrap_or(default) / 100.0
}

fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// A pipeline together with the inspections and checks to run on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pipeline: String,
    #[serde(default)]
    inspections: Vec<Inspection>,
    #[serde(default)]
    checks: Vec<Check>,
}

impl ExecutionRequest {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            inspections: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn with_inspection(mut self, inspection: Inspection) -> Self {
        self.inspections.push(inspection);
        self
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn inspections(&self) -> &[Inspection] {
        &self.inspections
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Kinds of every requested inspection and check.
    pub fn enabled_kinds(&self) -> EnabledKinds {
        self.inspections
            .iter()
            .map(Inspection::kind)
            .chain(self.checks.iter().map(Check::kind))
            .collect()
    }

    /// Sensitive columns of the requested bias check, empty if there is none.
    pub fn sensitive_columns(&self) -> &[String] {
        self.checks
            .iter()
            .find_map(|check| match check {
                Check::NoBiasIntroducedFor {
                    sensitive_columns, ..
                } => Some(sensitive_columns.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }
}
