//! Checks and their verdicts.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ResultKind, inspection::quoted_list};
use crate::identifier::Id;

/// A requested check together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check")]
pub enum Check {
    NoBiasIntroducedFor {
        sensitive_columns: Vec<String>,
        min_allowed_relative_ratio_change: f64,
        max_allowed_probability_difference: f64,
    },
    NoIllegalFeatures {
        #[serde(default)]
        additional_illegal_feature_names: Vec<String>,
    },
    NoMissingEmbeddings {
        example_threshold: usize,
    },
}

impl Check {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::NoBiasIntroducedFor { .. } => ResultKind::NoBiasIntroducedFor,
            Self::NoIllegalFeatures { .. } => ResultKind::NoIllegalFeatures,
            Self::NoMissingEmbeddings { .. } => ResultKind::NoMissingEmbeddings,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBiasIntroducedFor {
                sensitive_columns, ..
            } => write!(f, "NoBiasIntroducedFor({})", quoted_list(sensitive_columns)),
            Self::NoIllegalFeatures {
                additional_illegal_feature_names,
            } => write!(
                f,
                "NoIllegalFeatures({})",
                quoted_list(additional_illegal_feature_names)
            ),
            Self::NoMissingEmbeddings { example_threshold } => {
                write!(f, "NoMissingEmbeddings({example_threshold})")
            }
        }
    }
}

/// Overall verdict of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    Success,
    Failure,
    /// The check did not run because an inspection it depends on has no result.
    SkippedDueToMissingInspectionResult,
}

impl CheckStatus {
    pub fn is_skipped(self) -> bool {
        self == Self::SkippedDueToMissingInspectionResult
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Success"),
            Self::Failure => f.write_str("Failure"),
            Self::SkippedDueToMissingInspectionResult => {
                f.write_str("SkippedDueToMissingInspectionResult")
            }
        }
    }
}

/// Before/after statistics of one value of a sensitive column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    pub sensitive_column_value: String,
    pub count_before: u64,
    pub count_after: u64,
    pub ratio_before: f64,
    pub ratio_after: f64,
    #[serde(default)]
    pub relative_ratio_change: f64,
    pub removal_probability: f64,
}

/// How an operator changed the distribution of one sensitive column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionChange {
    /// Relative ratio change of every value stays above the configured minimum.
    pub acceptable_change: bool,
    #[serde(default)]
    pub min_relative_ratio_change: f64,
    /// Removal probabilities of all values stay within the configured factor.
    pub acceptable_probability_difference: bool,
    #[serde(default)]
    pub max_probability_difference: f64,
    #[serde(default)]
    pub before_and_after: Vec<ValueChange>,
}

impl DistributionChange {
    /// A column is compliant only if both the ratio and the probability bound hold.
    pub fn is_compliant(&self) -> bool {
        self.acceptable_change && self.acceptable_probability_difference
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEmbeddingsInfo {
    #[serde(default)]
    pub missing_embeddings_examples: Vec<String>,
}

/// The kind-specific body of a check result, including the check parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check")]
pub enum CheckDetails {
    NoBiasIntroducedFor {
        sensitive_columns: Vec<String>,
        min_allowed_relative_ratio_change: f64,
        max_allowed_probability_difference: f64,
        #[serde(default)]
        bias_distribution_change: IndexMap<Id, IndexMap<String, DistributionChange>>,
    },
    NoIllegalFeatures {
        #[serde(default)]
        additional_illegal_feature_names: Vec<String>,
        #[serde(default)]
        illegal_features: Vec<String>,
    },
    NoMissingEmbeddings {
        example_threshold: usize,
        #[serde(default)]
        dag_node_to_missing_embeddings: IndexMap<Id, MissingEmbeddingsInfo>,
    },
}

/// Verdict of one check for a whole execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    status: CheckStatus,
    #[serde(default)]
    description: Option<String>,
    #[serde(flatten)]
    details: CheckDetails,
}

impl CheckResult {
    pub fn new(status: CheckStatus, details: CheckDetails) -> Self {
        Self {
            status,
            description: None,
            details,
        }
    }

    /// Sets the human readable description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn details(&self) -> &CheckDetails {
        &self.details
    }

    /// The check (with parameters) that produced this result.
    pub fn check(&self) -> Check {
        match &self.details {
            CheckDetails::NoBiasIntroducedFor {
                sensitive_columns,
                min_allowed_relative_ratio_change,
                max_allowed_probability_difference,
                ..
            } => Check::NoBiasIntroducedFor {
                sensitive_columns: sensitive_columns.clone(),
                min_allowed_relative_ratio_change: *min_allowed_relative_ratio_change,
                max_allowed_probability_difference: *max_allowed_probability_difference,
            },
            CheckDetails::NoIllegalFeatures {
                additional_illegal_feature_names,
                ..
            } => Check::NoIllegalFeatures {
                additional_illegal_feature_names: additional_illegal_feature_names.clone(),
            },
            CheckDetails::NoMissingEmbeddings {
                example_threshold, ..
            } => Check::NoMissingEmbeddings {
                example_threshold: *example_threshold,
            },
        }
    }

    pub fn kind(&self) -> ResultKind {
        match &self.details {
            CheckDetails::NoBiasIntroducedFor { .. } => ResultKind::NoBiasIntroducedFor,
            CheckDetails::NoIllegalFeatures { .. } => ResultKind::NoIllegalFeatures,
            CheckDetails::NoMissingEmbeddings { .. } => ResultKind::NoMissingEmbeddings,
        }
    }
}
