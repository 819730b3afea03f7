//! The closed set of inspection and check kinds.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every inspection and check kind Dagscope knows how to display.
///
/// The declaration order is the order payloads are presented in: inspections
/// first, then checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResultKind {
    HistogramForColumns,
    RowLineage,
    MaterializeFirstOutputRows,
    NoBiasIntroducedFor,
    NoIllegalFeatures,
    NoMissingEmbeddings,
}

impl ResultKind {
    /// All kinds in presentation order.
    pub const ALL: [ResultKind; 6] = [
        Self::HistogramForColumns,
        Self::RowLineage,
        Self::MaterializeFirstOutputRows,
        Self::NoBiasIntroducedFor,
        Self::NoIllegalFeatures,
        Self::NoMissingEmbeddings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::HistogramForColumns => "HistogramForColumns",
            Self::RowLineage => "RowLineage",
            Self::MaterializeFirstOutputRows => "MaterializeFirstOutputRows",
            Self::NoBiasIntroducedFor => "NoBiasIntroducedFor",
            Self::NoIllegalFeatures => "NoIllegalFeatures",
            Self::NoMissingEmbeddings => "NoMissingEmbeddings",
        }
    }

    /// Returns true for passive inspections, false for checks.
    pub fn is_inspection(self) -> bool {
        matches!(
            self,
            Self::HistogramForColumns | Self::RowLineage | Self::MaterializeFirstOutputRows
        )
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown inspection or check kind `{0}`")]
pub struct UnknownKindError(pub String);

impl FromStr for ResultKind {
    type Err = UnknownKindError;

    /// Parses a kind name. Matching ignores case, `_` and `-`, so
    /// `row_lineage`, `row-lineage` and `RowLineage` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_lowercase() == normalized)
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// The set of kinds a user currently has switched on.
///
/// # Examples
///
/// ```
/// # use dagscope_core::semantic::{EnabledKinds, ResultKind};
/// let enabled: EnabledKinds = [ResultKind::RowLineage, ResultKind::NoMissingEmbeddings]
///     .into_iter()
///     .collect();
///
/// assert!(enabled.contains(ResultKind::RowLineage));
/// assert!(!enabled.contains(ResultKind::HistogramForColumns));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledKinds(BTreeSet<ResultKind>);

impl EnabledKinds {
    /// No kind enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every kind enabled.
    pub fn all() -> Self {
        ResultKind::ALL.into_iter().collect()
    }

    /// Adds a kind (builder style).
    pub fn with(mut self, kind: ResultKind) -> Self {
        self.0.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: ResultKind) {
        self.0.insert(kind);
    }

    pub fn contains(&self, kind: ResultKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the enabled kinds in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = ResultKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ResultKind> for EnabledKinds {
    fn from_iter<T: IntoIterator<Item = ResultKind>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_name_variants() {
        assert_eq!("RowLineage".parse(), Ok(ResultKind::RowLineage));
        assert_eq!("row_lineage".parse(), Ok(ResultKind::RowLineage));
        assert_eq!(
            "no-missing-embeddings".parse(),
            Ok(ResultKind::NoMissingEmbeddings)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "NoSuchCheck".parse::<ResultKind>().unwrap_err();
        assert_eq!(err, UnknownKindError("NoSuchCheck".to_string()));
    }

    #[test]
    fn test_inspection_split() {
        let inspections: Vec<_> = ResultKind::ALL
            .into_iter()
            .filter(|kind| kind.is_inspection())
            .collect();
        assert_eq!(inspections.len(), 3);
        assert!(!ResultKind::NoIllegalFeatures.is_inspection());
    }

    #[test]
    fn test_enabled_kinds_iterates_in_presentation_order() {
        let enabled = EnabledKinds::none()
            .with(ResultKind::NoMissingEmbeddings)
            .with(ResultKind::HistogramForColumns);
        let kinds: Vec<_> = enabled.iter().collect();
        assert_eq!(
            kinds,
            vec![ResultKind::HistogramForColumns, ResultKind::NoMissingEmbeddings]
        );
    }

    #[test]
    fn test_all_and_none() {
        assert!(EnabledKinds::none().is_empty());
        assert!(ResultKind::ALL.iter().all(|kind| EnabledKinds::all().contains(*kind)));
    }
}
