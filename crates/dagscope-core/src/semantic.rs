//! Semantic model of one pipeline execution.
//!
//! Everything in this module is produced by the external inspection engine
//! and only read by Dagscope. Inspections and checks are closed enums, one
//! variant per kind, so every consumer handles every kind through an
//! exhaustive `match`.

mod check;
mod execution;
mod inspection;
mod kind;
mod node;
mod table;

pub use check::{
    Check, CheckDetails, CheckResult, CheckStatus, DistributionChange, MissingEmbeddingsInfo,
    ValueChange,
};
pub use execution::{DagSpec, ExecutionResult};
pub use inspection::{Distribution, Inspection, InspectionResult};
pub use kind::{EnabledKinds, ResultKind, UnknownKindError};
pub use node::{CodeReference, ColumnSpan, DagNode, OperatorType};
pub use table::Table;
