//! Dagscope Core Types and Definitions
//!
//! This crate provides the vocabulary shared by every Dagscope crate:
//!
//! - **Identifiers**: String-interned node identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Semantic**: The execution result handed over by the inspection engine:
//!   DAG nodes, inspection annotations and check verdicts ([`semantic`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod semantic;
