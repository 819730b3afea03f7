//! Geometry of drawn scene elements.

mod edge;

pub use edge::{ArrowPosition, EdgeCurve, EdgeCurveParams, PathVertex, edge_curve};
