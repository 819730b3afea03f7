//! Graph structures built from an execution result.

mod dag;

pub use dag::Dag;
