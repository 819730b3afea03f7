//! Seam to the external inspection engine.
//!
//! Dagscope never runs pipelines itself. An [`InspectionEngine`] takes an
//! [`ExecutionRequest`] and hands back the DAG together with all requested
//! inspection and check results.

use std::io;

use thiserror::Error;

use dagscope_core::semantic::ExecutionResult;

use crate::request::ExecutionRequest;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The engine output is not a valid execution result. `offset` is the
    /// byte position of the problem in `src`.
    #[error("failed to decode execution result: {message}")]
    Decode {
        message: String,
        src: String,
        offset: usize,
    },

    #[error("pipeline execution failed: {0}")]
    Execution(String),
}

/// Runs a pipeline under inspection.
///
/// Implementations are expected to be synchronous: the call returns once
/// the pipeline finished or failed. There is no cancellation.
pub trait InspectionEngine {
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, EngineError>;
}

impl<F> InspectionEngine for F
where
    F: Fn(&ExecutionRequest) -> Result<ExecutionResult, EngineError>,
{
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, EngineError> {
        self(request)
    }
}
