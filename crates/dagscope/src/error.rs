//! Error types for Dagscope operations.
//!
//! This module provides the main error type [`DagscopeError`] together with
//! the layout specific [`LayoutError`]. Outcomes that are valid "nothing
//! found" answers, such as a pick that hits no node or a node without
//! recorded results, are modelled as `Option` or empty collections and never
//! appear here.

use std::io;

use thiserror::Error;

use dagscope_core::identifier::Id;

use crate::engine::EngineError;

/// Failure to lay out a pipeline graph.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The input graph is not acyclic. `node` is one node on a cycle.
    #[error("pipeline graph is not acyclic: cycle through node `{node}`")]
    Cycle { node: Id },

    #[error("layout engine failed: {0}")]
    Engine(String),

    /// Spacing along `axis` is not a positive finite number.
    #[error("invalid {axis} spacing {value}: must be finite and greater than zero")]
    InvalidSpacing { axis: &'static str, value: f32 },
}

/// The main error type for Dagscope operations.
#[derive(Debug, Error)]
pub enum DagscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Inspection engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for DagscopeError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_display() {
        let err = DagscopeError::from(LayoutError::Cycle {
            node: Id::new("fit"),
        });
        assert_eq!(
            err.to_string(),
            "Layout error: pipeline graph is not acyclic: cycle through node `fit`"
        );
    }

    #[test]
    fn test_export_error_is_boxed() {
        let err = DagscopeError::from(crate::export::Error::Render("bad color".to_string()));
        assert!(matches!(err, DagscopeError::Export(_)));
        assert_eq!(err.to_string(), "Export error: Render error: bad color");
    }
}
