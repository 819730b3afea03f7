//! Hierarchical layout of pipeline graphs.
//!
//! The entry point is [`compute_layout`], which picks a layout engine from
//! the [`LayoutConfig`] and returns a [`PositionIndex`]. Every engine puts
//! producers on a smaller layer than their consumers; layers run top to
//! bottom (`y` grows with the layer), nodes of one layer are spread along `x`.

mod engines;

use std::str::FromStr;

use indexmap::IndexMap;
use log::info;
use serde::Deserialize;

use dagscope_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

pub use engines::{DagEngine, EngineBuilder};

use crate::{config::LayoutConfig, error::LayoutError, structure::Dag};

/// Available layout engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Longest-path layering with barycenter crossing reduction.
    #[default]
    Layered,
    /// The `rust-sugiyama` implementation.
    Sugiyama,
}

impl FromStr for LayoutEngine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layered" => Ok(Self::Layered),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err("Unsupported layout engine"),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Layered => "layered",
            LayoutEngine::Sugiyama => "sugiyama",
        }
    }
}

/// Position and layer of every DAG node.
///
/// The key set equals the node set of the laid out [`Dag`] and iterates in
/// the DAG's node order, which is also the rendering order of the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionIndex {
    entries: IndexMap<Id, (Point, usize)>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the position and layer of a node, replacing a previous entry.
    pub fn insert(&mut self, id: Id, position: Point, layer: usize) {
        self.entries.insert(id, (position, layer));
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.entries.get(&id).map(|(position, _)| *position)
    }

    pub fn layer(&self, id: Id) -> Option<usize> {
        self.entries.get(&id).map(|(_, layer)| *layer)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.entries.contains_key(&id)
    }

    /// Iterates over `(node, position)` in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, Point)> + '_ {
        self.entries.iter().map(|(id, (position, _))| (*id, *position))
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of layers, `0` for an empty index.
    pub fn layer_count(&self) -> usize {
        self.entries
            .values()
            .map(|(_, layer)| layer + 1)
            .max()
            .unwrap_or(0)
    }

    /// Smallest bounds containing every node position.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.entries.values().map(|(position, _)| *position))
    }
}

/// Computes the position of every node of `dag`.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidSpacing`] if a spacing of `config` is not
/// positive, [`LayoutError::Cycle`] if `dag` is not acyclic and
/// [`LayoutError::Engine`] if the selected engine fails.
pub fn compute_layout(dag: &Dag, config: &LayoutConfig) -> Result<PositionIndex, LayoutError> {
    config.validate()?;

    let engine_kind = config.engine();
    let engine = EngineBuilder::from_config(config).build(engine_kind);
    let positions = engine.calculate(dag)?;

    let engine_name: &'static str = engine_kind.into();
    info!(
        engine = engine_name,
        nodes = positions.len(),
        layers = positions.layer_count();
        "Layout calculated"
    );

    Ok(positions)
}
