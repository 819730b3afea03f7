//! The Sugiyama layout engine.
//!
//! Delegates layering and in-layer placement to `rust-sugiyama`. The crate
//! lays out every connected component on its own; components are placed
//! side by side, nodes without any edge are appended on layer 0 to the right.

use std::{collections::HashMap, panic};

use log::debug;
use rust_sugiyama::configure::Config;

use dagscope_core::geometry::Point;

use super::topological_order;
use crate::{
    error::LayoutError,
    layout::{DagEngine, PositionIndex},
    structure::Dag,
};

/// Horizontal distance between neighbouring vertices in `rust-sugiyama` units.
const VERTEX_SPACING: f64 = 3.0;

/// Vertices whose `y` differ by less than this share a layer.
const LAYER_EPSILON: f64 = 1e-3;

pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 80.0,
            vertical_spacing: 80.0,
        }
    }

    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Runs `rust-sugiyama`, turning a panic inside the crate into an error.
    fn run(edges: Vec<(u32, u32)>) -> Result<Vec<Vec<(usize, (f64, f64))>>, LayoutError> {
        let layouts = panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: VERTEX_SPACING,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        })
        .map_err(|err| {
            let message = err
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| err.downcast_ref::<&str>().map(|msg| msg.to_string()))
                .unwrap_or_else(|| "unknown panic".to_string());
            LayoutError::Engine(format!("rust-sugiyama panicked: {message}"))
        })?;

        Ok(layouts.into_iter().map(|(coords, _, _)| coords).collect())
    }
}

/// Groups the `y` coordinates of one component into layer numbers.
///
/// `rust-sugiyama` may grow `y` in either direction, so the layers are
/// numbered in the direction the edges point.
fn component_layers(
    coords: &[(usize, (f64, f64))],
    edges: &[(u32, u32)],
) -> HashMap<usize, usize> {
    let mut levels: Vec<f64> = coords.iter().map(|(_, (_, y))| *y).collect();
    levels.sort_by(|a, b| a.total_cmp(b));
    levels.dedup_by(|a, b| (*a - *b).abs() < LAYER_EPSILON);

    let level_of = |y: f64| {
        levels
            .iter()
            .position(|level| (level - y).abs() < LAYER_EPSILON)
            .unwrap_or(0)
    };
    let mut layers: HashMap<usize, usize> = coords
        .iter()
        .map(|(node, (_, y))| (*node, level_of(*y)))
        .collect();

    let points_up = edges.iter().any(|(source, target)| {
        match (layers.get(&(*source as usize)), layers.get(&(*target as usize))) {
            (Some(source_layer), Some(target_layer)) => source_layer > target_layer,
            _ => false,
        }
    });
    if points_up {
        let top = levels.len().saturating_sub(1);
        for layer in layers.values_mut() {
            *layer = top - *layer;
        }
    }
    layers
}

impl DagEngine for Engine {
    fn calculate(&self, dag: &Dag) -> Result<PositionIndex, LayoutError> {
        let mut positions = PositionIndex::new();
        if dag.is_empty() {
            return Ok(positions);
        }
        topological_order(dag)?;

        let edges: Vec<(u32, u32)> = dag
            .graph()
            .raw_edges()
            .iter()
            .map(|edge| (edge.source().index() as u32, edge.target().index() as u32))
            .collect();

        let components = if edges.is_empty() {
            Vec::new()
        } else {
            debug!(nodes = dag.len(), edges = edges.len(); "Applying Sugiyama algorithm");
            Self::run(edges.clone())?
        };

        let mut placed: HashMap<usize, (Point, usize)> = HashMap::new();
        let mut cursor = 0.0f32;
        for coords in &components {
            let layers = component_layers(coords, &edges);
            let min_x = coords.iter().map(|(_, (x, _))| *x).fold(f64::INFINITY, f64::min);
            let max_x = coords
                .iter()
                .map(|(_, (x, _))| *x)
                .fold(f64::NEG_INFINITY, f64::max);

            for (node, (x, _)) in coords {
                let layer = layers.get(node).copied().unwrap_or(0);
                let slot = ((x - min_x) / VERTEX_SPACING) as f32;
                let point = Point::new(
                    (cursor + slot) * self.horizontal_spacing,
                    layer as f32 * self.vertical_spacing,
                );
                placed.insert(*node, (point, layer));
            }
            cursor += ((max_x - min_x) / VERTEX_SPACING) as f32 + 1.0;
        }

        for node in dag.nodes() {
            let Some(idx) = dag.index_of(node.id()) else {
                continue;
            };
            let has_edges = dag.graph().neighbors_undirected(idx).next().is_some();
            let (point, layer) = match placed.get(&idx.index()) {
                Some(entry) => *entry,
                None if !has_edges => {
                    let point = Point::new(cursor * self.horizontal_spacing, 0.0);
                    cursor += 1.0;
                    (point, 0)
                }
                None => {
                    return Err(LayoutError::Engine(format!(
                        "rust-sugiyama returned no position for node `{}`",
                        node.id()
                    )));
                }
            };
            positions.insert(node.id(), point, layer);
        }

        for (source, target) in dag.edges() {
            let (Some(source_layer), Some(target_layer)) =
                (positions.layer(source), positions.layer(target))
            else {
                continue;
            };
            if source_layer >= target_layer {
                return Err(LayoutError::Engine(format!(
                    "rust-sugiyama placed `{source}` on layer {source_layer} but its consumer `{target}` on layer {target_layer}"
                )));
            }
        }

        debug!(positioned = positions.len(); "Sugiyama layout generated");
        Ok(positions)
    }
}
