//! Layered layout engine.
//!
//! 1. Layer assignment: longest path from the sources.
//! 2. Ordering within layers: start from DAG node order, then alternate
//!    downward and upward barycenter sweeps and keep the ordering with the
//!    fewest crossings. Ties are broken by DAG node order.
//! 3. Coordinates: `x` from the in-layer slot, centered around 0, `y` from
//!    the layer.
//!
//! Identical input always produces identical output.

use std::cmp::Ordering;

use log::{debug, trace};

use dagscope_core::geometry::Point;

use super::{longest_path_layers, topological_order};
use crate::{
    error::LayoutError,
    layout::{DagEngine, PositionIndex},
    structure::Dag,
};

/// Adjacency of the DAG in node-index space, both directions.
struct Adjacency {
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl Adjacency {
    fn new(dag: &Dag) -> Self {
        let count = dag.len();
        let mut successors = vec![Vec::new(); count];
        let mut predecessors = vec![Vec::new(); count];
        let graph = dag.graph();
        for edge in graph.raw_edges() {
            let (source, target) = (edge.source().index(), edge.target().index());
            successors[source].push(target);
            predecessors[target].push(source);
        }
        Self {
            successors,
            predecessors,
        }
    }
}

pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
    crossing_sweeps: usize,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 80.0,
            vertical_spacing: 80.0,
            crossing_sweeps: 8,
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

    /// Caps the barycenter sweeps; sweeping ends sooner once a sweep stops
    /// reducing crossings.
    pub fn set_crossing_sweeps(&mut self, sweeps: usize) -> &mut Self {
        self.crossing_sweeps = sweeps;
        self
    }

    /// Reorders layers to reduce crossings; returns the crossing count of the result.
    fn minimize_crossings(&self, layers: &mut Vec<Vec<usize>>, adjacency: &Adjacency) -> usize {
        let mut best_crossings = total_crossings(layers, adjacency);
        if layers.len() <= 1 || best_crossings == 0 {
            return best_crossings;
        }
        let mut best_order = layers.clone();

        for sweep in 0..self.crossing_sweeps {
            for layer in 1..layers.len() {
                let (fixed, free) = layers.split_at_mut(layer);
                reorder_by_barycenter(&mut free[0], &fixed[layer - 1], &adjacency.predecessors);
            }
            for layer in (0..layers.len() - 1).rev() {
                let (free, fixed) = layers.split_at_mut(layer + 1);
                reorder_by_barycenter(&mut free[layer], &fixed[0], &adjacency.successors);
            }

            let crossings = total_crossings(layers, adjacency);
            trace!(sweep, crossings; "Barycenter sweep finished");
            if crossings < best_crossings {
                best_crossings = crossings;
                best_order = layers.clone();
                if crossings == 0 {
                    break;
                }
            } else {
                break;
            }
        }

        *layers = best_order;
        best_crossings
    }
}

impl DagEngine for Engine {
    fn calculate(&self, dag: &Dag) -> Result<PositionIndex, LayoutError> {
        let mut positions = PositionIndex::new();
        if dag.is_empty() {
            return Ok(positions);
        }

        let order = topological_order(dag)?;
        let node_layers = longest_path_layers(dag, &order);
        let adjacency = Adjacency::new(dag);

        // Node indices follow DAG node order, so bucketing in index order
        // gives the initial in-layer order.
        let layer_count = node_layers.iter().max().map_or(0, |max| max + 1);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
        for (node, layer) in node_layers.iter().enumerate() {
            layers[*layer].push(node);
        }

        let crossings = self.minimize_crossings(&mut layers, &adjacency);
        debug!(layers = layers.len(), crossings; "Layer ordering fixed");

        let mut slots: Vec<Point> = vec![Point::default(); dag.len()];
        for (layer, members) in layers.iter().enumerate() {
            let center = (members.len() as f32 - 1.0) / 2.0;
            let y = layer as f32 * self.vertical_spacing;
            for (slot, node) in members.iter().enumerate() {
                let x = (slot as f32 - center) * self.horizontal_spacing;
                slots[*node] = Point::new(x, y);
            }
        }

        for node in dag.nodes() {
            let idx = dag
                .index_of(node.id())
                .ok_or_else(|| LayoutError::Engine(format!("node `{}` lost", node.id())))?
                .index();
            positions.insert(node.id(), slots[idx], node_layers[idx]);
        }

        Ok(positions)
    }
}

/// Mean slot of the neighbours of `node` in the fixed layer, `None` without any.
fn barycenter(neighbours: &[usize], fixed: &[usize]) -> Option<f64> {
    let slots: Vec<usize> = neighbours
        .iter()
        .filter_map(|neighbour| fixed.iter().position(|member| member == neighbour))
        .collect();
    if slots.is_empty() {
        return None;
    }
    Some(slots.iter().sum::<usize>() as f64 / slots.len() as f64)
}

/// Sorts `free` by barycenter relative to `fixed`. Nodes without neighbours
/// in `fixed` go last; ties keep DAG node order.
fn reorder_by_barycenter(free: &mut [usize], fixed: &[usize], neighbours: &[Vec<usize>]) {
    let mut scored: Vec<(usize, Option<f64>)> = free
        .iter()
        .map(|&node| (node, barycenter(&neighbours[node], fixed)))
        .collect();

    scored.sort_by(|(a, a_score), (b, b_score)| {
        let by_score = match (a_score, b_score) {
            (Some(a_score), Some(b_score)) => a_score.partial_cmp(b_score).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_score.then_with(|| a.cmp(b))
    });

    for (slot, (node, _)) in free.iter_mut().zip(scored) {
        *slot = node;
    }
}

/// Crossings between edges of two adjacent layers.
fn count_crossings(upper: &[usize], lower: &[usize], adjacency: &Adjacency) -> usize {
    let mut segments: Vec<(usize, usize)> = Vec::new();
    for (upper_slot, node) in upper.iter().enumerate() {
        for successor in &adjacency.successors[*node] {
            if let Some(lower_slot) = lower.iter().position(|member| member == successor) {
                segments.push((upper_slot, lower_slot));
            }
        }
    }

    let mut crossings = 0;
    for (i, (a1, b1)) in segments.iter().enumerate() {
        for (a2, b2) in &segments[i + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

fn total_crossings(layers: &[Vec<usize>], adjacency: &Adjacency) -> usize {
    layers
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], adjacency))
        .sum()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use dagscope_core::identifier::Id;

    use super::*;
    use crate::layout::engines::tests::dag;

    #[test]
    fn test_chain_is_vertical() {
        let dag = dag(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let positions = Engine::new().calculate(&dag).unwrap();

        for (layer, name) in ["a", "b", "c"].iter().enumerate() {
            let id = Id::new(name);
            assert_eq!(positions.layer(id), Some(layer));
            let position = positions.position(id).unwrap();
            assert_approx_eq!(f32, position.x(), 0.0);
            assert_approx_eq!(f32, position.y(), layer as f32 * 80.0);
        }
    }

    #[test]
    fn test_layer_is_centered() {
        let dag = dag(&["l", "r", "join"], &[("l", "join"), ("r", "join")]);
        let mut engine = Engine::new();
        engine.set_horizontal_spacing(100.0);
        let positions = engine.calculate(&dag).unwrap();

        assert_approx_eq!(f32, positions.position(Id::new("l")).unwrap().x(), -50.0);
        assert_approx_eq!(f32, positions.position(Id::new("r")).unwrap().x(), 50.0);
        assert_approx_eq!(f32, positions.position(Id::new("join")).unwrap().x(), 0.0);
    }

    #[test]
    fn test_crossing_is_removed() {
        // a -> d and b -> c would cross with the initial order [a, b], [c, d]
        let dag = dag(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]);
        let positions = Engine::new().calculate(&dag).unwrap();

        let x = |name: &str| positions.position(Id::new(name)).unwrap().x();
        assert!(x("a") < x("b"));
        assert!(x("d") < x("c"));
    }

    #[test]
    fn test_ties_keep_node_order() {
        let dag = dag(&["s", "p", "q", "r"], &[("s", "p"), ("s", "q"), ("s", "r")]);
        let positions = Engine::new().calculate(&dag).unwrap();

        let x = |name: &str| positions.position(Id::new(name)).unwrap().x();
        assert!(x("p") < x("q"));
        assert!(x("q") < x("r"));
    }

    #[test]
    fn test_index_follows_dag_order() {
        let dag = dag(&["z", "y", "x"], &[("x", "y"), ("y", "z")]);
        let positions = Engine::new().calculate(&dag).unwrap();

        let ids: Vec<Id> = positions.ids().collect();
        assert_eq!(ids, vec![Id::new("z"), Id::new("y"), Id::new("x")]);
        assert_eq!(positions.layer(Id::new("z")), Some(2));
    }

    #[test]
    fn test_crossing_sweeps_is_an_upper_bound() {
        let dag = dag(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]);
        let adjacency = Adjacency::new(&dag);

        let mut engine = Engine::new();
        engine.set_crossing_sweeps(0);
        let mut layers = vec![vec![0, 1], vec![2, 3]];
        assert_eq!(engine.minimize_crossings(&mut layers, &adjacency), 1);
        assert_eq!(layers, vec![vec![0, 1], vec![2, 3]]);

        // Returns after the first sweep that removes every crossing.
        engine.set_crossing_sweeps(usize::MAX);
        let mut layers = vec![vec![0, 1], vec![2, 3]];
        assert_eq!(engine.minimize_crossings(&mut layers, &adjacency), 0);
        assert_eq!(layers, vec![vec![0, 1], vec![3, 2]]);
    }

    #[test]
    fn test_count_crossings() {
        let dag = dag(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]);
        let adjacency = Adjacency::new(&dag);

        assert_eq!(count_crossings(&[0, 1], &[2, 3], &adjacency), 1);
        assert_eq!(count_crossings(&[0, 1], &[3, 2], &adjacency), 0);
    }
}
