//! Renderable scene of one execution.
//!
//! A [`Scene`] holds exactly one node marker series, one edge line series,
//! one text annotation per node and any number of highlight marker series.
//! Highlight series are kept apart from the base series so decorating a
//! scene never changes what the base series contain.

use log::debug;
use serde::Serialize;

use dagscope_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use crate::{
    draw::{EdgeCurveParams, PathVertex, edge_curve},
    layout::PositionIndex,
    structure::Dag,
};

/// One node marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    node: Id,
    position: Point,
    /// Short operator symbol.
    label: String,
    /// Multi-line text: operator, source line, description.
    tooltip: String,
}

impl Marker {
    pub fn node(&self) -> Id {
        self.node
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }
}

/// A named series of node markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSeries {
    name: String,
    markers: Vec<Marker>,
}

impl MarkerSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: Vec::new(),
        }
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Iterates over the node ids of the markers, in series order.
    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.markers.iter().map(Marker::node)
    }
}

/// All edge curves of a scene, concatenated into one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineSeries {
    #[serde(skip)]
    vertices: Vec<PathVertex>,
    edges: Vec<(Id, Id)>,
}

impl LineSeries {
    /// Points of every curve; each polyline ends with [`PathVertex::Break`].
    pub fn vertices(&self) -> &[PathVertex] {
        &self.vertices
    }

    /// The drawn edges, in DAG edge order.
    pub fn edges(&self) -> &[(Id, Id)] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Text drawn on top of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    node: Id,
    position: Point,
    text: String,
}

impl Annotation {
    pub fn node(&self) -> Id {
        self.node
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    nodes: MarkerSeries,
    edges: LineSeries,
    annotations: Vec<Annotation>,
    highlights: Vec<MarkerSeries>,
}

impl Scene {
    pub fn node_markers(&self) -> &MarkerSeries {
        &self.nodes
    }

    pub fn edge_lines(&self) -> &LineSeries {
        &self.edges
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn highlights(&self) -> &[MarkerSeries] {
        &self.highlights
    }

    /// The base marker of `node`, if the node is part of the scene.
    pub fn marker(&self, node: Id) -> Option<&Marker> {
        self.nodes.markers.iter().find(|marker| marker.node == node)
    }

    /// Returns the scene with `series` appended to the highlight series.
    ///
    /// A highlight series with the same name is replaced in place.
    pub fn with_highlight(mut self, series: MarkerSeries) -> Self {
        match self
            .highlights
            .iter_mut()
            .find(|existing| existing.name == series.name)
        {
            Some(existing) => *existing = series,
            None => self.highlights.push(series),
        }
        self
    }

    /// Bounds of every node position, `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.nodes.markers.iter().map(Marker::position))
    }
}

/// Builds the base scene of a laid out DAG.
///
/// Markers and annotations follow the order of `positions`; edges follow DAG
/// edge order. Nodes or edges without a position are left out.
pub fn build_scene(dag: &Dag, positions: &PositionIndex, edge_params: &EdgeCurveParams) -> Scene {
    let mut nodes = MarkerSeries::new("nodes");
    let mut annotations = Vec::with_capacity(positions.len());

    for (id, position) in positions.iter() {
        let Some(node) = dag.node(id) else {
            debug!(node:% = id; "Position without DAG node ignored");
            continue;
        };
        let short = node.operator().short_name().to_string();
        nodes.push(Marker {
            node: id,
            position,
            label: short.clone(),
            tooltip: node.label(),
        });
        annotations.push(Annotation {
            node: id,
            position,
            text: short,
        });
    }

    let mut edges = LineSeries::default();
    for (source, target) in dag.edges() {
        let (Some(from), Some(to)) = (positions.position(source), positions.position(target)) else {
            continue;
        };
        edges
            .vertices
            .extend(edge_curve(from, to, edge_params).vertices());
        edges.edges.push((source, target));
    }

    debug!(
        markers = nodes.len(),
        edges = edges.edge_count();
        "Scene built"
    );

    Scene {
        nodes,
        edges,
        annotations,
        highlights: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use dagscope_core::semantic::{CodeReference, DagNode, OperatorType};

    use super::*;
    use crate::{config::LayoutConfig, layout::compute_layout};

    fn pipeline() -> Dag {
        Dag::new(
            [
                DagNode::new(Id::new("src"), OperatorType::DataSource, CodeReference::new(11))
                    .with_description("patients.csv"),
                DagNode::new(Id::new("sel"), OperatorType::Selection, CodeReference::new(12)),
                DagNode::new(Id::new("proj"), OperatorType::Projection, CodeReference::new(13)),
            ],
            [
                (Id::new("src"), Id::new("sel")),
                (Id::new("sel"), Id::new("proj")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_one_marker_and_annotation_per_node() {
        let dag = pipeline();
        let positions = compute_layout(&dag, &LayoutConfig::default()).unwrap();
        let scene = build_scene(&dag, &positions, &EdgeCurveParams::default());

        assert_eq!(scene.node_markers().len(), 3);
        assert_eq!(scene.annotations().len(), 3);
        assert_eq!(scene.edge_lines().edge_count(), 2);
        assert!(scene.highlights().is_empty());

        let source = scene.marker(Id::new("src")).unwrap();
        assert_eq!(source.label(), "⊞");
        assert_eq!(source.tooltip(), "Data Source (L11)\npatients.csv");
        assert_eq!(Some(source.position()), positions.position(Id::new("src")));
        assert_eq!(scene.annotations()[1].text(), "σ");
    }

    #[test]
    fn test_edge_series_breaks_between_curves() {
        let dag = pipeline();
        let positions = compute_layout(&dag, &LayoutConfig::default()).unwrap();
        let scene = build_scene(&dag, &positions, &EdgeCurveParams::default());

        let breaks = scene
            .edge_lines()
            .vertices()
            .iter()
            .filter(|vertex| matches!(vertex, PathVertex::Break))
            .count();
        // main segment plus two arrow strokes per edge
        assert_eq!(breaks, 6);
    }

    #[test]
    fn test_highlight_with_same_name_is_replaced() {
        let dag = pipeline();
        let positions = compute_layout(&dag, &LayoutConfig::default()).unwrap();
        let scene = build_scene(&dag, &positions, &EdgeCurveParams::default());

        let mut first = MarkerSeries::new("flagged");
        first.push(scene.marker(Id::new("src")).unwrap().clone());
        let second = MarkerSeries::new("flagged");

        let scene = scene.with_highlight(first).with_highlight(second);
        assert_eq!(scene.highlights().len(), 1);
        assert!(scene.highlights()[0].is_empty());
        assert_eq!(scene.node_markers().len(), 3);
    }

    #[test]
    fn test_empty_dag_gives_empty_scene() {
        let dag = Dag::default();
        let scene = build_scene(&dag, &PositionIndex::new(), &EdgeCurveParams::default());

        assert!(scene.node_markers().is_empty());
        assert!(scene.bounds().is_none());
    }
}
