//! The pipeline DAG as an indexed graph.
//!
//! [`Dag`] wraps a `petgraph` [`DiGraph`] whose node weights are the
//! engine's [`DagNode`]s. Nodes are addressed by their [`Id`]; the
//! `petgraph` indices never leave this crate.
//!
//! Two orders are part of the contract and covered by tests:
//! - node iteration order is the order nodes were handed over;
//! - [`Dag::predecessors`] lists producers in the order their edges were
//!   handed over. Row tables of inputs are displayed in this order.

use indexmap::IndexMap;
use log::debug;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use dagscope_core::{
    identifier::Id,
    semantic::{DagNode, DagSpec},
};

use crate::error::DagscopeError;

/// A directed graph of pipeline operators with producer to consumer edges.
///
/// Acyclicity is not verified on construction; the layout step rejects
/// cyclic graphs.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    graph: DiGraph<DagNode, ()>,
    indices: IndexMap<Id, NodeIndex>,
}

impl Dag {
    /// Builds a DAG from nodes and edges.
    ///
    /// # Errors
    ///
    /// Returns [`DagscopeError::Graph`] if two nodes share an id or an edge
    /// names a node that does not exist.
    pub fn new<N, E>(nodes: N, edges: E) -> Result<Self, DagscopeError>
    where
        N: IntoIterator<Item = DagNode>,
        E: IntoIterator<Item = (Id, Id)>,
    {
        let mut dag = Self::default();

        for node in nodes {
            let id = node.id();
            if dag.indices.contains_key(&id) {
                return Err(DagscopeError::Graph(format!("duplicate node id `{id}`")));
            }
            let idx = dag.graph.add_node(node);
            dag.indices.insert(id, idx);
        }

        for (source, target) in edges {
            let source_idx = dag.index_of(source).ok_or_else(|| {
                DagscopeError::Graph(format!(
                    "edge `{source}` -> `{target}` references unknown node `{source}`"
                ))
            })?;
            let target_idx = dag.index_of(target).ok_or_else(|| {
                DagscopeError::Graph(format!(
                    "edge `{source}` -> `{target}` references unknown node `{target}`"
                ))
            })?;
            dag.graph.add_edge(source_idx, target_idx, ());
        }

        debug!(
            nodes = dag.graph.node_count(),
            edges = dag.graph.edge_count();
            "Pipeline DAG built"
        );

        Ok(dag)
    }

    /// Builds a DAG from the serialized form handed over by the engine.
    pub fn from_spec(spec: &DagSpec) -> Result<Self, DagscopeError> {
        Self::new(spec.nodes.iter().cloned(), spec.edges.iter().copied())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.indices.contains_key(&id)
    }

    pub fn node(&self, id: Id) -> Option<&DagNode> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Iterates over all nodes in the order they were handed over.
    pub fn nodes(&self) -> impl Iterator<Item = &DagNode> {
        self.indices.values().map(|idx| &self.graph[*idx])
    }

    /// Iterates over all edges as `(producer, consumer)` in the order they were handed over.
    pub fn edges(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (self.graph[edge.source()].id(), self.graph[edge.target()].id()))
    }

    /// Direct producers of `id`, in edge insertion order, without duplicates.
    ///
    /// Returns an empty list for unknown nodes and for sources.
    pub fn predecessors(&self, id: Id) -> Vec<Id> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Direct consumers of `id`, in edge insertion order, without duplicates.
    pub fn successors(&self, id: Id) -> Vec<Id> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: Id, direction: Direction) -> Vec<Id> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };

        // petgraph walks adjacency lists newest edge first
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge_idx, _)| *edge_idx);

        let mut neighbors: Vec<Id> = Vec::with_capacity(edges.len());
        for (_, other) in edges {
            let other_id = self.graph[other].id();
            if !neighbors.contains(&other_id) {
                neighbors.push(other_id);
            }
        }
        neighbors
    }

    pub(crate) fn graph(&self) -> &DiGraph<DagNode, ()> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: Id) -> Option<NodeIndex> {
        self.indices.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use dagscope_core::semantic::{CodeReference, OperatorType};

    use super::*;

    fn node(name: &str) -> DagNode {
        DagNode::new(Id::new(name), OperatorType::Projection, CodeReference::new(1))
    }

    fn edge(source: &str, target: &str) -> (Id, Id) {
        (Id::new(source), Id::new(target))
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let dag = Dag::new(
            [node("c"), node("a"), node("b")],
            [edge("a", "b"), edge("c", "b")],
        )
        .unwrap();

        let ids: Vec<Id> = dag.nodes().map(DagNode::id).collect();
        assert_eq!(ids, vec![Id::new("c"), Id::new("a"), Id::new("b")]);
        assert_eq!(dag.len(), 3);
        assert_eq!(dag.edge_count(), 2);
    }

    #[test]
    fn test_predecessors_follow_edge_insertion_order() {
        let dag = Dag::new(
            [node("x"), node("y"), node("z"), node("join")],
            [edge("z", "join"), edge("x", "join"), edge("y", "join")],
        )
        .unwrap();

        assert_eq!(
            dag.predecessors(Id::new("join")),
            vec![Id::new("z"), Id::new("x"), Id::new("y")]
        );
        assert!(dag.predecessors(Id::new("x")).is_empty());
        assert_eq!(dag.successors(Id::new("x")), vec![Id::new("join")]);
    }

    #[test]
    fn test_parallel_edges_yield_one_predecessor() {
        let dag = Dag::new([node("p"), node("q")], [edge("p", "q"), edge("p", "q")]).unwrap();
        assert_eq!(dag.predecessors(Id::new("q")), vec![Id::new("p")]);
    }

    #[test]
    fn test_duplicate_node_is_rejected() {
        let err = Dag::new([node("dup"), node("dup")], []).unwrap_err();
        assert!(matches!(err, DagscopeError::Graph(msg) if msg.contains("dup")));
    }

    #[test]
    fn test_edge_to_unknown_node_is_rejected() {
        let err = Dag::new([node("known")], [edge("known", "ghost")]).unwrap_err();
        assert!(matches!(err, DagscopeError::Graph(msg) if msg.contains("ghost")));
    }

    #[test]
    fn test_unknown_node_lookups_are_empty() {
        let dag = Dag::new([node("solo")], []).unwrap();
        assert!(dag.node(Id::new("nope")).is_none());
        assert!(dag.predecessors(Id::new("nope")).is_empty());
        assert!(!dag.contains(Id::new("nope")));
    }

    #[test]
    fn test_edges_roundtrip_in_order() {
        let edges = vec![edge("a", "b"), edge("a", "c"), edge("b", "c")];
        let dag = Dag::new([node("a"), node("b"), node("c")], edges.clone()).unwrap();
        assert_eq!(dag.edges().collect::<Vec<_>>(), edges);
    }
}
