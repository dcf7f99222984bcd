use std::collections::HashMap;
use std::fmt;

use petgraph::Direction::{self, Incoming, Outgoing};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::mapping::NodeType;

pub mod build;
pub mod depth;
pub mod pattern;

pub use build::build_graph;
pub use depth::{Depths, node_depths};
pub use pattern::{Match, Pattern, find_graph_pattern};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeType,
    pub label: String,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.kind)
    }
}

/// The semantic process graph. Nodes live in a petgraph arena; whether a node has
/// already been explained by a rule is tracked in a parallel array.
#[derive(Debug, Clone, Default)]
pub struct ProcessGraph {
    graph: DiGraph<Node, ()>,
    visited: Vec<bool>,
    ids: HashMap<String, NodeIndex>,
}

impl ProcessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing one if the id is already known.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        kind: NodeType,
        label: impl Into<String>,
    ) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.ids.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(Node {
            id: id.clone(),
            kind,
            label: label.into(),
        });
        self.ids.insert(id, idx);
        self.visited.push(false);
        idx
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.update_edge(from, to, ());
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub fn kind(&self, idx: NodeIndex) -> NodeType {
        self.graph[idx].kind
    }

    pub fn label(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].label
    }

    pub fn set_label(&mut self, idx: NodeIndex, label: impl Into<String>) {
        self.graph[idx].label = label.into();
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn nodes_of_type(&self, kind: NodeType) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(move |&idx| self.graph[idx].kind == kind)
    }

    pub fn is_visited(&self, idx: NodeIndex) -> bool {
        self.visited[idx.index()]
    }

    pub fn visit(&mut self, idx: NodeIndex) {
        self.visited[idx.index()] = true;
    }

    pub fn visit_all(&mut self, nodes: &[NodeIndex]) {
        for &idx in nodes {
            self.visit(idx);
        }
    }

    pub(crate) fn inner(&self) -> &DiGraph<Node, ()> {
        &self.graph
    }

    /// Neighbours in one direction, in the order their edges were added.
    fn neighbours(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (e.id(), other)
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbours(idx, Outgoing)
    }

    pub fn predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbours(idx, Incoming)
    }

    pub fn successors_of_type(&self, idx: NodeIndex, kinds: &[NodeType]) -> Vec<NodeIndex> {
        self.filtered(self.successors(idx), |k| kinds.contains(&k))
    }

    pub fn successors_not_of_type(&self, idx: NodeIndex, kinds: &[NodeType]) -> Vec<NodeIndex> {
        self.filtered(self.successors(idx), |k| !kinds.contains(&k))
    }

    pub fn predecessors_of_type(&self, idx: NodeIndex, kinds: &[NodeType]) -> Vec<NodeIndex> {
        self.filtered(self.predecessors(idx), |k| kinds.contains(&k))
    }

    pub fn predecessors_not_of_type(&self, idx: NodeIndex, kinds: &[NodeType]) -> Vec<NodeIndex> {
        self.filtered(self.predecessors(idx), |k| !kinds.contains(&k))
    }

    fn filtered(&self, nodes: Vec<NodeIndex>, keep: impl Fn(NodeType) -> bool) -> Vec<NodeIndex> {
        nodes
            .into_iter()
            .filter(|&n| keep(self.graph[n].kind))
            .collect()
    }

    /// The actor connected to a node, looking at incoming edges before outgoing ones.
    pub fn actor_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.predecessors(idx)
            .into_iter()
            .chain(self.successors(idx))
            .find(|&n| self.graph[n].kind == NodeType::Actor)
    }

    /// Behaviour nodes no rule has explained, rendered as `label (type)`, or `id (type)`
    /// when unlabeled.
    pub fn unexplained(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind.is_behaviour() && !self.is_visited(idx))
            .map(|idx| {
                let node = &self.graph[idx];
                if node.label.is_empty() {
                    format!("{} ({})", node.id, node.kind)
                } else {
                    node.to_string()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_and_edges_collapse() {
        let mut graph = ProcessGraph::new();
        let a = graph.add_node("a", NodeType::Activity, "review");
        let again = graph.add_node("a", NodeType::Activity, "ignored");
        let f = graph.add_node("f", NodeType::Flow, "");
        graph.add_edge(a, f);
        graph.add_edge(a, f);

        assert_eq!(a, again);
        assert_eq!(graph.label(a), "review");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_neighbours_keep_insertion_order() {
        let mut graph = ProcessGraph::new();
        let gw = graph.add_node("gw", NodeType::Exclusive, "");
        let f1 = graph.add_node("f1", NodeType::Flow, "");
        let f2 = graph.add_node("f2", NodeType::Flow, "");
        let lane = graph.add_node("lane", NodeType::Actor, "Alice");
        graph.add_edge(gw, f1);
        graph.add_edge(gw, lane);
        graph.add_edge(gw, f2);

        assert_eq!(graph.successors(gw), vec![f1, lane, f2]);
        assert_eq!(graph.successors_of_type(gw, &[NodeType::Flow]), vec![f1, f2]);
        assert_eq!(
            graph.successors_not_of_type(gw, &[NodeType::Flow]),
            vec![lane]
        );
        assert_eq!(graph.actor_of(gw), Some(lane));
        assert_eq!(graph.predecessors(f2), vec![gw]);
    }

    #[test]
    fn test_unexplained_lists_unvisited_behaviour_nodes() {
        let mut graph = ProcessGraph::new();
        let a = graph.add_node("a", NodeType::Activity, "review");
        graph.add_node("b", NodeType::Activity, "approve");
        graph.add_node("lane", NodeType::Actor, "");
        graph.add_node("f7", NodeType::Flow, "");
        graph.visit(a);

        assert_eq!(graph.unexplained(), vec!["approve (Activity)", "f7 (Flow)"]);
    }
}
