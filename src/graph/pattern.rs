//! Structural pattern search over the process graph.
//!
//! A pattern is a small petgraph graph whose nodes accept a set of node types. Matches
//! are subgraph isomorphisms found with petgraph's VF2 implementation; edges match on
//! existence and, for directed patterns, direction.

use std::ops::Index;

use petgraph::algo::subgraph_isomorphisms_iter;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, EdgeType, Undirected};

use super::{Node, ProcessGraph};
use crate::mapping::NodeType;

#[derive(Debug, Clone)]
pub struct PatternNode {
    pub name: &'static str,
    pub accepts: Vec<NodeType>,
}

impl PatternNode {
    pub fn accepts(&self, kind: NodeType) -> bool {
        self.accepts.contains(&kind)
    }
}

#[derive(Debug, Clone)]
pub struct Pattern<Ty: EdgeType = Directed> {
    graph: Graph<PatternNode, (), Ty>,
}

impl Pattern<Directed> {
    pub fn directed() -> Self {
        Self {
            graph: Graph::default(),
        }
    }
}

impl Pattern<Undirected> {
    pub fn undirected() -> Self {
        Self {
            graph: Graph::default(),
        }
    }
}

impl<Ty: EdgeType> Pattern<Ty> {
    /// Adds a named pattern node matching any of `accepts`.
    pub fn node(&mut self, name: &'static str, accepts: &[NodeType]) -> NodeIndex {
        self.graph.add_node(PatternNode {
            name,
            accepts: accepts.to_vec(),
        })
    }

    pub fn edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// One occurrence of a pattern: pattern node names bound to process graph nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Match(Vec<(&'static str, NodeIndex)>);

impl Match {
    pub fn get(&self, name: &str) -> Option<NodeIndex> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, idx)| *idx)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.0.iter().map(|(_, idx)| *idx)
    }
}

impl Index<&str> for Match {
    type Output = NodeIndex;

    fn index(&self, name: &str) -> &NodeIndex {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, idx)| idx)
            .unwrap_or_else(|| panic!("pattern has no node named '{name}'"))
    }
}

/// All matches of `pattern` in `graph`. Undirected patterns are matched against the
/// undirected projection of the graph. The result is computed up front; call again to
/// restart the search.
pub fn find_graph_pattern<Ty: EdgeType>(
    graph: &ProcessGraph,
    pattern: &Pattern<Ty>,
) -> impl Iterator<Item = Match> + use<Ty> {
    let target: Graph<Node, (), Ty> = graph.inner().clone().into_edge_type();
    let mut node_match = |p: &PatternNode, n: &Node| p.accepts(n.kind);
    let mut edge_match = |_: &(), _: &()| true;

    let matches: Vec<Match> =
        subgraph_isomorphisms_iter(&&pattern.graph, &&target, &mut node_match, &mut edge_match)
            .into_iter()
            .flatten()
            .map(|mapping| {
                Match(
                    mapping
                        .into_iter()
                        .enumerate()
                        .map(|(p, g)| (pattern.graph[NodeIndex::new(p)].name, NodeIndex::new(g)))
                        .collect(),
                )
            })
            .collect();

    matches.into_iter()
}
