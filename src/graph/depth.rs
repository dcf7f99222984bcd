use std::collections::HashMap;

use log::info;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};

use super::ProcessGraph;
use crate::validate::{self, ValidationResult};

/// Shortest distance of every behaviour node from the nearest process root.
#[derive(Debug, Clone, Default)]
pub struct Depths(HashMap<NodeIndex, usize>);

impl Depths {
    pub fn get(&self, idx: NodeIndex) -> Option<usize> {
        self.0.get(&idx).copied()
    }

    /// Minimum depth among the given nodes; nodes without a depth are ignored and an
    /// all-unknown set sorts last.
    pub fn min_of(&self, nodes: impl IntoIterator<Item = NodeIndex>) -> usize {
        nodes
            .into_iter()
            .filter_map(|n| self.get(n))
            .min()
            .unwrap_or(usize::MAX)
    }
}

/// Behaviour subgraph with a mapping back to the process graph.
pub(crate) struct BehaviourView {
    pub graph: DiGraph<NodeIndex, ()>,
    pub roots: Vec<NodeIndex>,
}

impl BehaviourView {
    pub fn of(process: &ProcessGraph) -> Self {
        let mut graph = DiGraph::new();
        let mut local = HashMap::new();

        for idx in process.node_indices() {
            if process.kind(idx).is_behaviour() {
                local.insert(idx, graph.add_node(idx));
            }
        }
        for idx in process.node_indices() {
            let Some(&from) = local.get(&idx) else {
                continue;
            };
            for succ in process.successors(idx) {
                if let Some(&to) = local.get(&succ) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        let mut roots: Vec<_> = graph
            .node_indices()
            .filter(|&n| {
                graph
                    .neighbors_directed(n, petgraph::Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        roots.sort_by_key(|&n| std::cmp::Reverse(process.label(graph[n]).chars().count()));

        Self { graph, roots }
    }
}

/// Computes node depths. The behaviour subgraph must be non-empty, weakly connected and
/// have at least one root.
pub fn node_depths(process: &ProcessGraph) -> ValidationResult<Depths> {
    let view = BehaviourView::of(process);
    validate::check_behaviour(&view)?;

    if view.roots.len() > 1 {
        let roots: Vec<_> = view
            .roots
            .iter()
            .map(|&r| {
                let node = process.node(view.graph[r]);
                format!("{} ({}, {})", node.id, node.label, node.kind)
            })
            .collect();
        info!("Multiple roots: {}", roots.join(" "));
    }

    let mut depths = HashMap::new();
    for &root in &view.roots {
        for (local, depth) in dijkstra(&view.graph, root, None, |_| 1usize) {
            let idx = view.graph[local];
            depths
                .entry(idx)
                .and_modify(|d: &mut usize| *d = (*d).min(depth))
                .or_insert(depth);
        }
    }

    Ok(Depths(depths))
}
