use serde::Serialize;

use crate::graph::ProcessGraph;
use crate::mapping::NodeType;

/// A vocabulary entry: the label of an actor or an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub text: String,
    /// Id of the node the fact was read from.
    pub node: String,
}

pub trait FactTemplate {
    fn generate(&self, graph: &ProcessGraph) -> Vec<Fact>;
}

fn facts_of_type(graph: &ProcessGraph, kind: NodeType) -> Vec<Fact> {
    graph
        .nodes_of_type(kind)
        .map(|idx| Fact {
            text: graph.label(idx).to_string(),
            node: graph.node(idx).id.clone(),
        })
        .collect()
}

pub struct ActorFactTemplate;

impl FactTemplate for ActorFactTemplate {
    fn generate(&self, graph: &ProcessGraph) -> Vec<Fact> {
        facts_of_type(graph, NodeType::Actor)
    }
}

pub struct TaskFactTemplate;

impl FactTemplate for TaskFactTemplate {
    fn generate(&self, graph: &ProcessGraph) -> Vec<Fact> {
        facts_of_type(graph, NodeType::Activity)
    }
}

/// Actor facts followed by activity facts, each in graph order.
pub fn apply_fact_templates(graph: &ProcessGraph) -> Vec<Fact> {
    let templates: [&dyn FactTemplate; 2] = [&ActorFactTemplate, &TaskFactTemplate];
    templates.iter().flat_map(|t| t.generate(graph)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actors_come_before_activities() {
        let mut graph = ProcessGraph::new();
        graph.add_node("t1", NodeType::Activity, "review");
        graph.add_node("s", NodeType::StartEvent, "");
        graph.add_node("lane", NodeType::Actor, "Alice");
        graph.add_node("t2", NodeType::Activity, "approve");

        let facts = apply_fact_templates(&graph);
        let texts: Vec<_> = facts.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Alice", "review", "approve"]);
        assert_eq!(facts[0].node, "lane");
        assert!(graph.node_indices().all(|n| !graph.is_visited(n)));
    }
}
