use super::{RuleTemplate, Token, UnresolvedRule, is_exhausted};
use crate::Error;
use crate::graph::{Depths, Pattern, ProcessGraph, find_graph_pattern};
use crate::mapping::NodeType;

/// A single flow between two activities or events.
pub struct SequenceFlowTemplate;

impl RuleTemplate for SequenceFlowTemplate {
    fn name(&self) -> &'static str {
        "sequence flow"
    }

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error> {
        let mut pattern = Pattern::directed();
        let left = pattern.node("Left", &[NodeType::Activity, NodeType::StartEvent]);
        let flow = pattern.node("Flow", &[NodeType::Flow]);
        let right = pattern.node("Right", &[NodeType::Activity, NodeType::EndEvent]);
        pattern.edge(left, flow);
        pattern.edge(flow, right);

        let mut rules = vec![];
        for m in find_graph_pattern(graph, &pattern) {
            let flow = m["Flow"];
            if is_exhausted(graph, &m, &[flow]) {
                continue;
            }

            rules.push(UnresolvedRule {
                depth: depths.get(flow).unwrap_or(usize::MAX),
                content: vec![
                    Token::text("It is obligatory that"),
                    Token::forward(m["Right"]),
                    Token::text("after"),
                    Token::backward(m["Left"]),
                ],
                nodes: vec![flow],
            });
            graph.visit(flow);
        }

        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, node_depths};
    use crate::mapping::StencilMapping;
    use crate::test_fixtures::*;

    #[test]
    fn test_one_rule_per_flow() {
        let model = diagram(vec![lane(
            "lane",
            "Alice",
            vec![
                start("s", &["f1"]),
                flow("f1", "", "a"),
                task("a", "review", &["f2"]),
                flow("f2", "", "e"),
                end("e"),
            ],
        )]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        let mut rules = SequenceFlowTemplate.generate(&mut graph, &depths).unwrap();
        rules.sort_by_key(|r| r.depth);
        assert_eq!(rules.len(), 2);

        let (s, a, e) = (
            graph.find("s").unwrap(),
            graph.find("a").unwrap(),
            graph.find("e").unwrap(),
        );
        assert_eq!(rules[0].depth, 1);
        assert_eq!(rules[0].content[1], Token::forward(a));
        assert_eq!(rules[0].content[3], Token::backward(s));
        assert_eq!(rules[1].depth, 3);
        assert_eq!(rules[1].content[1], Token::forward(e));
        assert_eq!(rules[1].content[3], Token::backward(a));
        assert!(graph.is_visited(graph.find("f1").unwrap()));
        assert!(!graph.is_visited(a));
    }

    #[test]
    fn test_flows_into_gateways_are_left_alone() {
        let model = diagram(vec![
            task("a", "review", &["f1"]),
            flow("f1", "", "gw"),
            xor("gw", "", &[]),
        ]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        assert!(SequenceFlowTemplate.generate(&mut graph, &depths).unwrap().is_empty());
    }
}
