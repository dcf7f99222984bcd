use petgraph::graph::NodeIndex;

use super::{
    RuleTemplate, Token, UnresolvedRule, condition, is_exhausted, predecessor_ref, successor_ref,
};
use crate::Error;
use crate::graph::{Depths, Pattern, ProcessGraph, find_graph_pattern};
use crate::mapping::NodeType;

/// An exclusive merge entering an activity whose exclusive split leads back to the merge.
///
/// Produces two rules: the loop body is entered after whatever precedes the merge, and
/// after the body either it is repeated or the process continues.
pub struct StructuredLoopTemplate {
    pub include_tags: bool,
}

impl StructuredLoopTemplate {
    fn pattern() -> Pattern {
        let mut pattern = Pattern::directed();
        let pre_to_merge = pattern.node("PreToMergeFlow", &[NodeType::Flow]);
        let merge = pattern.node("Merge", &[NodeType::Exclusive]);
        let merge_to_repeated = pattern.node("MergeToRepeatedFlow", &[NodeType::Flow]);
        let repeated = pattern.node("Repeated", &[NodeType::Activity]);
        let repeated_to_split = pattern.node("RepeatedToSplitFlow", &[NodeType::Flow]);
        let split = pattern.node("Split", &[NodeType::Exclusive]);
        let split_to_merge = pattern.node("SplitToMergeFlow", &[NodeType::Flow]);
        let split_to_post = pattern.node("SplitToPostFlow", &[NodeType::Flow]);

        pattern.edge(pre_to_merge, merge);
        pattern.edge(merge, merge_to_repeated);
        pattern.edge(merge_to_repeated, repeated);
        pattern.edge(repeated, repeated_to_split);
        pattern.edge(repeated_to_split, split);
        pattern.edge(split, split_to_merge);
        pattern.edge(split_to_merge, merge);
        pattern.edge(split, split_to_post);
        pattern
    }

    fn condition(&self, graph: &ProcessGraph, split: NodeIndex, flow: NodeIndex) -> Vec<Token> {
        condition(graph, split, flow, "in case", self.include_tags)
    }
}

impl RuleTemplate for StructuredLoopTemplate {
    fn name(&self) -> &'static str {
        "structured loop"
    }

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error> {
        let mut rules = vec![];

        for m in find_graph_pattern(graph, &Self::pattern()) {
            let (merge, split) = (m["Merge"], m["Split"]);
            if is_exhausted(graph, &m, &[merge, split]) {
                continue;
            }
            if depths.get(split) < depths.get(merge) {
                // the split comes first, so this is an optional branch
                continue;
            }

            let repeated = m["Repeated"];
            let depth = depths.min_of(m.nodes());

            let before = predecessor_ref(graph, m["PreToMergeFlow"], self.name())?;
            let body = vec![
                Token::text("It is obligatory that"),
                Token::forward(repeated),
                Token::text("after"),
                Token::backward(before),
            ];
            let body_nodes = vec![merge, m["PreToMergeFlow"], m["MergeToRepeatedFlow"]];

            let after = successor_ref(graph, m["SplitToPostFlow"], self.name())?;
            let mut back = vec![
                Token::text("It is obligatory that"),
                Token::text("either"),
                Token::forward(repeated),
                Token::text("is repeated"),
            ];
            back.extend(self.condition(graph, split, m["SplitToMergeFlow"]));
            back.push(Token::text("or"));
            back.push(Token::forward(after));
            back.extend(self.condition(graph, split, m["SplitToPostFlow"]));
            back.push(Token::text("after"));
            back.push(Token::backward(repeated));
            let back_nodes = vec![
                split,
                m["RepeatedToSplitFlow"],
                m["SplitToMergeFlow"],
                m["SplitToPostFlow"],
            ];

            graph.visit_all(&body_nodes);
            graph.visit_all(&back_nodes);
            rules.push(UnresolvedRule {
                depth,
                content: body,
                nodes: body_nodes,
            });
            rules.push(UnresolvedRule {
                depth,
                content: back,
                nodes: back_nodes,
            });
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
    fn test_loop_produces_body_and_loop_back_rules() {
        let model = diagram(vec![lane("lane", "Alice", loop_model())]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        let template = StructuredLoopTemplate { include_tags: false };
        let rules = template.generate(&mut graph, &depths).unwrap();
        assert_eq!(rules.len(), 2);

        let a = graph.find("a").unwrap();
        let b = graph.find("b").unwrap();
        let c = graph.find("c").unwrap();
        assert_eq!(
            rules[0].content,
            vec![
                Token::text("It is obligatory that"),
                Token::forward(b),
                Token::text("after"),
                Token::backward(a),
            ]
        );
        assert_eq!(
            rules[1].content,
            vec![
                Token::text("It is obligatory that"),
                Token::text("either"),
                Token::forward(b),
                Token::text("is repeated"),
                Token::text("in case"),
                Token::text("complete? no"),
                Token::text("or"),
                Token::forward(c),
                Token::text("in case"),
                Token::text("complete? yes"),
                Token::text("after"),
                Token::backward(b),
            ]
        );
        assert_eq!(rules[0].depth, rules[1].depth);
        assert_eq!(rules[0].depth, depths.get(graph.find("f1").unwrap()).unwrap());
        assert!(graph.is_visited(graph.find("merge").unwrap()));
        assert!(graph.is_visited(graph.find("split").unwrap()));
    }

    #[test]
    fn test_loop_is_matched_once() {
        let model = diagram(vec![lane("lane", "Alice", loop_model())]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        let template = StructuredLoopTemplate { include_tags: false };
        assert_eq!(template.generate(&mut graph, &depths).unwrap().len(), 2);
        assert!(template.generate(&mut graph, &depths).unwrap().is_empty());
    }
}
