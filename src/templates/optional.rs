use super::{
    RuleTemplate, Token, UnresolvedRule, condition, is_exhausted, predecessor_ref, successor_ref,
};
use crate::Error;
use crate::graph::{Depths, Pattern, ProcessGraph, find_graph_pattern};
use crate::mapping::NodeType;

/// An exclusive split with one branch running straight into the matching merge.
///
/// The first rule permits the branch, the second one continues after either the branch
/// or what came before the split.
pub struct OptionalTemplate {
    pub include_tags: bool,
}

impl OptionalTemplate {
    fn pattern() -> Pattern {
        let mut pattern = Pattern::directed();
        let incoming = pattern.node("IncomingFlow", &[NodeType::Flow]);
        let split = pattern.node("Split", &[NodeType::Exclusive]);
        let branch = pattern.node("Ref1Flow", &[NodeType::Flow]);
        let skip = pattern.node("SkipFlow", &[NodeType::Flow]);
        let merge = pattern.node("Merge", &[NodeType::Exclusive]);
        let branch_end = pattern.node("Ref2Flow", &[NodeType::Flow]);
        let outgoing = pattern.node("OutgoingFlow", &[NodeType::Flow]);

        pattern.edge(incoming, split);
        pattern.edge(split, branch);
        pattern.edge(split, skip);
        pattern.edge(skip, merge);
        pattern.edge(branch_end, merge);
        pattern.edge(merge, outgoing);
        pattern
    }
}

impl RuleTemplate for OptionalTemplate {
    fn name(&self) -> &'static str {
        "optional"
    }

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error> {
        let mut rules = vec![];

        for m in find_graph_pattern(graph, &Self::pattern()) {
            let (split, merge) = (m["Split"], m["Merge"]);
            if is_exhausted(graph, &m, &[split, merge]) {
                continue;
            }
            if depths.get(split) > depths.get(merge) {
                // the merge comes first, so this is a loop
                continue;
            }

            let optional = successor_ref(graph, m["Ref1Flow"], self.name())?;
            let before = predecessor_ref(graph, m["IncomingFlow"], self.name())?;

            let mut skip = vec![
                Token::text("It is permitted that optionally"),
                Token::forward(optional),
            ];
            skip.extend(condition(graph, split, m["Ref1Flow"], "in case", self.include_tags));
            skip.extend(condition(
                graph,
                split,
                m["SkipFlow"],
                "or not in case",
                self.include_tags,
            ));
            skip.push(Token::text("after"));
            skip.push(Token::backward(before));
            let skip_nodes = vec![split, m["SkipFlow"], m["Ref1Flow"], m["IncomingFlow"]];

            let after = successor_ref(graph, m["OutgoingFlow"], self.name())?;
            let branch_end = predecessor_ref(graph, m["Ref2Flow"], self.name())?;
            let proceed = vec![
                Token::text("It is obligatory that"),
                Token::forward(after),
                Token::text("after one of"),
                Token::backward(before),
                Token::text("or"),
                Token::backward(branch_end),
            ];
            let proceed_nodes = vec![merge, m["OutgoingFlow"], m["Ref2Flow"]];

            graph.visit_all(&skip_nodes);
            graph.visit_all(&proceed_nodes);
            rules.push(UnresolvedRule {
                depth: depths.min_of(skip_nodes.iter().copied()),
                content: skip,
                nodes: skip_nodes,
            });
            rules.push(UnresolvedRule {
                depth: depths.min_of(proceed_nodes.iter().copied()),
                content: proceed,
                nodes: proceed_nodes,
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
    use crate::templates::StructuredLoopTemplate;
    use crate::test_fixtures::*;

    #[test]
    fn test_optional_branch_produces_skip_and_continue_rules() {
        let model = diagram(vec![lane("lane", "Alice", optional_model())]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        let rules = OptionalTemplate { include_tags: false }
            .generate(&mut graph, &depths)
            .unwrap();
        assert_eq!(rules.len(), 2);

        let a = graph.find("a").unwrap();
        let b = graph.find("b").unwrap();
        let c = graph.find("c").unwrap();
        assert_eq!(
            rules[0].content,
            vec![
                Token::text("It is permitted that optionally"),
                Token::forward(b),
                Token::text("in case"),
                Token::text("suspicious"),
                Token::text("or not in case"),
                Token::text("trusted"),
                Token::text("after"),
                Token::backward(a),
            ]
        );
        assert_eq!(
            rules[1].content,
            vec![
                Token::text("It is obligatory that"),
                Token::forward(c),
                Token::text("after one of"),
                Token::backward(a),
                Token::text("or"),
                Token::backward(b),
            ]
        );
        assert_eq!(rules[0].depth, depths.get(graph.find("f1").unwrap()).unwrap());
        assert_eq!(rules[1].depth, depths.get(graph.find("merge").unwrap()).unwrap());
    }

    #[test]
    fn test_loop_is_not_mistaken_for_optional() {
        let model = diagram(vec![lane("lane", "Alice", loop_model())]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        let optional = OptionalTemplate { include_tags: false };
        assert!(optional.generate(&mut graph, &depths).unwrap().is_empty());

        let looped = StructuredLoopTemplate { include_tags: false };
        assert_eq!(looped.generate(&mut graph, &depths).unwrap().len(), 2);
    }

    #[test]
    fn test_optional_is_not_mistaken_for_loop() {
        let model = diagram(vec![lane("lane", "Alice", optional_model())]);
        let mut graph = build_graph(&model, &StencilMapping::sap_sam());
        let depths = node_depths(&graph).unwrap();

        let looped = StructuredLoopTemplate { include_tags: false };
        assert!(looped.generate(&mut graph, &depths).unwrap().is_empty());
    }
}
