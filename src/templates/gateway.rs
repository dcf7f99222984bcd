use petgraph::graph::NodeIndex;

use super::{
    RuleTemplate, Token, UnresolvedRule, condition, is_exhausted, predecessor_ref, successor_ref,
};
use crate::Error;
use crate::graph::{Depths, Pattern, ProcessGraph, find_graph_pattern};
use crate::mapping::NodeType;

fn clauses(kind: NodeType) -> (&'static str, &'static str) {
    kind.clauses().unwrap_or(("one of", "or"))
}

/// A gateway fanning out into two or more options.
pub struct GatewaySplitTemplate {
    kind: NodeType,
    include_tags: bool,
}

impl GatewaySplitTemplate {
    pub fn new(kind: NodeType, include_tags: bool) -> Self {
        Self { kind, include_tags }
    }

    fn pattern(&self) -> Pattern {
        let mut pattern = Pattern::directed();
        let incoming = pattern.node("FlowToGateway", &[NodeType::Flow]);
        let gateway = pattern.node("Gateway", &[self.kind]);
        let first = pattern.node("FlowOption1", &[NodeType::Flow]);
        let second = pattern.node("FlowOption2", &[NodeType::Flow]);
        pattern.edge(incoming, gateway);
        pattern.edge(gateway, first);
        pattern.edge(gateway, second);
        pattern
    }
}

impl RuleTemplate for GatewaySplitTemplate {
    fn name(&self) -> &'static str {
        match self.kind {
            NodeType::Parallel => "parallel split",
            NodeType::Inclusive => "inclusive split",
            _ => "exclusive split",
        }
    }

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error> {
        let (leading, join) = clauses(self.kind);
        let mut rules = vec![];

        for m in find_graph_pattern(graph, &self.pattern()) {
            let gateway = m["Gateway"];
            if is_exhausted(graph, &m, &[gateway]) {
                continue;
            }

            let out_flows = graph.successors_of_type(gateway, &[NodeType::Flow]);

            let mut content = vec![Token::text("It is obligatory that"), Token::text(leading)];
            for (i, &flow) in out_flows.iter().enumerate() {
                if i > 0 {
                    content.push(Token::text(join));
                }
                content.push(Token::forward(successor_ref(graph, flow, self.name())?));
                content.extend(condition(graph, gateway, flow, "in case", self.include_tags));
            }

            // A gateway that also merges follows every one of its predecessors.
            let in_flows = graph.predecessors_of_type(gateway, &[NodeType::Flow]);
            content.push(Token::text("after"));
            if in_flows.len() > 1 {
                content.push(Token::text(leading));
                append_alternatives(graph, &mut content, &in_flows, join, self.name())?;
            } else {
                let incoming = predecessor_ref(graph, m["FlowToGateway"], self.name())?;
                content.push(Token::backward(incoming));
            }

            let mut nodes = vec![gateway];
            nodes.extend(in_flows);
            nodes.extend(out_flows);

            rules.push(UnresolvedRule {
                depth: depths.min_of(nodes.iter().copied()),
                content,
                nodes: nodes.clone(),
            });
            graph.visit_all(&nodes);
        }

        Ok(rules)
    }
}

/// A gateway joining two or more incoming flows into one.
pub struct GatewayMergeTemplate {
    kind: NodeType,
}

impl GatewayMergeTemplate {
    pub fn new(kind: NodeType) -> Self {
        Self { kind }
    }
}

impl RuleTemplate for GatewayMergeTemplate {
    fn name(&self) -> &'static str {
        match self.kind {
            NodeType::Parallel => "parallel merge",
            NodeType::Inclusive => "inclusive merge",
            _ => "exclusive merge",
        }
    }

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error> {
        let mut pattern = Pattern::directed();
        let first = pattern.node("FlowToGateway1", &[NodeType::Flow]);
        let second = pattern.node("FlowToGateway2", &[NodeType::Flow]);
        let gateway = pattern.node("Gateway", &[self.kind]);
        let outgoing = pattern.node("FlowFromGateway", &[NodeType::Flow]);
        pattern.edge(first, gateway);
        pattern.edge(second, gateway);
        pattern.edge(gateway, outgoing);

        let (leading, join) = clauses(self.kind);
        let mut rules = vec![];

        for m in find_graph_pattern(graph, &pattern) {
            let gateway = m["Gateway"];
            if is_exhausted(graph, &m, &[gateway]) {
                continue;
            }

            let out_flow = m["FlowFromGateway"];
            let in_flows = graph.predecessors_of_type(gateway, &[NodeType::Flow]);

            let mut content = vec![
                Token::text("It is obligatory that"),
                Token::forward(successor_ref(graph, out_flow, self.name())?),
                Token::text("after"),
                Token::text(leading),
            ];
            append_alternatives(graph, &mut content, &in_flows, join, self.name())?;

            let mut nodes = vec![gateway, out_flow];
            nodes.extend(in_flows);

            rules.push(UnresolvedRule {
                depth: depths.get(gateway).unwrap_or(usize::MAX),
                content,
                nodes: nodes.clone(),
            });
            graph.visit_all(&nodes);
        }

        Ok(rules)
    }
}

/// An activity entered by two or more flows without a merging gateway.
pub struct ImplicitMergeTemplate;

impl RuleTemplate for ImplicitMergeTemplate {
    fn name(&self) -> &'static str {
        "implicit merge"
    }

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error> {
        let mut pattern = Pattern::directed();
        let first = pattern.node("FlowToActivity1", &[NodeType::Flow]);
        let second = pattern.node("FlowToActivity2", &[NodeType::Flow]);
        let activity = pattern.node("Activity", &[NodeType::Activity]);
        pattern.edge(first, activity);
        pattern.edge(second, activity);

        let mut rules = vec![];

        for m in find_graph_pattern(graph, &pattern) {
            let activity = m["Activity"];
            if is_exhausted(graph, &m, &[activity]) {
                continue;
            }

            let in_flows = graph.predecessors_of_type(activity, &[NodeType::Flow]);

            let mut content = vec![
                Token::text("It is obligatory that"),
                Token::forward(activity),
                Token::text("after"),
                Token::text("either"),
            ];
            append_alternatives(graph, &mut content, &in_flows, "or", self.name())?;

            let mut nodes = vec![activity];
            nodes.extend(in_flows);

            rules.push(UnresolvedRule {
                depth: depths.get(activity).unwrap_or(usize::MAX),
                content,
                nodes: nodes.clone(),
            });
            graph.visit_all(&nodes);
        }

        Ok(rules)
    }
}

/// Backward references to whatever precedes each flow, separated by `join`.
fn append_alternatives(
    graph: &ProcessGraph,
    content: &mut Vec<Token>,
    in_flows: &[NodeIndex],
    join: &str,
    construct: &'static str,
) -> Result<(), Error> {
    for (i, &flow) in in_flows.iter().enumerate() {
        if i > 0 {
            content.push(Token::text(join));
        }
        content.push(Token::backward(predecessor_ref(graph, flow, construct)?));
    }
    Ok(())
}
