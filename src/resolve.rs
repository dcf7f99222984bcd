//! Turns unresolved rules into final rule text.
//!
//! Rules are ordered by depth and numbered. Every reference is then rewritten pass by pass
//! until none is left or the pass limit is hit: events and activities become their
//! wording, gateways become a citation of the rule explaining them, flows are followed.

use std::collections::HashMap;

use log::{debug, trace, warn};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::Options;
use crate::graph::ProcessGraph;
use crate::mapping::{INFRASTRUCTURE, NodeType};
use crate::templates::{ForwardReference, ResolveDirection, Token, UnresolvedRule};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub id: usize,
    pub depth: usize,
    pub text: String,
}

struct Resolver {
    owners: HashMap<NodeIndex, usize>,
    include_tags: bool,
}

pub fn resolve_rules(
    mut rules: Vec<UnresolvedRule>,
    graph: &mut ProcessGraph,
    options: &Options,
) -> Vec<Rule> {
    rules.sort_by_key(|r| r.depth);

    let mut owners = HashMap::new();
    for (i, rule) in rules.iter().enumerate() {
        for &node in &rule.nodes {
            owners.insert(node, i);
        }
    }
    let resolver = Resolver {
        owners,
        include_tags: options.include_tags,
    };

    for pass in 0..options.max_resolve_passes {
        if !rules.iter().any(UnresolvedRule::has_references) {
            debug!("References resolved after {pass} passes");
            break;
        }
        for rule in &mut rules {
            let mut content = Vec::with_capacity(rule.content.len());
            for token in std::mem::take(&mut rule.content) {
                match token {
                    Token::Ref(r) => content.extend(resolver.resolve(graph, r)),
                    text => content.push(text),
                }
            }
            rule.content = content;
            if rule.has_references() {
                let text: String = rule.content.iter().map(Token::to_string).collect();
                trace!("Pass {pass}: {text}");
            }
        }
    }

    rules
        .into_iter()
        .enumerate()
        .map(|(id, rule)| Rule {
            id,
            depth: rule.depth,
            text: resolver.finish(graph, rule.content),
        })
        .collect()
}

impl Resolver {
    fn resolve(&self, graph: &mut ProcessGraph, r: ForwardReference) -> Vec<Token> {
        let node = r.node;
        match graph.kind(node) {
            NodeType::StartEvent => {
                graph.visit(node);
                vec![Token::text("the process starts")]
            }
            NodeType::EndEvent => {
                graph.visit(node);
                vec![Token::text("the process ends")]
            }
            NodeType::Activity => {
                graph.visit(node);
                vec![Token::Text(self.activity(graph, node))]
            }
            NodeType::Flow => match neighbour(graph, node, r.direction) {
                Some(next) => vec![Token::Ref(ForwardReference { node: next, ..r })],
                None => vec![Token::Ref(r)],
            },
            kind if kind.is_infrastructure() => vec![Token::text(graph.label(node))],
            kind => match self.owners.get(&node) {
                Some(i) => vec![Token::Text(format!("rule {i}"))],
                None if kind.is_gateway() => self.expand_gateway(graph, r, kind),
                None => vec![Token::Ref(r)],
            },
        }
    }

    /// Lists the alternatives around a gateway no rule explains, joined with its clauses.
    fn expand_gateway(
        &self,
        graph: &mut ProcessGraph,
        r: ForwardReference,
        kind: NodeType,
    ) -> Vec<Token> {
        let flows = match r.direction {
            ResolveDirection::Forward => graph.successors_of_type(r.node, &[NodeType::Flow]),
            ResolveDirection::Backward => graph.predecessors_of_type(r.node, &[NodeType::Flow]),
        };
        let alternatives: Vec<_> = flows
            .into_iter()
            .filter_map(|flow| neighbour(graph, flow, r.direction))
            .map(|node| Token::Ref(ForwardReference { node, ..r }))
            .collect();

        if alternatives.is_empty() {
            return vec![Token::Ref(r)];
        }
        graph.visit(r.node);
        if alternatives.len() == 1 {
            return alternatives;
        }

        let (leading, join) = kind.clauses().unwrap_or(("one of", "or"));
        let mut tokens = vec![Token::text(leading)];
        for (i, alternative) in alternatives.into_iter().enumerate() {
            if i > 0 {
                tokens.push(Token::text(join));
            }
            tokens.push(alternative);
        }
        tokens
    }

    fn activity(&self, graph: &ProcessGraph, node: NodeIndex) -> String {
        let label = graph.label(node);
        let actor = graph
            .actor_of(node)
            .map(|a| graph.label(a))
            .filter(|a| !a.is_empty());

        match (actor, self.include_tags) {
            (Some(actor), true) => {
                format!("<actor>{actor}</actor> <activity>{label}</activity>")
            }
            (None, true) => format!("<activity>{label}</activity>"),
            (Some(actor), false) => format!("{actor} {label}"),
            (None, false) => label.to_string(),
        }
    }

    fn finish(&self, graph: &ProcessGraph, content: Vec<Token>) -> String {
        content
            .into_iter()
            .map(|token| match token {
                Token::Text(text) => text,
                Token::Ref(r) => {
                    let node = graph.node(r.node);
                    warn!("Unresolved reference to {} '{}'", node.kind, node.label);
                    match self.owners.get(&r.node) {
                        Some(i) => format!("rule {i}"),
                        None if node.label.is_empty() => node.id.clone(),
                        None => node.label.clone(),
                    }
                }
            })
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn neighbour(
    graph: &ProcessGraph,
    flow: NodeIndex,
    direction: ResolveDirection,
) -> Option<NodeIndex> {
    let candidates = match direction {
        ResolveDirection::Forward => graph.successors_not_of_type(flow, INFRASTRUCTURE),
        ResolveDirection::Backward => graph.predecessors_not_of_type(flow, INFRASTRUCTURE),
    };
    candidates.first().copied()
}
