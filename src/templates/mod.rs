//! Rule templates: one strategy per control-flow construct.
//!
//! Every template matches its pattern against the process graph, skips matches that are
//! already explained, emits unresolved rules and marks what it consumed as visited. The
//! order of [`rule_templates`] matters: larger constructs must claim their gateways
//! before the generic split, merge and sequence templates see them.

use std::fmt;

use petgraph::graph::NodeIndex;

use crate::Error;
use crate::graph::{Depths, Match, ProcessGraph};
use crate::mapping::{INFRASTRUCTURE, NodeType};

pub mod facts;
pub mod flow;
pub mod gateway;
pub mod loops;
pub mod optional;

pub use facts::{Fact, FactTemplate, apply_fact_templates};
pub use flow::SequenceFlowTemplate;
pub use gateway::{GatewayMergeTemplate, GatewaySplitTemplate, ImplicitMergeTemplate};
pub use loops::StructuredLoopTemplate;
pub use optional::OptionalTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveDirection {
    Forward,
    Backward,
}

/// A placeholder for a node whose wording is only known once all rules exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardReference {
    pub node: NodeIndex,
    pub direction: ResolveDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Ref(ForwardReference),
}

impl Token {
    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    pub fn forward(node: NodeIndex) -> Self {
        Token::Ref(ForwardReference {
            node,
            direction: ResolveDirection::Forward,
        })
    }

    pub fn backward(node: NodeIndex) -> Self {
        Token::Ref(ForwardReference {
            node,
            direction: ResolveDirection::Backward,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => f.write_str(text),
            Token::Ref(r) => write!(f, "<ref {}>", r.node.index()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedRule {
    pub depth: usize,
    pub content: Vec<Token>,
    /// Nodes this rule explains; references to them resolve to this rule.
    pub nodes: Vec<NodeIndex>,
}

impl UnresolvedRule {
    pub fn has_references(&self) -> bool {
        self.content.iter().any(|t| matches!(t, Token::Ref(_)))
    }
}

pub trait RuleTemplate {
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        graph: &mut ProcessGraph,
        depths: &Depths,
    ) -> Result<Vec<UnresolvedRule>, Error>;
}

/// All rule templates in the order they have to run.
pub fn rule_templates(include_tags: bool) -> Vec<Box<dyn RuleTemplate>> {
    vec![
        Box::new(StructuredLoopTemplate { include_tags }),
        Box::new(OptionalTemplate { include_tags }),
        Box::new(GatewaySplitTemplate::new(NodeType::Exclusive, include_tags)),
        Box::new(GatewayMergeTemplate::new(NodeType::Exclusive)),
        Box::new(ImplicitMergeTemplate),
        Box::new(GatewaySplitTemplate::new(NodeType::Parallel, include_tags)),
        Box::new(GatewayMergeTemplate::new(NodeType::Parallel)),
        Box::new(GatewaySplitTemplate::new(NodeType::Inclusive, include_tags)),
        Box::new(GatewayMergeTemplate::new(NodeType::Inclusive)),
        Box::new(SequenceFlowTemplate),
    ]
}

/// A match is exhausted when every node in it is explained or when one of the nodes the
/// template anchors its rules on is.
pub(crate) fn is_exhausted(graph: &ProcessGraph, m: &Match, anchors: &[NodeIndex]) -> bool {
    m.nodes().all(|n| graph.is_visited(n)) || anchors.iter().any(|&n| graph.is_visited(n))
}

/// `in case {gateway label} {flow label}`, or nothing when both labels are empty.
pub(crate) fn condition(
    graph: &ProcessGraph,
    gateway: NodeIndex,
    flow: NodeIndex,
    keyword: &str,
    include_tags: bool,
) -> Vec<Token> {
    let text = format!("{} {}", graph.label(gateway), graph.label(flow));
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }
    let text = if include_tags {
        format!("<cond>{text}</cond>")
    } else {
        text.to_string()
    };
    vec![Token::text(keyword), Token::Text(text)]
}

/// First node after `flow` that is not infrastructure.
pub(crate) fn successor_ref(
    graph: &ProcessGraph,
    flow: NodeIndex,
    construct: &'static str,
) -> Result<NodeIndex, Error> {
    let next = graph.successors_not_of_type(flow, INFRASTRUCTURE);
    check_ref(graph, flow, next.first().copied(), "successor", construct)
}

/// First node before `flow` that is not infrastructure.
pub(crate) fn predecessor_ref(
    graph: &ProcessGraph,
    flow: NodeIndex,
    construct: &'static str,
) -> Result<NodeIndex, Error> {
    let prev = graph.predecessors_not_of_type(flow, INFRASTRUCTURE);
    check_ref(graph, flow, prev.first().copied(), "predecessor", construct)
}

fn check_ref(
    graph: &ProcessGraph,
    flow: NodeIndex,
    found: Option<NodeIndex>,
    side: &str,
    construct: &'static str,
) -> Result<NodeIndex, Error> {
    let flow_id = &graph.node(flow).id;
    match found {
        None => Err(Error::structure(
            construct,
            format!("flow '{flow_id}' has no {side}"),
        )),
        Some(n) if graph.kind(n) == NodeType::Flow => Err(Error::structure(
            construct,
            format!("{side} of flow '{flow_id}' is the flow '{}'", graph.node(n).id),
        )),
        Some(n) => Ok(n),
    }
}
