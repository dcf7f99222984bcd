//! Stencil names of the modelling tool mapped onto the semantic node types used by the
//! rule templates.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Activity,
    Actor,
    StartEvent,
    EndEvent,
    Flow,
    Exclusive,
    Inclusive,
    Parallel,
    DataObject,
    Uses,
}

/// Nodes that only carry ownership or data and are looked through when a template
/// resolves its neighbours.
pub const INFRASTRUCTURE: &[NodeType] = &[NodeType::DataObject, NodeType::Uses, NodeType::Actor];

impl NodeType {
    pub fn is_gateway(self) -> bool {
        matches!(
            self,
            NodeType::Exclusive | NodeType::Inclusive | NodeType::Parallel
        )
    }

    /// Node types that make up the control flow of a process, flows included.
    pub fn is_behaviour(self) -> bool {
        matches!(
            self,
            NodeType::Activity
                | NodeType::StartEvent
                | NodeType::EndEvent
                | NodeType::Flow
                | NodeType::Exclusive
                | NodeType::Inclusive
                | NodeType::Parallel
        )
    }

    pub fn is_infrastructure(self) -> bool {
        INFRASTRUCTURE.contains(&self)
    }

    /// Leading clause and join word used when the branches of a gateway are listed.
    pub fn clauses(self) -> Option<(&'static str, &'static str)> {
        match self {
            NodeType::Exclusive => Some(("one of", "or")),
            NodeType::Inclusive => Some(("at least one of", "or")),
            NodeType::Parallel => Some(("all of", "and")),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Activity => "Activity",
            NodeType::Actor => "Actor",
            NodeType::StartEvent => "StartEvent",
            NodeType::EndEvent => "EndEvent",
            NodeType::Flow => "Flow",
            NodeType::Exclusive => "Exclusive",
            NodeType::Inclusive => "Inclusive",
            NodeType::Parallel => "Parallel",
            NodeType::DataObject => "DataObject",
            NodeType::Uses => "Uses",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StencilMapping {
    types: HashMap<String, NodeType>,
    ignored: HashSet<String>,
    disallowed: HashSet<String>,
}

const BEHAVIOUR: &[(&str, NodeType)] = &[
    ("Task", NodeType::Activity),
    ("CollapsedSubprocess", NodeType::Activity),
    ("StartMultipleEvent", NodeType::StartEvent),
    ("StartCompensationEvent", NodeType::StartEvent),
    ("StartConditionalEvent", NodeType::StartEvent),
    ("StartErrorEvent", NodeType::StartEvent),
    ("StartMessageEvent", NodeType::StartEvent),
    ("StartNoneEvent", NodeType::StartEvent),
    ("StartParallelMultipleEvent", NodeType::StartEvent),
    ("StartSignalEvent", NodeType::StartEvent),
    ("StartTimerEvent", NodeType::StartEvent),
    ("StartEscalationEvent", NodeType::StartEvent),
    ("EndCancelEvent", NodeType::EndEvent),
    ("EndCompensationEvent", NodeType::EndEvent),
    ("EndErrorEvent", NodeType::EndEvent),
    ("EndEscalationEvent", NodeType::EndEvent),
    ("EndMessageEvent", NodeType::EndEvent),
    ("EndMultipleEvent", NodeType::EndEvent),
    ("EndNoneEvent", NodeType::EndEvent),
    ("EndSignalEvent", NodeType::EndEvent),
    ("EndTerminateEvent", NodeType::EndEvent),
    ("SequenceFlow", NodeType::Flow),
    ("MessageFlow", NodeType::Flow),
    ("ParallelGateway", NodeType::Parallel),
    ("Exclusive_Databased_Gateway", NodeType::Exclusive),
    ("InclusiveGateway", NodeType::Inclusive),
];

const DATA: &[(&str, NodeType)] = &[
    ("DataObject", NodeType::DataObject),
    ("Association_Unidirectional", NodeType::Uses),
    ("Association_Undirected", NodeType::Uses),
    ("Association_Bidirectional", NodeType::Uses),
];

const ORGANIZATION: &[(&str, NodeType)] = &[
    ("Pool", NodeType::Actor),
    ("Lane", NodeType::Actor),
    ("VerticalPool", NodeType::Actor),
    ("VerticalLane", NodeType::Actor),
];

const IGNORED: &[&str] = &[
    "BPMNDiagram",
    "CollapsedPool",
    "CollapsedVerticalPool",
    "DataStore",
    "ITSystem",
    "TextAnnotation",
    "processparticipant",
    "Message",
];

const DISALLOWED: &[&str] = &[
    "IntermediateEvent",
    "IntermediateCancelEvent",
    "IntermediateTimerEvent",
    "IntermediateErrorEvent",
    "IntermediateMessageEvent",
    "IntermediateConditionalEvent",
    "IntermediateEscalationEvent",
    "IntermediateCompensationEventCatching",
    "IntermediateCompensationEventThrowing",
    "IntermediateMessageEventCatching",
    "IntermediateMessageEventThrowing",
    "IntermediateMultipleEventCatching",
    "IntermediateMultipleEventThrowing",
    "IntermediateSignalEventCatching",
    "IntermediateSignalEventThrowing",
    "IntermediateLinkEventCatching",
    "IntermediateLinkEventThrowing",
    "IntermediateEscalationEventCatching",
    "IntermediateEscalationEventThrowing",
    "IntermediateParallelMultipleEventCatching",
    "IntermediateParallelMultipleEventThrowing",
    "Subprocess",
    "Group",
    "CollapsedProcess",
    "CollapsedEventSubprocess",
    "EventSubprocess",
    "EventbasedGateway",
    "ComplexGateway",
    "ChoreographyTask",
    "ChoreographyParticipant",
];

impl StencilMapping {
    pub fn new(entries: impl IntoIterator<Item = (impl Into<String>, NodeType)>) -> Self {
        Self {
            types: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ignored: HashSet::new(),
            disallowed: HashSet::new(),
        }
    }

    /// The table used for the SAP-SAM model collection.
    pub fn sap_sam() -> Self {
        let mut mapping = Self::new(
            BEHAVIOUR
                .iter()
                .chain(DATA)
                .chain(ORGANIZATION)
                .map(|(stencil, kind)| (*stencil, *kind)),
        );
        mapping.ignored = IGNORED.iter().map(|s| s.to_string()).collect();
        mapping.disallowed = DISALLOWED.iter().map(|s| s.to_string()).collect();
        mapping
    }

    pub fn get(&self, stencil: &str) -> Option<NodeType> {
        self.types.get(stencil).copied()
    }

    pub fn is_ignored(&self, stencil: &str) -> bool {
        self.ignored.contains(stencil)
    }

    pub fn is_disallowed(&self, stencil: &str) -> bool {
        self.disallowed.contains(stencil)
    }

    pub fn is_known(&self, stencil: &str) -> bool {
        self.types.contains_key(stencil) || self.is_ignored(stencil) || self.is_disallowed(stencil)
    }

    /// Disallowed stencils used anywhere in the shape tree, in traversal order and
    /// without duplicates.
    pub fn disallowed_in(&self, shape: &Shape) -> Vec<String> {
        let mut found = vec![];
        collect_disallowed(self, shape, &mut found);
        found
    }
}

fn collect_disallowed(mapping: &StencilMapping, shape: &Shape, found: &mut Vec<String>) {
    let stencil = shape.stencil();
    if mapping.is_disallowed(stencil) && !found.iter().any(|s| s == stencil) {
        found.push(stencil.to_string());
    }
    for child in &shape.child_shapes {
        collect_disallowed(mapping, child, found);
    }
}
