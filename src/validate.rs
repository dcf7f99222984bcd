use petgraph::algo::connected_components;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::graph::depth::BehaviourView;

pub type ValidationResult<T = ()> = Result<T, Vec<ValidationError>>;

/// Checks the preconditions of the depth computation on the behaviour subgraph:
/// - at least one behaviour node
/// - weak connectivity
/// - at least one node without predecessors
pub(crate) fn check_behaviour(view: &BehaviourView) -> ValidationResult {
    if view.graph.node_count() == 0 {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::EmptyProcess,
            "Process has no behaviour nodes".to_string(),
        )]);
    }

    let mut errors = vec![];

    let components = connected_components(&view.graph);
    if components != 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::DisconnectedProcess,
            format!("Behaviour subgraph is split into {components} components"),
        ));
    }

    if view.roots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingRoot,
            "Behaviour subgraph has no node without predecessors".to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
