use log::debug;

use super::ProcessGraph;
use crate::mapping::StencilMapping;
use crate::shape::Shape;

const ACTOR_CONTAINERS: &[&str] = &["Lane", "Pool"];

/// Converts a shape tree into a process graph. Shapes whose stencil is not mapped are
/// dropped together with every edge touching them.
pub fn build_graph(root: &Shape, mapping: &StencilMapping) -> ProcessGraph {
    let mut builder = GraphBuilder::new(mapping);
    builder.visit(root, &mut vec![]);
    builder.finish()
}

struct GraphBuilder<'a> {
    mapping: &'a StencilMapping,
    graph: ProcessGraph,
    edges: Vec<(String, String)>,
}

impl<'a> GraphBuilder<'a> {
    fn new(mapping: &'a StencilMapping) -> Self {
        Self {
            mapping,
            graph: ProcessGraph::new(),
            edges: Vec::new(),
        }
    }

    fn visit<'s>(&mut self, shape: &'s Shape, parents: &mut Vec<&'s Shape>) {
        self.add_shape(shape, parents);

        parents.push(shape);
        for child in &shape.child_shapes {
            self.visit(child, parents);
        }
        parents.pop();
    }

    fn add_shape(&mut self, shape: &Shape, parents: &[&Shape]) {
        let stencil = shape.stencil();
        let Some(kind) = self.mapping.get(stencil) else {
            if !self.mapping.is_known(stencil) {
                debug!("Unknown stencil '{stencil}' on shape '{}'", shape.resource_id);
            }
            return;
        };

        if shape.resource_id.is_empty() {
            debug!("Skipping '{stencil}' shape without resource id");
            return;
        }

        if stencil == "Pool" && shape.name().is_empty() {
            return;
        }

        self.graph.add_node(&shape.resource_id, kind, shape.name());

        for target in &shape.outgoing {
            self.edges
                .push((shape.resource_id.clone(), target.resource_id.clone()));
        }

        if let Some(actor) = executing_actor(parents) {
            self.edges
                .push((shape.resource_id.clone(), actor.resource_id.clone()));
        }
    }

    fn finish(mut self) -> ProcessGraph {
        for (source, target) in &self.edges {
            if let (Some(s), Some(t)) = (self.graph.find(source), self.graph.find(target)) {
                self.graph.add_edge(s, t);
            }
        }
        self.graph
    }
}

/// Nearest named lane or pool, falling back to the nearest one without a name.
fn executing_actor<'s>(parents: &[&'s Shape]) -> Option<&'s Shape> {
    let mut candidates = parents
        .iter()
        .rev()
        .filter(|p| ACTOR_CONTAINERS.contains(&p.stencil()))
        .peekable();

    let nearest = candidates.peek().copied().copied();
    candidates
        .find(|p| !p.name().is_empty())
        .copied()
        .or(nearest)
}
