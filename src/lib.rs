pub mod batch;
mod error;
pub mod graph;
pub mod lexicon;
mod mapping;
pub mod postprocess;
mod resolve;
mod shape;
pub mod templates;
mod validate;

#[cfg(test)]
mod test_fixtures;

use log::debug;

pub use error::{Error, ValidationError, ValidationErrorKind};
pub use graph::{Depths, ProcessGraph, build_graph, node_depths};
pub use lexicon::{Lexicon, TableLexicon};
pub use mapping::{NodeType, StencilMapping};
pub use resolve::{Rule, resolve_rules};
pub use shape::Shape;
pub use templates::{Fact, UnresolvedRule, apply_fact_templates};
pub use validate::ValidationResult;

#[derive(Debug, Clone)]
pub struct Options {
    /// Wrap actors, activities and conditions in `<actor>`, `<activity>` and `<cond>` tags.
    pub include_tags: bool,
    /// Upper bound on reference resolution passes.
    pub max_resolve_passes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            include_tags: false,
            max_resolve_passes: 20,
        }
    }
}

/// Rules and facts generated for one process model.
#[derive(Debug, Clone, Default)]
pub struct Sbvr {
    pub rules: Vec<Rule>,
    pub facts: Vec<Fact>,
    /// Behaviour nodes no rule explains, as `label (type)`.
    pub unexplained: Vec<String>,
}

impl Sbvr {
    #[must_use]
    pub fn rule_lines(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|r| format!("R{}: {}", r.id, r.text))
            .collect()
    }

    #[must_use]
    pub fn vocabulary(&self) -> Vec<String> {
        self.facts.iter().map(|f| f.text.clone()).collect()
    }
}

/// Converts a shape tree into rules and facts.
pub fn generate(
    shape: &Shape,
    mapping: &StencilMapping,
    lexicon: &dyn Lexicon,
    options: &Options,
) -> Result<Sbvr, Error> {
    let mut graph = build_graph(shape, mapping);
    debug!(
        "Built graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    postprocess::post_process_graph(&mut graph, lexicon)?;
    generate_from_graph(&mut graph, options)
}

/// Runs templates and reference resolution on an already built and processed graph.
pub fn generate_from_graph(graph: &mut ProcessGraph, options: &Options) -> Result<Sbvr, Error> {
    let depths = node_depths(graph)?;
    let unresolved = apply_rule_templates(graph, &depths, options.include_tags)?;
    let rules = resolve_rules(unresolved, graph, options);

    Ok(Sbvr {
        rules,
        facts: apply_fact_templates(graph),
        unexplained: graph.unexplained(),
    })
}

/// Runs every rule template in order and collects what they produce.
pub fn apply_rule_templates(
    graph: &mut ProcessGraph,
    depths: &Depths,
    include_tags: bool,
) -> Result<Vec<UnresolvedRule>, Error> {
    let mut rules = vec![];
    for template in templates::rule_templates(include_tags) {
        let generated = template.generate(graph, depths)?;
        if !generated.is_empty() {
            debug!("{}: {} rules", template.name(), generated.len());
        }
        rules.extend(generated);
    }
    Ok(rules)
}
