use log::debug;

use crate::Error;
use crate::graph::ProcessGraph;
use crate::lexicon::{Lexicon, PartOfSpeech};
use crate::mapping::NodeType;

/// An in-place rewrite of the process graph run before any template.
pub trait GraphProcessor {
    fn process(&self, graph: &mut ProcessGraph) -> Result<(), Error>;
}

/// Rewrites activities named by a noun ("approval") into the verb it derives from.
pub struct NounActivityProcessor<'a> {
    pub lexicon: &'a dyn Lexicon,
}

impl GraphProcessor for NounActivityProcessor<'_> {
    fn process(&self, graph: &mut ProcessGraph) -> Result<(), Error> {
        let activities: Vec<_> = graph.nodes_of_type(NodeType::Activity).collect();
        for idx in activities {
            let label = graph.label(idx).trim().to_string();
            if label.is_empty() {
                continue;
            }

            let root = self
                .lexicon
                .root(&label)
                .ok_or_else(|| Error::MissingRoot(label.clone()))?;

            if root.pos != PartOfSpeech::Noun {
                continue;
            }
            if let Some(verb) = self.lexicon.verb_form(&label) {
                debug!("Activity '{label}' renamed to '{verb}'");
                graph.set_label(idx, verb);
            }
        }
        Ok(())
    }
}

/// Joins labels spread over several lines.
pub struct MultiLineLabelProcessor;

impl GraphProcessor for MultiLineLabelProcessor {
    fn process(&self, graph: &mut ProcessGraph) -> Result<(), Error> {
        let nodes: Vec<_> = graph.node_indices().collect();
        for idx in nodes {
            let label = graph.label(idx);
            if label.contains('\n') {
                let flattened = label.replace("\r\n", " ").replace('\n', " ");
                graph.set_label(idx, flattened);
            }
        }
        Ok(())
    }
}

/// Names unlabeled actors `Actor 1`, `Actor 2`, ... in graph order.
pub struct UnlabeledActorProcessor;

impl GraphProcessor for UnlabeledActorProcessor {
    fn process(&self, graph: &mut ProcessGraph) -> Result<(), Error> {
        let unlabeled: Vec<_> = graph
            .nodes_of_type(NodeType::Actor)
            .filter(|&idx| graph.label(idx).is_empty())
            .collect();
        for (n, idx) in unlabeled.into_iter().enumerate() {
            graph.set_label(idx, format!("Actor {}", n + 1));
        }
        Ok(())
    }
}

/// Runs the standard processors in order.
pub fn post_process_graph(graph: &mut ProcessGraph, lexicon: &dyn Lexicon) -> Result<(), Error> {
    let processors: [&dyn GraphProcessor; 3] = [
        &NounActivityProcessor { lexicon },
        &MultiLineLabelProcessor,
        &UnlabeledActorProcessor,
    ];
    for processor in processors {
        processor.process(graph)?;
    }
    Ok(())
}
