//! Shape tree builders shared by the unit tests.

use serde_json::json;

use crate::lexicon::{LabelRoot, Lexicon, PartOfSpeech};
use crate::mapping::StencilMapping;
use crate::shape::Shape;
use crate::{Options, Sbvr};

pub fn shape(id: &str, stencil: &str, name: &str, outgoing: &[&str]) -> Shape {
    let outgoing: Vec<_> = outgoing.iter().map(|t| json!({ "resourceId": t })).collect();
    serde_json::from_value(json!({
        "resourceId": id,
        "stencil": { "id": stencil },
        "properties": { "name": name },
        "outgoing": outgoing,
    }))
    .unwrap()
}

fn container(id: &str, stencil: &str, name: &str, children: Vec<Shape>) -> Shape {
    let mut shape = shape(id, stencil, name, &[]);
    shape.child_shapes = children;
    shape
}

pub fn diagram(children: Vec<Shape>) -> Shape {
    container("canvas", "BPMNDiagram", "", children)
}

pub fn pool(id: &str, name: &str, children: Vec<Shape>) -> Shape {
    container(id, "Pool", name, children)
}

pub fn lane(id: &str, name: &str, children: Vec<Shape>) -> Shape {
    container(id, "Lane", name, children)
}

pub fn task(id: &str, name: &str, outgoing: &[&str]) -> Shape {
    shape(id, "Task", name, outgoing)
}

pub fn start(id: &str, outgoing: &[&str]) -> Shape {
    shape(id, "StartNoneEvent", "", outgoing)
}

pub fn end(id: &str) -> Shape {
    shape(id, "EndNoneEvent", "", &[])
}

pub fn flow(id: &str, name: &str, target: &str) -> Shape {
    shape(id, "SequenceFlow", name, &[target])
}

pub fn xor(id: &str, name: &str, outgoing: &[&str]) -> Shape {
    shape(id, "Exclusive_Databased_Gateway", name, outgoing)
}

pub fn and(id: &str, outgoing: &[&str]) -> Shape {
    shape(id, "ParallelGateway", "", outgoing)
}

pub fn or(id: &str, name: &str, outgoing: &[&str]) -> Shape {
    shape(id, "InclusiveGateway", name, outgoing)
}

/// Treats the first word of every label as a verb, so labels pass through unchanged.
pub struct VerbLexicon;

impl Lexicon for VerbLexicon {
    fn root(&self, label: &str) -> Option<LabelRoot> {
        label.split_whitespace().next().map(|word| LabelRoot {
            word: word.to_string(),
            pos: PartOfSpeech::Verb,
        })
    }

    fn verb_form(&self, _word: &str) -> Option<String> {
        None
    }
}

/// Runs the whole pipeline on a model drawn in a single lane called "Alice".
pub fn generate_in_lane(children: Vec<Shape>) -> Sbvr {
    let model = diagram(vec![lane("lane", "Alice", children)]);
    crate::generate(
        &model,
        &StencilMapping::sap_sam(),
        &VerbLexicon,
        &Options::default(),
    )
    .unwrap()
}

pub fn rule_texts(sbvr: &Sbvr) -> Vec<&str> {
    sbvr.rules.iter().map(|r| r.text.as_str()).collect()
}

/// Receive, then check until complete, then pay.
pub fn loop_model() -> Vec<Shape> {
    vec![
        start("s", &["f0"]),
        flow("f0", "", "a"),
        task("a", "receive claim", &["f1"]),
        flow("f1", "", "merge"),
        xor("merge", "", &["f2"]),
        flow("f2", "", "b"),
        task("b", "check claim", &["f3"]),
        flow("f3", "", "split"),
        xor("split", "complete?", &["back", "on"]),
        flow("back", "no", "merge"),
        flow("on", "yes", "c"),
        task("c", "pay", &["f4"]),
        flow("f4", "", "e"),
        end("e"),
    ]
}

/// Receive, optionally check, then pay.
pub fn optional_model() -> Vec<Shape> {
    vec![
        start("s", &["f0"]),
        flow("f0", "", "a"),
        task("a", "receive claim", &["f1"]),
        flow("f1", "", "split"),
        xor("split", "", &["do", "skip"]),
        flow("do", "suspicious", "b"),
        flow("skip", "trusted", "merge"),
        task("b", "check claim", &["f2"]),
        flow("f2", "", "merge"),
        xor("merge", "", &["f3"]),
        flow("f3", "", "c"),
        task("c", "pay", &["f4"]),
        flow("f4", "", "e"),
        end("e"),
    ]
}
