//! Word-level knowledge used to normalize activity labels.
//!
//! The generator only needs two answers from a lexicon: which word carries a label and
//! whether it is a verb or a noun, and which verb a noun derives from. Anything able to
//! answer those (a tagger, a word net, a table) can be plugged in through [`Lexicon`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Verb,
    Noun,
    Other,
}

/// The grammatical root of a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRoot {
    pub word: String,
    pub pos: PartOfSpeech,
}

pub trait Lexicon {
    /// The root of `label`, or `None` when the label has no recognizable root.
    fn root(&self, label: &str) -> Option<LabelRoot>;

    /// A verb derived from `word`, if one is known.
    fn verb_form(&self, word: &str) -> Option<String>;
}

/// Lexicon backed by plain word lists.
///
/// The root of a label is its first word when that word is a known verb, otherwise its
/// last word when that is a known noun. Labels matching neither get their first word as
/// a root of unknown part of speech.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TableLexicon {
    #[serde(default)]
    pub verbs: HashSet<String>,
    #[serde(default)]
    pub nouns: HashSet<String>,
    /// noun -> verb
    #[serde(default)]
    pub derivations: HashMap<String, String>,
}

const ENGLISH_VERBS: &[&str] = &[
    "accept", "add", "approve", "archive", "arrange", "ask", "assess", "assign", "book",
    "calculate", "call", "cancel", "check", "choose", "close", "collect", "compare",
    "complete", "confirm", "contact", "create", "decide", "define", "deliver", "determine",
    "document", "download", "enter", "evaluate", "examine", "fill", "file", "finish",
    "forward", "get", "handle", "hire", "identify", "inform", "inspect", "install",
    "invite", "issue", "load", "make", "notify", "open", "pack", "pay", "perform",
    "place", "plan", "prepare", "print", "process", "provide", "publish", "receive",
    "record", "register", "reject", "release", "repair", "request", "reserve", "review",
    "schedule", "select", "send", "ship", "sign", "start", "store", "submit", "take",
    "test", "transfer", "update", "upload", "validate", "verify", "wait", "write",
];

const ENGLISH_DERIVATIONS: &[(&str, &str)] = &[
    ("acceptance", "accept"),
    ("approval", "approve"),
    ("assessment", "assess"),
    ("assignment", "assign"),
    ("calculation", "calculate"),
    ("cancellation", "cancel"),
    ("check", "check"),
    ("collection", "collect"),
    ("completion", "complete"),
    ("confirmation", "confirm"),
    ("creation", "create"),
    ("decision", "decide"),
    ("delivery", "deliver"),
    ("evaluation", "evaluate"),
    ("examination", "examine"),
    ("identification", "identify"),
    ("inspection", "inspect"),
    ("installation", "install"),
    ("invitation", "invite"),
    ("notification", "notify"),
    ("payment", "pay"),
    ("preparation", "prepare"),
    ("publication", "publish"),
    ("receipt", "receive"),
    ("registration", "register"),
    ("rejection", "reject"),
    ("repair", "repair"),
    ("reservation", "reserve"),
    ("review", "review"),
    ("selection", "select"),
    ("shipment", "ship"),
    ("signature", "sign"),
    ("submission", "submit"),
    ("transfer", "transfer"),
    ("validation", "validate"),
    ("verification", "verify"),
];

const ENGLISH_NOUNS: &[&str] = &[
    "application", "candidate", "claim", "contract", "customer", "document", "form",
    "goods", "invoice", "offer", "order", "package", "product", "report", "request",
    "ticket",
];

impl TableLexicon {
    /// A small built-in English table covering common process vocabulary.
    pub fn english() -> Self {
        Self {
            verbs: ENGLISH_VERBS.iter().map(|w| w.to_string()).collect(),
            nouns: ENGLISH_NOUNS
                .iter()
                .chain(ENGLISH_DERIVATIONS.iter().map(|(noun, _)| noun))
                .map(|w| w.to_string())
                .collect(),
            derivations: ENGLISH_DERIVATIONS
                .iter()
                .map(|(noun, verb)| (noun.to_string(), verb.to_string()))
                .collect(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    fn is_noun(&self, word: &str) -> bool {
        self.nouns.contains(word) || self.derivations.contains_key(word)
    }
}

impl Lexicon for TableLexicon {
    fn root(&self, label: &str) -> Option<LabelRoot> {
        let words: Vec<String> = label
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let first = words.first()?;
        if self.verbs.contains(first) {
            return Some(LabelRoot {
                word: first.clone(),
                pos: PartOfSpeech::Verb,
            });
        }

        if let Some(last) = words.last()
            && self.is_noun(last)
        {
            return Some(LabelRoot {
                word: last.clone(),
                pos: PartOfSpeech::Noun,
            });
        }

        Some(LabelRoot {
            word: first.clone(),
            pos: PartOfSpeech::Other,
        })
    }

    fn verb_form(&self, word: &str) -> Option<String> {
        self.derivations.get(&word.trim().to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_verb_is_the_root() {
        let lexicon = TableLexicon::english();
        let root = lexicon.root("Approve order").unwrap();
        assert_eq!(root.word, "approve");
        assert_eq!(root.pos, PartOfSpeech::Verb);
    }

    #[test]
    fn test_trailing_noun_is_the_root() {
        let lexicon = TableLexicon::english();
        let root = lexicon.root("order approval").unwrap();
        assert_eq!(root.word, "approval");
        assert_eq!(root.pos, PartOfSpeech::Noun);
        assert_eq!(lexicon.verb_form("Approval"), Some("approve".to_string()));
        assert_eq!(lexicon.verb_form("order approval"), None);
    }

    #[test]
    fn test_unknown_words_have_an_untyped_root() {
        let lexicon = TableLexicon::english();
        let root = lexicon.root("frobnicate widgets").unwrap();
        assert_eq!(root.pos, PartOfSpeech::Other);
        assert!(lexicon.root("  ").is_none());
        assert!(lexicon.root("?!").is_none());
    }

    #[test]
    fn test_table_loads_from_json() {
        let lexicon = TableLexicon::from_json(
            r#"{ "verbs": ["bake"], "derivations": { "baking": "bake" } }"#,
        )
        .unwrap();

        assert_eq!(lexicon.root("bake bread").unwrap().pos, PartOfSpeech::Verb);
        assert_eq!(lexicon.root("baking").unwrap().pos, PartOfSpeech::Noun);
        assert_eq!(lexicon.verb_form("baking"), Some("bake".to_string()));
        assert!(lexicon.nouns.is_empty());
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = TableLexicon::from_json("{ verbs: 1 }").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
