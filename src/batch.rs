//! Per-model processing of model collections.
//!
//! Every model is converted independently; an error is attributed to its model and never
//! stops the rest of the batch.

use std::io::BufRead;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lexicon::Lexicon;
use crate::mapping::StencilMapping;
use crate::shape::Shape;
use crate::{Error, Options, generate};

/// One model of a collection. `model_json` holds the shape tree either as an object or
/// as a string with embedded JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub model_json: Value,
}

impl ModelRecord {
    pub fn shape(&self) -> Result<Shape, Error> {
        match &self.model_json {
            Value::String(embedded) => Shape::from_json(embedded),
            value => Ok(Shape::deserialize(value)?),
        }
    }
}

/// Rules and vocabulary generated for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSbvr {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub rules: Vec<String>,
    pub vocabulary: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unexplained: Vec<String>,
}

pub struct Batch<'a> {
    pub mapping: &'a StencilMapping,
    pub lexicon: &'a dyn Lexicon,
    pub options: &'a Options,
    /// Reject models using stencils the templates cannot express.
    pub strict: bool,
}

impl Batch<'_> {
    pub fn process_model(&self, record: &ModelRecord) -> Result<ModelSbvr, Error> {
        self.convert(record).map_err(|e| e.in_model(&record.id))
    }

    fn convert(&self, record: &ModelRecord) -> Result<ModelSbvr, Error> {
        let shape = record.shape()?;

        if self.strict {
            let unsupported = self.mapping.disallowed_in(&shape);
            if !unsupported.is_empty() {
                return Err(Error::Unsupported(unsupported));
            }
        }

        let sbvr = generate(&shape, self.mapping, self.lexicon, self.options)?;
        if !sbvr.unexplained.is_empty() {
            warn!(
                "Unexplained nodes in {}: {}",
                record.id,
                sbvr.unexplained.join(", ")
            );
        }

        Ok(ModelSbvr {
            id: record.id.clone(),
            name: record.name.clone(),
            namespace: record.namespace.clone(),
            rules: sbvr.rule_lines(),
            vocabulary: sbvr.vocabulary(),
            unexplained: sbvr.unexplained,
        })
    }

    /// Processes every record, logging failures as they happen.
    pub fn process_batch<'r>(
        &self,
        records: impl IntoIterator<Item = &'r ModelRecord>,
    ) -> Vec<Result<ModelSbvr, Error>> {
        let results: Vec<_> = records
            .into_iter()
            .map(|record| {
                let result = self.process_model(record);
                if let Err(e) = &result {
                    warn!("{e}");
                }
                result
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!("Processed {} models, {failed} failed", results.len());
        results
    }
}

/// Reads one record per non-empty line.
pub fn read_records(reader: impl BufRead) -> impl Iterator<Item = Result<ModelRecord, Error>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(Error::from)),
        Err(e) => Some(Err(Error::from(e))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::*;
    use serde_json::json;

    fn record(id: &str, model: Value) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            name: format!("model {id}"),
            namespace: "test".to_string(),
            model_json: model,
        }
    }

    fn sequence() -> Value {
        serde_json::to_value(diagram(vec![lane(
            "lane",
            "Alice",
            vec![
                start("s", &["f1"]),
                flow("f1", "", "a"),
                task("a", "review", &["f2"]),
                flow("f2", "", "e"),
                end("e"),
            ],
        )]))
        .unwrap()
    }

    fn batch<'a>(mapping: &'a StencilMapping, options: &'a Options, strict: bool) -> Batch<'a> {
        Batch {
            mapping,
            lexicon: &VerbLexicon,
            options,
            strict,
        }
    }

    #[test]
    fn test_embedded_json_string_is_accepted() {
        let embedded = record("1", Value::String(sequence().to_string()));
        let object = record("2", sequence());

        assert_eq!(embedded.shape().unwrap().child_shapes.len(), 1);
        assert_eq!(object.shape().unwrap().child_shapes.len(), 1);
        assert!(record("3", json!(42)).shape().is_err());
    }

    #[test]
    fn test_failures_are_isolated_per_model() {
        let mapping = StencilMapping::sap_sam();
        let options = Options::default();
        let disconnected = json!({
            "resourceId": "canvas",
            "stencil": { "id": "BPMNDiagram" },
            "childShapes": [
                { "resourceId": "a", "stencil": { "id": "Task" }, "properties": { "name": "x" } },
                { "resourceId": "b", "stencil": { "id": "Task" }, "properties": { "name": "y" } }
            ]
        });
        let records = vec![
            record("ok", sequence()),
            record("broken", disconnected),
            record("bad-json", Value::String("{".to_string())),
        ];

        let results = batch(&mapping, &options, false).process_batch(&records);
        assert_eq!(results.len(), 3);

        let ok = results[0].as_ref().unwrap();
        assert_eq!(ok.id, "ok");
        assert_eq!(ok.rules[0], "R0: It is obligatory that Alice review after the process starts");
        assert_eq!(ok.vocabulary, vec!["Alice", "review"]);
        assert!(ok.unexplained.is_empty());

        match &results[1] {
            Err(Error::Model { model_id, source }) => {
                assert_eq!(model_id, "broken");
                assert!(matches!(**source, Error::InvalidGraph(_)));
            }
            other => panic!("expected a model error, got {other:?}"),
        }
        assert!(results[2].is_err());
    }

    #[test]
    fn test_strict_mode_rejects_disallowed_stencils() {
        let mapping = StencilMapping::sap_sam();
        let options = Options::default();
        let mut model = sequence();
        model["childShapes"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "resourceId": "g", "stencil": { "id": "EventbasedGateway" } }));
        let record = record("strict", model);

        let err = batch(&mapping, &options, true)
            .process_model(&record)
            .unwrap_err();
        match err {
            Error::Model { source, .. } => {
                assert!(matches!(
                    *source,
                    Error::Unsupported(ref s) if s == &["EventbasedGateway"]
                ));
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert!(batch(&mapping, &options, false).process_model(&record).is_ok());
    }

    #[test]
    fn test_records_are_read_line_by_line() {
        let input = format!(
            "{}\n\n{}\nnot json\n",
            json!({ "id": "1", "model_json": "{}" }),
            json!({ "id": "2", "name": "two", "model_json": {} }),
        );

        let records: Vec<_> = read_records(input.as_bytes()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().id, "1");
        assert_eq!(records[1].as_ref().unwrap().name, "two");
        assert!(matches!(records[2], Err(Error::ParseError(_))));
    }
}
