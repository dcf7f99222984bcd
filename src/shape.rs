//! Serde model of the nested shape tree exported by the modelling tool.
//!
//! Every field falls back to its default so that partially broken exports still
//! deserialize; shapes missing the fields a step needs are skipped by that step.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub stencil: Stencil,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub outgoing: Vec<ShapeRef>,
    #[serde(default)]
    pub child_shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Stencil {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRef {
    #[serde(default)]
    pub resource_id: String,
}

impl Shape {
    pub fn stencil(&self) -> &str {
        &self.stencil.id
    }

    /// The trimmed `name` property, empty when absent or not a string.
    pub fn name(&self) -> &str {
        self.properties
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
    }

    pub fn from_json(input: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(input)?)
    }
}
