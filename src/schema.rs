//! Input model for the JSON Schema dialect the FHIR definitions are published in.
//!
//! Only the keywords the translator understands are modelled; anything else in the
//! input (`$schema`, `id`, `discriminator`, ...) is ignored while decoding.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::io::Read;

/// Definitions table: definition name -> schema node.
///
/// A `null` entry decodes to `None` and is translated to an empty schema.
pub type Definitions = BTreeMap<String, Option<SchemaNode>>;

/// Top-level input document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDocument {
    /// Named definitions; missing means an empty table
    #[serde(default)]
    pub definitions: Definitions,
}

/// One node of the input schema tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub default: Option<Value>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(rename = "const")]
    pub const_value: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub examples: Vec<Value>,

    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<Number>,
    pub exclusive_minimum: Option<ExclusiveBound>,
    pub maximum: Option<Number>,
    pub exclusive_maximum: Option<ExclusiveBound>,
    pub multiple_of: Option<Number>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,

    pub items: Option<Box<SchemaNode>>,
    pub properties: Option<BTreeMap<String, Option<SchemaNode>>>,
    pub required: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub one_of: Vec<Option<SchemaNode>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub any_of: Vec<Option<SchemaNode>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub all_of: Vec<Option<SchemaNode>>,
}

/// A `null` list keyword decodes the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `exclusiveMinimum` / `exclusiveMaximum` as either a flag or a limit
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    /// OpenAPI 3.0 / draft-04 style: modifies `minimum`/`maximum`
    Flag(bool),
    /// draft-06 style: the exclusive limit itself
    Limit(Number),
}

impl SchemaNode {
    /// Returns the `$ref` value when it is present and non-empty
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }
}

impl SchemaDocument {
    /// Decodes a schema document from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::DecodeError(e.to_string()))
    }

    /// Reads the whole stream and decodes it
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_definitions() {
        let doc = SchemaDocument::from_slice(
            br##"{
                "$schema": "http://json-schema.org/draft-06/schema#",
                "definitions": {
                    "Patient": {
                        "type": "object",
                        "properties": {
                            "id": { "$ref": "#/definitions/id" },
                            "name": { "type": "array", "items": { "$ref": "#/definitions/HumanName" } }
                        },
                        "required": ["id"]
                    },
                    "code": { "type": "string", "pattern": "^[^\\s]+$" }
                }
            }"##,
        )
        .unwrap();

        assert_eq!(doc.definitions.len(), 2);
        let patient = doc.definitions["Patient"].as_ref().unwrap();
        assert_eq!(patient.schema_type.as_deref(), Some("object"));
        assert_eq!(patient.required, Some(vec!["id".to_string()]));

        let props = patient.properties.as_ref().unwrap();
        let id = props["id"].as_ref().unwrap();
        assert_eq!(id.reference(), Some("#/definitions/id"));
        let name = props["name"].as_ref().unwrap();
        assert_eq!(
            name.items.as_ref().unwrap().reference(),
            Some("#/definitions/HumanName")
        );
    }

    #[test]
    fn test_decode_constraints_and_values() {
        let doc = SchemaDocument::from_slice(
            br#"{
                "definitions": {
                    "status": {
                        "const": "final",
                        "examples": ["a", "b"],
                        "minLength": 1,
                        "exclusiveMinimum": 0,
                        "exclusiveMaximum": true,
                        "oneOf": [{ "type": "string" }, { "type": "integer" }]
                    }
                }
            }"#,
        )
        .unwrap();

        let status = doc.definitions["status"].as_ref().unwrap();
        assert_eq!(status.const_value, Some(json!("final")));
        assert_eq!(status.examples, vec![json!("a"), json!("b")]);
        assert_eq!(status.min_length, Some(1));
        assert_eq!(status.exclusive_minimum, Some(ExclusiveBound::Limit(Number::from(0))));
        assert_eq!(status.exclusive_maximum, Some(ExclusiveBound::Flag(true)));
        assert_eq!(status.one_of.len(), 2);
    }

    #[test]
    fn test_null_definition_decodes_to_none() {
        let doc = SchemaDocument::from_slice(br#"{"definitions": {"Empty": null}}"#).unwrap();
        assert!(doc.definitions["Empty"].is_none());
    }

    #[test]
    fn test_null_list_keywords_decode_as_empty() {
        let doc = SchemaDocument::from_slice(
            br#"{"definitions": {"X": {"oneOf": null, "anyOf": null, "allOf": null, "examples": null}}}"#,
        )
        .unwrap();

        let x = doc.definitions["X"].as_ref().unwrap();
        assert!(x.one_of.is_empty());
        assert!(x.any_of.is_empty());
        assert!(x.all_of.is_empty());
        assert!(x.examples.is_empty());
    }

    #[test]
    fn test_null_composition_member_decodes_to_none() {
        let doc = SchemaDocument::from_slice(
            br#"{"definitions": {"X": {"oneOf": [null, {"type": "string"}]}}}"#,
        )
        .unwrap();

        let x = doc.definitions["X"].as_ref().unwrap();
        assert_eq!(x.one_of.len(), 2);
        assert!(x.one_of[0].is_none());
        assert_eq!(x.one_of[1].as_ref().unwrap().schema_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_missing_definitions_is_empty() {
        let doc = SchemaDocument::from_slice(b"{}").unwrap();
        assert!(doc.definitions.is_empty());
    }

    #[test]
    fn test_empty_reference_is_absent() {
        let node = SchemaNode {
            reference: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(node.reference(), None);
    }

    #[test]
    fn test_malformed_input_is_decode_error() {
        let err = SchemaDocument::from_slice(b"{\"definitions\": ").unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));

        let err = SchemaDocument::from_slice(br#"{"definitions": {"X": {"type": 5}}}"#).unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[test]
    fn test_from_reader() {
        let input = br#"{"definitions": {"string": {"type": "string"}}}"#;
        let doc = SchemaDocument::from_reader(&input[..]).unwrap();
        assert!(doc.definitions.contains_key("string"));
    }
}
