//! FHIR to OpenAPI - generates an OpenAPI 3 document from a FHIR JSON Schema.
//!
//! The input is a JSON Schema whose `definitions` hold every FHIR resource and data
//! type. Each definition becomes a component schema; each resource type (a name
//! starting with an upper-case letter) additionally gets a set of search and CRUD
//! paths wired to shared `Bundle` and `OperationOutcome` responses.
//!
//! # Architecture
//!
//! 1. [`schema`] - Decodes the input definitions table
//! 2. [`type_registry`] - Maps FHIR primitive definitions to OpenAPI primitives
//! 3. [`schema_translator`] - Converts schema nodes to OpenAPI schemas
//! 4. [`collector`] - Walks the definitions, filters names, classifies resources
//! 5. [`path_synthesizer`] - Generates the REST paths of one resource type
//! 6. [`openapi_builder`] - Seeds the base document and merges the generated parts
//! 7. [`serializer`] - Serializes the document to JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use fhir_to_openapi::{generate, serializer::OutputFormat};
//! use std::fs::File;
//!
//! let input = File::open("fhir.schema.json").unwrap();
//! let output = File::create("fhir.openapi.yaml").unwrap();
//! generate(input, output, OutputFormat::Yaml).unwrap();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod collector;
pub mod error;
pub mod openapi_builder;
pub mod path_synthesizer;
pub mod schema;
pub mod schema_translator;
pub mod serializer;
pub mod type_registry;

use crate::collector::{LeadingUppercase, ResourceClassifier, SchemaCollector, ShadowFilter};
use crate::error::Result;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::schema::SchemaDocument;
use crate::schema_translator::SchemaTranslator;
use crate::serializer::{write_document, OutputFormat};
use crate::type_registry::TypeRegistry;
use log::debug;
use std::io::{Read, Write};

/// Counts describing one generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Definitions read from the input
    pub definitions: usize,
    /// Component schemas emitted
    pub schemas: usize,
    /// Resource types that received paths
    pub resources: usize,
    /// Definitions dropped by the name filter
    pub skipped: usize,
    /// Paths in the final document, seeded ones included
    pub paths: usize,
}

/// Configurable generator
pub struct Generator {
    registry: TypeRegistry,
    classifier: Box<dyn ResourceClassifier>,
    skip_shadow_fields: bool,
}

impl Generator {
    /// Generator with the FHIR primitive table and the upper-case resource convention
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::fhir(),
            classifier: Box::new(LeadingUppercase),
            skip_shadow_fields: true,
        }
    }

    /// Whether `_x` entries are dropped when `x` exists (default: true)
    pub fn skip_shadow_fields(mut self, skip: bool) -> Self {
        self.skip_shadow_fields = skip;
        self
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_classifier(mut self, classifier: impl ResourceClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Build the OpenAPI document for a decoded schema
    pub fn build_document(&self, schema: &SchemaDocument) -> Result<(OpenApiDocument, Summary)> {
        let mut builder = OpenApiBuilder::new()?;

        let translator = SchemaTranslator::new(&self.registry)
            .with_shadow_filter(ShadowFilter::new(self.skip_shadow_fields));
        let collector = SchemaCollector::new(translator, self.classifier.as_ref());
        let collected = collector.collect(&schema.definitions, builder.document_mut());

        let mut summary = Summary {
            definitions: schema.definitions.len(),
            schemas: collected.schemas.len(),
            resources: collected.resources.len(),
            skipped: collected.skipped.len(),
            paths: 0,
        };
        builder.add_schemas(collected.schemas);

        let document = builder.build();
        summary.paths = document.paths.len();
        debug!("Generation summary: {:?}", summary);
        Ok((document, summary))
    }

    /// Read the schema from `input` and write the document to `output`.
    ///
    /// Nothing is written unless decoding and rendering both succeed.
    pub fn generate<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        format: OutputFormat,
    ) -> Result<Summary> {
        let schema = SchemaDocument::from_reader(input)?;
        let (document, summary) = self.build_document(&schema)?;
        write_document(&document, format, output)?;
        Ok(summary)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate an OpenAPI document from the schema in `input` with default settings
pub fn generate<R: Read, W: Write>(input: R, output: W, format: OutputFormat) -> Result<()> {
    Generator::new().generate(input, output, format).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    const PATIENT: &str = r##"{"definitions": {
        "Patient": {"type": "object", "properties": {"id": {"$ref": "#/definitions/id"}}},
        "humanName": {"type": "object"},
        "_humanName": {"type": "object"}
    }}"##;

    #[test]
    fn test_summary() {
        let mut out = Vec::new();
        let summary = Generator::new()
            .generate(PATIENT.as_bytes(), &mut out, OutputFormat::Json)
            .unwrap();

        assert_eq!(
            summary,
            Summary {
                definitions: 3,
                schemas: 2,
                resources: 1,
                skipped: 1,
                // healthcheck, root, /Patient, /Patient/{id}
                paths: 4,
            }
        );
        assert!(!out.is_empty());
    }

    #[test]
    fn test_keep_shadow_fields() {
        let schema = SchemaDocument::from_slice(PATIENT.as_bytes()).unwrap();
        let (document, summary) = Generator::new()
            .skip_shadow_fields(false)
            .build_document(&schema)
            .unwrap();

        assert_eq!(summary.skipped, 0);
        assert!(document.components.schemas.contains_key("_humanName"));
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let mut out = Vec::new();
        let err = generate(&b"not json"[..], &mut out, OutputFormat::Yaml).unwrap_err();

        assert!(matches!(err, Error::DecodeError(_)));
        assert!(out.is_empty());
    }

    struct NoResources;

    impl ResourceClassifier for NoResources {
        fn is_resource(&self, _name: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_classifier_and_registry() {
        let schema = SchemaDocument::from_slice(PATIENT.as_bytes()).unwrap();
        let (document, summary) = Generator::new()
            .with_classifier(NoResources)
            .with_registry(TypeRegistry::new("#/definitions/"))
            .build_document(&schema)
            .unwrap();

        assert_eq!(summary.resources, 0);
        assert!(!document.paths.contains_key("/Patient"));
        let id = &document.components.schemas["Patient"].properties.as_ref().unwrap()["id"];
        assert_eq!(id.reference.as_deref(), Some("#/components/schemas/id"));
    }
}
