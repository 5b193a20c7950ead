//! Named-schema collection: turns the definitions table into component schemas and
//! decides which definitions are resource types that get REST paths.

use crate::openapi_builder::OpenApiDocument;
use crate::path_synthesizer::PathSynthesizer;
use crate::schema::Definitions;
use crate::schema_translator::{Schema, SchemaTranslator};
use log::debug;
use std::collections::BTreeMap;

/// Decides whether a definition name denotes an addressable resource type
pub trait ResourceClassifier {
    fn is_resource(&self, name: &str) -> bool;
}

/// FHIR convention: resource types start with an upper-case letter,
/// shared data types (`humanName`, `code`, ...) with a lower-case one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingUppercase;

impl ResourceClassifier for LeadingUppercase {
    fn is_resource(&self, name: &str) -> bool {
        name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Name filter applied to definitions and to object properties.
///
/// An `_x` entry carries the extension data of the primitive `x`; when `x` exists
/// alongside it the `_x` twin is dropped. Empty names are always dropped.
#[derive(Debug, Clone, Copy)]
pub struct ShadowFilter {
    enabled: bool,
}

impl ShadowFilter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether `name` survives among `siblings`
    pub fn keeps<V>(&self, name: &str, siblings: &BTreeMap<String, V>) -> bool {
        if name.is_empty() {
            return false;
        }
        if self.enabled {
            if let Some(public) = name.strip_prefix('_') {
                if siblings.contains_key(public) {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for ShadowFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Collects named schemas from the definitions table
pub struct SchemaCollector<'a> {
    translator: SchemaTranslator<'a>,
    classifier: &'a dyn ResourceClassifier,
    synthesizer: PathSynthesizer,
}

/// Outcome of a collection pass
#[derive(Debug, Default)]
pub struct Collected {
    /// Component schemas by definition name
    pub schemas: BTreeMap<String, Schema>,
    /// Definitions that received paths
    pub resources: Vec<String>,
    /// Definitions dropped by the name filter
    pub skipped: Vec<String>,
}

impl<'a> SchemaCollector<'a> {
    pub fn new(translator: SchemaTranslator<'a>, classifier: &'a dyn ResourceClassifier) -> Self {
        Self {
            translator,
            classifier,
            synthesizer: PathSynthesizer::new(),
        }
    }

    /// Translate every definition and synthesize paths for resource types into `document`
    pub fn collect(&self, definitions: &Definitions, document: &mut OpenApiDocument) -> Collected {
        let filter = self.translator.shadow_filter();
        let mut collected = Collected::default();

        for (name, node) in definitions {
            if !filter.keeps(name, definitions) {
                debug!("Skipping definition {:?}", name);
                collected.skipped.push(name.clone());
                continue;
            }

            let schema = self.translator.translate(node.as_ref()).unwrap_or_default();
            collected.schemas.insert(name.clone(), schema);

            if self.classifier.is_resource(name) {
                debug!("Synthesizing paths for resource {}", name);
                self.synthesizer.synthesize(name, document);
                collected.resources.push(name.clone());
            }
        }

        collected
    }
}
