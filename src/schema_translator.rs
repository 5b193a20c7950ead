use crate::collector::ShadowFilter;
use crate::schema::{ExclusiveBound, SchemaNode};
use crate::type_registry::TypeRegistry;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Location of component schemas inside an OpenAPI document
pub const COMPONENT_SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// OpenAPI Schema definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Reference to another component schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Format for primitive types (e.g., "date", "date-time", "uri")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values; a source `const` is appended here
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    /// Required field names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Schema {
    /// Schema of the given primitive type
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// Reference to the component schema `name`
    pub fn component_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", COMPONENT_SCHEMAS_PREFIX, name)),
            ..Default::default()
        }
    }
}

/// Schema translator - converts input schema nodes to OpenAPI schemas.
///
/// Translation is total: absent nodes stay absent and absent fields stay absent.
pub struct SchemaTranslator<'a> {
    /// Primitive aliases inlined in place of references
    registry: &'a TypeRegistry,
    /// Drops `_x` shadow properties
    shadow_filter: ShadowFilter,
}

impl<'a> SchemaTranslator<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            shadow_filter: ShadowFilter::default(),
        }
    }

    pub fn with_shadow_filter(mut self, shadow_filter: ShadowFilter) -> Self {
        self.shadow_filter = shadow_filter;
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    pub fn shadow_filter(&self) -> ShadowFilter {
        self.shadow_filter
    }

    /// Translate a schema node; `None` translates to `None`
    pub fn translate(&self, node: Option<&SchemaNode>) -> Option<Schema> {
        node.map(|node| self.translate_node(node))
    }

    /// Translate a schema node that is known to be present
    pub fn translate_node(&self, src: &SchemaNode) -> Schema {
        let mut dst = Schema {
            schema_type: src.schema_type.clone(),
            title: src.title.clone(),
            description: src.description.clone(),
            format: src.format.clone(),
            pattern: src.pattern.clone(),
            default: src.default.clone(),
            enum_values: non_empty(src.enum_values.clone()),
            min_length: src.min_length,
            max_length: src.max_length,
            minimum: src.minimum.clone(),
            maximum: src.maximum.clone(),
            multiple_of: src.multiple_of.clone(),
            min_items: src.min_items,
            max_items: src.max_items,
            unique_items: src.unique_items,
            min_properties: src.min_properties,
            max_properties: src.max_properties,
            items: src.items.as_deref().map(|item| Box::new(self.translate_node(item))),
            one_of: self.translate_all(&src.one_of),
            any_of: self.translate_all(&src.any_of),
            all_of: self.translate_all(&src.all_of),
            properties: src
                .properties
                .as_ref()
                .map(|props| self.translate_properties(props))
                .filter(|props| !props.is_empty()),
            required: non_empty(src.required.clone()),
            ..Default::default()
        };

        if let Some(reference) = src.reference() {
            self.apply_reference(reference, &mut dst);
        }

        match &src.exclusive_minimum {
            Some(ExclusiveBound::Flag(flag)) => dst.exclusive_minimum = Some(*flag),
            Some(ExclusiveBound::Limit(limit)) => {
                dst.minimum = Some(limit.clone());
                dst.exclusive_minimum = Some(true);
            }
            None => {}
        }
        match &src.exclusive_maximum {
            Some(ExclusiveBound::Flag(flag)) => dst.exclusive_maximum = Some(*flag),
            Some(ExclusiveBound::Limit(limit)) => {
                dst.maximum = Some(limit.clone());
                dst.exclusive_maximum = Some(true);
            }
            None => {}
        }

        // const is a single-value enum in OpenAPI 3.0
        if let Some(value) = &src.const_value {
            dst.enum_values.get_or_insert_with(Vec::new).push(value.clone());
        }

        // OpenAPI 3.0 has a single example; the rest are dropped
        dst.example = src.examples.first().cloned();

        dst
    }

    /// Inline a primitive alias, or point the reference at the component schemas
    fn apply_reference(&self, reference: &str, dst: &mut Schema) {
        if let Some(alias) = self.registry.resolve(reference) {
            debug!("Inlining primitive alias {}", reference);
            dst.reference = None;
            dst.schema_type = Some(alias.schema_type.clone());
            dst.format = alias.format.clone();
            dst.pattern = alias.pattern.clone();
            return;
        }

        let rewritten = match reference.strip_prefix(self.registry.prefix()) {
            Some(name) => format!("{}{}", COMPONENT_SCHEMAS_PREFIX, name),
            None => reference.to_string(),
        };
        dst.reference = Some(rewritten);
    }

    fn translate_all(&self, nodes: &[Option<SchemaNode>]) -> Option<Vec<Schema>> {
        if nodes.is_empty() {
            return None;
        }
        Some(
            nodes
                .iter()
                .map(|node| self.translate(node.as_ref()).unwrap_or_default())
                .collect(),
        )
    }

    /// Nested properties; unlike top-level definitions these never get paths
    fn translate_properties(
        &self,
        props: &BTreeMap<String, Option<SchemaNode>>,
    ) -> BTreeMap<String, Schema> {
        props
            .iter()
            .filter(|(name, _)| self.shadow_filter.keeps(name, props))
            .map(|(name, node)| {
                let schema = self.translate(node.as_ref()).unwrap_or_default();
                (name.clone(), schema)
            })
            .collect()
    }
}

/// Empty `enum`/`required` lists are invalid in OpenAPI 3.0 and are left out
fn non_empty<T>(values: Option<Vec<T>>) -> Option<Vec<T>> {
    values.filter(|values| !values.is_empty())
}
