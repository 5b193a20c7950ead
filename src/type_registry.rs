use log::debug;
use std::collections::HashMap;

/// Reference prefix under which the FHIR primitives are defined in the input schema
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Pattern FHIR uses for the `time` primitive
pub const TIME_PATTERN: &str = r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?$";

/// OpenAPI primitive a FHIR primitive alias resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveAlias {
    /// OpenAPI type (string, integer, number, boolean)
    pub schema_type: String,
    /// OpenAPI format (date, date-time, uri, byte, uuid)
    pub format: Option<String>,
    /// Regular expression the value must match
    pub pattern: Option<String>,
}

impl PrimitiveAlias {
    fn new(schema_type: &str) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            format: None,
            pattern: None,
        }
    }

    fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }
}

/// Type registry - maps references to primitive definitions onto OpenAPI primitives.
///
/// The table is read-only once built and is handed to the translator, so tests can
/// run against their own registry without touching any global state.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Full reference string (prefix + name) -> alias
    aliases: HashMap<String, PrimitiveAlias>,
    prefix: String,
}

impl TypeRegistry {
    /// Create an empty registry whose names are looked up under `prefix`
    pub fn new(prefix: &str) -> Self {
        Self {
            aliases: HashMap::new(),
            prefix: prefix.to_string(),
        }
    }

    /// Registry covering the FHIR primitive vocabulary
    pub fn fhir() -> Self {
        debug!("Initializing FHIR type registry");
        Self::new(DEFINITIONS_PREFIX)
            .with("id", PrimitiveAlias::new("string"))
            .with("string", PrimitiveAlias::new("string"))
            .with("base64Binary", PrimitiveAlias::new("string").with_format("byte"))
            .with("boolean", PrimitiveAlias::new("boolean"))
            .with("canonical", PrimitiveAlias::new("string"))
            .with("code", PrimitiveAlias::new("string"))
            .with("date", PrimitiveAlias::new("string").with_format("date"))
            .with("dateTime", PrimitiveAlias::new("string").with_format("date-time"))
            .with("decimal", PrimitiveAlias::new("number"))
            .with("instant", PrimitiveAlias::new("string"))
            .with("integer", PrimitiveAlias::new("integer"))
            .with("markdown", PrimitiveAlias::new("string"))
            .with("oid", PrimitiveAlias::new("string"))
            .with("positiveInt", PrimitiveAlias::new("integer"))
            .with("time", PrimitiveAlias::new("string").with_pattern(TIME_PATTERN))
            .with("unsignedInt", PrimitiveAlias::new("integer"))
            .with("uri", PrimitiveAlias::new("string").with_format("uri"))
            .with("url", PrimitiveAlias::new("string").with_format("uri"))
            .with("uuid", PrimitiveAlias::new("string").with_format("uuid"))
            .with("xhtml", PrimitiveAlias::new("string"))
    }

    /// Register an alias for the primitive `name`
    pub fn with(mut self, name: &str, alias: PrimitiveAlias) -> Self {
        self.aliases.insert(format!("{}{}", self.prefix, name), alias);
        self
    }

    /// Look up the alias a reference string points at
    pub fn resolve(&self, reference: &str) -> Option<&PrimitiveAlias> {
        self.aliases.get(reference)
    }

    /// Whether `name` (without prefix) is a registered primitive
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(&format!("{}{}", self.prefix, name))
    }

    /// Registered primitive names, without prefix
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .keys()
            .filter_map(|key| key.strip_prefix(self.prefix.as_str()))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::fhir()
    }
}
