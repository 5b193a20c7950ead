use crate::error::{Error, Result};
use crate::schema_translator::Schema;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base document every generated document starts from
const BASE_DOCUMENT: &str = include_str!("base_document.json");

/// Media type used for every request and response body
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Location of component responses inside an OpenAPI document
pub const COMPONENT_RESPONSES_PREFIX: &str = "#/components/responses/";

/// Location of component parameters inside an OpenAPI document
pub const COMPONENT_PARAMETERS_PREFIX: &str = "#/components/parameters/";

/// OpenAPI document builder - seeds the base document and merges generated parts into it
pub struct OpenApiBuilder {
    document: OpenApiDocument,
}

/// Either a `$ref` to a component or the object itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> RefOr<T> {
    /// Reference to `#/components/responses/{name}`
    pub fn response(name: &str) -> Self {
        RefOr::Ref {
            reference: format!("{}{}", COMPONENT_RESPONSES_PREFIX, name),
        }
    }

    /// Reference to `#/components/parameters/{name}`
    pub fn parameter(name: &str) -> Self {
        RefOr::Ref {
            reference: format!("{}{}", COMPONENT_PARAMETERS_PREFIX, name),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            RefOr::Ref { reference } => Some(reference),
            RefOr::Item(_) => None,
        }
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            RefOr::Ref { .. } => None,
            RefOr::Item(item) => Some(item),
        }
    }
}

/// OpenAPI Info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation on this path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<RefOr<Parameter>>>,
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Parameters (path, query, header)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<RefOr<Parameter>>>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses by status code
    pub responses: BTreeMap<String, RefOr<Response>>,
    /// Overrides the document-wide security; `Some(vec![])` means no authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, header)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    #[serde(default)]
    pub required: bool,
    /// Parameter schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Request body description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the request body is required
    #[serde(default)]
    pub required: bool,
    /// Content types and their schemas
    pub content: BTreeMap<String, MediaType>,
}

impl RequestBody {
    /// Required JSON body of the given schema
    pub fn json(schema: Schema) -> Self {
        Self {
            description: None,
            required: true,
            content: json_content(schema),
        }
    }
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

impl Response {
    /// Response without a body
    pub fn bare(description: &str) -> Self {
        Self {
            description: description.to_string(),
            content: None,
        }
    }

    /// Response with a JSON body of the given schema
    pub fn json(description: &str, schema: Schema) -> Self {
        Self {
            description: description.to_string(),
            content: Some(json_content(schema)),
        }
    }
}

fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    let mut content = BTreeMap::new();
    content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
    content
}

/// OpenAPI SecurityScheme object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Security scheme name -> required scopes
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, RefOr<Response>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, RefOr<Parameter>>,
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// API paths
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    /// Components (schemas, responses, parameters, security schemes)
    #[serde(default)]
    pub components: Components,
    /// Security applied to every operation unless overridden
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

impl OpenApiBuilder {
    /// Create a builder seeded with the embedded base document
    pub fn new() -> Result<Self> {
        Self::from_seed(BASE_DOCUMENT)
    }

    /// Create a builder seeded with the given JSON document
    pub fn from_seed(seed: &str) -> Result<Self> {
        debug!("Initializing OpenApiBuilder");
        let document: OpenApiDocument =
            serde_json::from_str(seed).map_err(|e| Error::InvalidSeed(e.to_string()))?;
        Ok(Self { document })
    }

    /// Document under construction, for path synthesis
    pub fn document_mut(&mut self) -> &mut OpenApiDocument {
        &mut self.document
    }

    /// Merge component schemas into the document; seeded entries are never removed
    pub fn add_schemas(&mut self, schemas: BTreeMap<String, Schema>) {
        debug!("Adding {} component schemas", schemas.len());
        self.document.components.schemas.extend(schemas);
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> OpenApiDocument {
        debug!("Building final OpenAPI document");
        self.document
    }
}
