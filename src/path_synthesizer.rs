//! REST path synthesis for resource types.
//!
//! Every resource gets the same topology:
//!
//! | Path               | Operations                       |
//! |--------------------|----------------------------------|
//! | `/{Entity}`        | GET (search), POST, PUT          |
//! | `/{Entity}/{id}`   | GET (read), POST, PUT, PATCH, DELETE |
//!
//! Success bodies point at a per-entity `{Entity}Resp` component response, search
//! results at the shared `BundleResp` response and failures at the shared `Error`
//! response, both of which come with the base document.

use crate::openapi_builder::{
    OpenApiDocument, Operation, Parameter, PathItem, RefOr, RequestBody, Response,
};
use crate::schema_translator::Schema;
use log::debug;
use std::collections::BTreeMap;

/// Suffix of the per-entity component response
pub const RESPONSE_SUFFIX: &str = "Resp";

/// Shared search-result response
pub const BUNDLE_RESPONSE: &str = "BundleResp";

/// Shared error response
pub const ERROR_RESPONSE: &str = "Error";

/// Shared search parameter bag
pub const SEARCH_PARAMETER: &str = "search";

const SEARCH_DESCRIPTION: &str =
    "This searches all resources of a particular type using the criteria represented in the parameters.";

const READ_FAILURES: [&str; 4] = ["400", "401", "403", "404"];
const WRITE_FAILURES: [&str; 6] = ["400", "403", "404", "405", "409", "422"];
const DELETE_FAILURES: [&str; 6] = ["400", "403", "404", "405", "409", "412"];
const DELETE_SUCCESSES: [&str; 3] = ["200", "202", "204"];

/// Path synthesizer - inserts the CRUD/search paths of one resource type
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSynthesizer;

impl PathSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Name of the component response carrying a single `entity`
    pub fn response_name(entity: &str) -> String {
        format!("{}{}", entity, RESPONSE_SUFFIX)
    }

    /// Add the entity response and both paths of `entity` to `document`
    pub fn synthesize(&self, entity: &str, document: &mut OpenApiDocument) {
        let response_name = Self::response_name(entity);
        debug!("Adding response {} and paths for {}", response_name, entity);

        document.components.responses.insert(
            response_name.clone(),
            RefOr::Item(Response::json("OK", Schema::component_ref(entity))),
        );

        let entity_response: RefOr<Response> = RefOr::response(&response_name);
        let write = |description: String| Operation {
            description: Some(description),
            tags: Some(vec![entity.to_string()]),
            request_body: Some(RequestBody::json(Schema::component_ref(entity))),
            responses: write_responses(&entity_response),
            ..Default::default()
        };

        let collection = PathItem {
            get: Some(Operation {
                description: Some(SEARCH_DESCRIPTION.to_string()),
                tags: Some(vec![entity.to_string()]),
                parameters: Some(vec![RefOr::parameter(SEARCH_PARAMETER)]),
                responses: read_responses(RefOr::response(BUNDLE_RESPONSE)),
                ..Default::default()
            }),
            post: Some(write(format!(
                "The create interaction creates a new resource {}.",
                entity
            ))),
            put: Some(write(format!(
                "The update interaction creates or updates a resource {}.",
                entity
            ))),
            ..Default::default()
        };

        let instance = PathItem {
            parameters: Some(vec![RefOr::Item(id_parameter())]),
            get: Some(Operation {
                description: Some(format!("The read interaction accesses a resource {}.", entity)),
                tags: Some(vec![entity.to_string()]),
                responses: read_responses(entity_response.clone()),
                ..Default::default()
            }),
            post: Some(write(format!(
                "The create interaction creates a new resource {}.",
                entity
            ))),
            put: Some(write(format!(
                "The update interaction creates or updates a resource {}.",
                entity
            ))),
            patch: Some(write(format!(
                "The patch interaction patches a resource {}.",
                entity
            ))),
            delete: Some(Operation {
                description: Some(format!("The delete interaction removes a resource {}.", entity)),
                tags: Some(vec![entity.to_string()]),
                responses: delete_responses(),
                ..Default::default()
            }),
        };

        document.paths.insert(format!("/{}", entity), collection);
        document.paths.insert(format!("/{}/{{id}}", entity), instance);
    }
}

/// Required string `id` path parameter
fn id_parameter() -> Parameter {
    Parameter {
        name: "id".to_string(),
        location: "path".to_string(),
        required: true,
        schema: Some(Schema::of_type("string")),
    }
}

fn with_failures(
    mut responses: BTreeMap<String, RefOr<Response>>,
    codes: &[&str],
) -> BTreeMap<String, RefOr<Response>> {
    for code in codes {
        responses.insert(code.to_string(), RefOr::response(ERROR_RESPONSE));
    }
    responses
}

fn read_responses(success: RefOr<Response>) -> BTreeMap<String, RefOr<Response>> {
    let mut responses = BTreeMap::new();
    responses.insert("200".to_string(), success);
    with_failures(responses, &READ_FAILURES)
}

fn write_responses(success: &RefOr<Response>) -> BTreeMap<String, RefOr<Response>> {
    let mut responses = BTreeMap::new();
    responses.insert("200".to_string(), success.clone());
    responses.insert("201".to_string(), success.clone());
    with_failures(responses, &WRITE_FAILURES)
}

fn delete_responses() -> BTreeMap<String, RefOr<Response>> {
    let mut responses = BTreeMap::new();
    for code in DELETE_SUCCESSES {
        responses.insert(code.to_string(), RefOr::Item(Response::bare("OK")));
    }
    with_failures(responses, &DELETE_FAILURES)
}
