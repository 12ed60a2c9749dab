//! OpenAPI 3.0 object model produced by the assembler.
//!
//! Maps that must come out sorted (`paths`, `components.schemas`) are `BTreeMap`s;
//! maps whose order is meaningful to the caller (properties, media types, responses,
//! security schemes, extension fields) keep insertion order through `IndexMap`.

use crate::introspection::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix of every `$ref` pointing into `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// One security requirement: scheme name -> granted scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// Servers; the first entry carries the base path
    pub servers: Vec<Server>,
    /// API paths, keyed by path template
    pub paths: BTreeMap<String, PathItem>,
    /// Tags referenced by at least one operation, sorted by name
    pub tags: Vec<Tag>,
    /// Components (schemas, security schemes)
    pub components: Components,
    /// One requirement per configured security scheme
    pub security: Vec<SecurityRequirement>,
    /// Caller-supplied top-level extension fields
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl OpenApiDocument {
    /// Iterates over every operation in the document, in path order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.values().flat_map(|item| item.operations())
    }
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

/// OpenAPI PathItem object - all operations for a single path template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
}

impl PathItem {
    /// Returns the operation slot for `method`.
    pub fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Options => &mut self.options,
        }
    }

    pub fn get_operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
        }
    }

    /// Places `operation` in the slot for `method`, returning the operation it replaced.
    pub fn insert(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        self.slot_mut(method).replace(operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.get_operation(method))
    }
}

/// OpenAPI Operation object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Tag names, always present even when empty
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Document-wide unique identifier
    #[serde(rename = "operationId")]
    pub operation_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: IndexMap<String, Response>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub deprecated: bool,
}

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: Schema,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    /// Media type -> schema
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions, keyed by canonical schema name
    pub schemas: BTreeMap<String, Schema>,
    #[serde(rename = "securitySchemes")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

/// OpenAPI Security Scheme object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none", default)]
    pub bearer_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl SecurityScheme {
    /// An `apiKey` scheme reading `name` from `location` (`header`, `query` or `cookie`).
    pub fn api_key(location: &str, name: &str) -> Self {
        Self {
            scheme_type: "apiKey".to_string(),
            location: Some(location.to_string()),
            name: Some(name.to_string()),
            scheme: None,
            bearer_format: None,
            description: None,
        }
    }
}

/// OpenAPI Tag object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Schema object (the JSON-Schema subset the mappers emit)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Reference to a named schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g. "int64", "double", "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    pub fn with_format(schema_type: &str, format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::of_type(schema_type)
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type("array")
        }
    }

    /// A `$ref` to the schema registered under `name`.
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(format!("{SCHEMA_REF_PREFIX}{name}")),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(id: &str) -> Operation {
        Operation {
            tags: Vec::new(),
            summary: None,
            description: None,
            operation_id: id.to_string(),
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
            deprecated: false,
        }
    }

    #[test]
    fn test_path_item_insert_replaces_previous() {
        let mut item = PathItem::default();

        assert!(item.insert(HttpMethod::Get, operation("first")).is_none());
        let replaced = item.insert(HttpMethod::Get, operation("second"));

        assert_eq!(replaced.unwrap().operation_id, "first");
        assert_eq!(item.get.as_ref().unwrap().operation_id, "second");
        assert!(item.post.is_none());
    }

    #[test]
    fn test_path_item_operations_only_populated_slots() {
        let mut item = PathItem::default();
        item.insert(HttpMethod::Delete, operation("remove"));
        item.insert(HttpMethod::Get, operation("find"));

        let ids: Vec<_> = item.operations().map(|op| op.operation_id.as_str()).collect();
        assert_eq!(ids, vec!["find", "remove"]);
    }

    #[test]
    fn test_operation_serializes_empty_tags_and_skips_defaults() {
        let json = serde_json::to_value(operation("Widget.find")).unwrap();

        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json["operationId"], "Widget.find");
        assert!(json.get("parameters").is_none());
        assert!(json.get("deprecated").is_none());
        assert!(json.get("requestBody").is_none());
    }

    #[test]
    fn test_schema_reference_serializes_as_ref() {
        let json = serde_json::to_value(Schema::reference_to("Account")).unwrap();

        assert_eq!(json, serde_json::json!({ "$ref": "#/components/schemas/Account" }));
    }

    #[test]
    fn test_schema_skips_empty_fields() {
        let json = serde_json::to_value(Schema::array_of(Schema::with_format("string", "date-time")))
            .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "array",
                "items": { "type": "string", "format": "date-time" }
            })
        );
    }
}
