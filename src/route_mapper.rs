//! Maps one documented route to an OpenAPI operation.
//!
//! Argument and return types are resolved through the [`SchemaRegistry`], so complex
//! types always end up as `$ref`s into `components.schemas` and never inline.

use crate::config::ResolvedOptions;
use crate::document::{
    MediaType, Operation, Parameter, ParameterLocation, RequestBody, Response, Schema,
};
use crate::introspection::{ArgDescriptor, ArgSource, ClassDescriptor, HttpMethod, RouteDescriptor};
use crate::operation_ids::OperationIdRegistry;
use crate::schema_registry::SchemaRegistry;
use crate::type_converter::{convert_optional_text, schema_for_type};
use indexmap::IndexMap;
use log::debug;

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// An operation together with where it belongs in the path grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRoute {
    /// OpenAPI path template (`{param}` segments)
    pub path: String,
    pub method: HttpMethod,
    pub operation: Operation,
}

/// Maps `route`, owned by `class`, to an operation.
///
/// # Arguments
///
/// * `route` - The documented route
/// * `class` - The class the route belongs to; its name becomes the operation's tag
/// * `schemas` - Registry receiving any model the route's types introduce
/// * `operation_ids` - Registry the operation id is reserved in
/// * `options` - Resolved options supplying request and response media types
pub fn map_route(
    route: &RouteDescriptor,
    class: &ClassDescriptor,
    schemas: &mut SchemaRegistry,
    operation_ids: &mut OperationIdRegistry,
    options: &ResolvedOptions,
) -> MappedRoute {
    let path = convert_path_format(&route.path);
    debug!("Mapping route: {} {}", route.verb, path);

    let path_parameters = path_parameter_names(&path);
    let mut parameters = Vec::new();
    let mut body: Option<RequestBody> = None;
    let mut form = Schema::of_type("object");

    for arg in &route.accepts {
        let source = arg.source().unwrap_or_else(|| {
            if path_parameters.contains(&arg.arg.as_str()) {
                ArgSource::Path
            } else {
                ArgSource::Query
            }
        });

        match source {
            ArgSource::Path | ArgSource::Query | ArgSource::Header => {
                let location = match source {
                    ArgSource::Path => ParameterLocation::Path,
                    ArgSource::Header => ParameterLocation::Header,
                    _ => ParameterLocation::Query,
                };
                parameters.push(Parameter {
                    name: arg.arg.clone(),
                    location,
                    // Path parameters are required by definition
                    required: arg.required || location == ParameterLocation::Path,
                    description: convert_optional_text(arg.description.as_ref()),
                    schema: schema_for_type(&arg.type_ref, schemas),
                });
            }
            ArgSource::Body => {
                if body.is_some() {
                    debug!("Ignoring additional body argument: {}", arg.arg);
                    continue;
                }
                let schema = schema_for_type(&arg.type_ref, schemas);
                body = Some(RequestBody {
                    description: convert_optional_text(arg.description.as_ref()),
                    required: arg.required,
                    content: content_for(&options.consumes, &schema),
                });
            }
            ArgSource::Form => {
                if arg.required {
                    form.required.push(arg.arg.clone());
                }
                let schema = schema_for_type(&arg.type_ref, schemas);
                form.properties.insert(arg.arg.clone(), schema);
            }
            ArgSource::Req | ArgSource::Res | ArgSource::Context => {
                debug!("Skipping server-internal argument: {}", arg.arg);
            }
        }
    }

    let request_body = body.or_else(|| {
        if form.properties.is_empty() {
            return None;
        }
        let mut content = IndexMap::new();
        let required = !form.required.is_empty();
        content.insert(FORM_MEDIA_TYPE.to_string(), MediaType { schema: form });
        Some(RequestBody {
            description: None,
            required,
            content,
        })
    });

    let tags = class.name.iter().cloned().collect();
    let operation_id =
        operation_ids.reserve(&format!("{}.{}", route.class_name, route.method_name));

    let operation = Operation {
        tags,
        summary: convert_optional_text(route.description.as_ref()),
        description: convert_optional_text(route.notes.as_ref()),
        operation_id,
        parameters,
        request_body,
        responses: map_responses(&route.returns, schemas, &options.produces),
        deprecated: route.deprecated,
    };

    MappedRoute {
        path,
        method: route.verb,
        operation,
    }
}

/// Builds the responses map from a method's return values.
fn map_responses(
    returns: &[ArgDescriptor],
    schemas: &mut SchemaRegistry,
    produces: &[String],
) -> IndexMap<String, Response> {
    let mut responses = IndexMap::new();

    if returns.is_empty() {
        responses.insert(
            "204".to_string(),
            Response {
                description: "Request was successful, no content.".to_string(),
                content: IndexMap::new(),
            },
        );
        return responses;
    }

    let schema = match returns.iter().find(|ret| ret.root) {
        Some(root) => schema_for_type(&root.type_ref, schemas),
        None => {
            let mut envelope = Schema::of_type("object");
            for ret in returns {
                if ret.required {
                    envelope.required.push(ret.arg.clone());
                }
                let property = schema_for_type(&ret.type_ref, schemas);
                envelope.properties.insert(ret.arg.clone(), property);
            }
            envelope
        }
    };

    responses.insert(
        "200".to_string(),
        Response {
            description: "Request was successful".to_string(),
            content: content_for(produces, &schema),
        },
    );
    responses
}

fn content_for(media_types: &[String], schema: &Schema) -> IndexMap<String, MediaType> {
    media_types
        .iter()
        .map(|media_type| {
            (
                media_type.clone(),
                MediaType {
                    schema: schema.clone(),
                },
            )
        })
        .collect()
}

/// Converts `:param` segments to the OpenAPI `{param}` form.
pub fn convert_path_format(path: &str) -> String {
    path.split('/')
        .map(|part| match part.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Names of the `{param}` segments of an OpenAPI path template.
fn path_parameter_names(path: &str) -> Vec<&str> {
    path.split('/')
        .filter_map(|part| part.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')))
        .collect()
}
