//! Maps data-model definitions to object schemas.

use crate::document::Schema;
use crate::introspection::ModelDescriptor;
use crate::schema_registry::SchemaRegistry;
use crate::type_converter::{convert_optional_text, schema_for_type};
use log::debug;

/// Builds the object schema for `model` without registering it.
///
/// Property types that name other models become `$ref`s through `registry`, and
/// inline property models are registered as a side effect.
pub fn model_schema(model: &ModelDescriptor, registry: &mut SchemaRegistry) -> Schema {
    let mut schema = Schema::of_type("object");
    schema.description = convert_optional_text(model.description.as_ref());

    for (property_name, property) in &model.properties {
        if property.hidden || model.hidden.contains(property_name) {
            debug!("Skipping hidden property {}.{}", model.name, property_name);
            continue;
        }

        let mut property_schema = schema_for_type(&property.type_ref, registry);
        // Siblings of a `$ref` are ignored by OpenAPI 3.0 tooling
        if property_schema.reference.is_none() {
            property_schema.description = convert_optional_text(property.description.as_ref());
            property_schema.default = property.default.clone();
        }

        if property.required {
            schema.required.push(property_name.clone());
        }
        schema.properties.insert(property_name.clone(), property_schema);
    }

    if model.strict {
        schema.additional_properties = Some(false);
    }

    schema
}

/// Registers `model` with the registry and returns its schema name.
pub fn register_model(model: &ModelDescriptor, registry: &mut SchemaRegistry) -> String {
    debug!("Registering model: {}", model.name);
    let schema = model_schema(model, registry);
    registry.register(&model.name, schema)
}
