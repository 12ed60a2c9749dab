//! Conversion of introspected text and type references into document values.

use crate::document::Schema;
use crate::introspection::{Text, TypeRef};
use crate::model_mapper;
use crate::schema_registry::SchemaRegistry;
use log::debug;

/// Flattens localizable text into a single string, joining lines with `\n`.
pub fn convert_text(text: &Text) -> String {
    match text {
        Text::Single(single) => single.clone(),
        Text::Lines(lines) => lines.join("\n"),
    }
}

pub fn convert_optional_text(text: Option<&Text>) -> Option<String> {
    text.map(convert_text)
}

/// Schema for a scalar type name, or `None` when the name refers to a model.
///
/// Names are matched case-insensitively.
pub fn scalar_schema(name: &str) -> Option<Schema> {
    let schema = match name.to_ascii_lowercase().as_str() {
        "string" => Schema::of_type("string"),
        "number" => Schema::with_format("number", "double"),
        "integer" => Schema::with_format("integer", "int64"),
        "boolean" => Schema::of_type("boolean"),
        "date" => Schema::with_format("string", "date-time"),
        "buffer" => Schema::with_format("string", "byte"),
        "file" => Schema::with_format("string", "binary"),
        "object" => Schema::of_type("object"),
        "array" => Schema::array_of(Schema::default()),
        "geopoint" => {
            let mut point = Schema::of_type("object");
            point
                .properties
                .insert("lat".to_string(), Schema::of_type("number"));
            point
                .properties
                .insert("lng".to_string(), Schema::of_type("number"));
            point
        }
        "any" | "*" => Schema::default(),
        _ => return None,
    };
    Some(schema)
}

/// Converts a type reference into a schema.
///
/// Model names become `$ref`s resolved through `registry`, so a model that is
/// registered later still ends up under the same name. Inline models are registered
/// on the spot.
pub fn schema_for_type(type_ref: &TypeRef, registry: &mut SchemaRegistry) -> Schema {
    match type_ref {
        TypeRef::Name(name) => scalar_schema(name).unwrap_or_else(|| registry.reference(name)),
        TypeRef::Array(items) => {
            if items.len() > 1 {
                debug!("Array type lists {} item types, using the first", items.len());
            }
            let item_schema = items
                .first()
                .map(|item| schema_for_type(item, registry))
                .unwrap_or_default();
            Schema::array_of(item_schema)
        }
        TypeRef::Inline(model) => {
            let name = model_mapper::register_model(model, registry);
            Schema::reference_to(&name)
        }
    }
}
