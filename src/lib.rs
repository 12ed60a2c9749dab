//! OpenAPI Assembler - builds an OpenAPI document from an application's introspected
//! API surface.
//!
//! The host application supplies three independent inputs: its routes, the classes
//! (resources) that own them, and its data-model catalog. This library reconciles them
//! into one deterministic OpenAPI 3.0 document: schemas deduplicated and uniquely
//! named, operations grouped by path template, operation ids unique, and tags limited
//! to the ones actually in use.
//!
//! # Architecture
//!
//! 1. [`introspection`] - Input descriptors and the snapshot loader
//! 2. [`type_converter`] - Text normalization and type-to-schema conversion
//! 3. [`schema_registry`] - Run-scoped schema name binding and deduplication
//! 4. [`model_mapper`] - Model definitions to object schemas
//! 5. [`tag_builder`] - Class definitions to tags
//! 6. [`operation_ids`] - Run-scoped operation id allocation
//! 7. [`route_mapper`] - Routes to operations
//! 8. [`openapi_builder`] - Orchestrates the assembly and finalizes the document
//! 9. [`serializer`] - YAML/JSON encoding and decoding
//!
//! # Example Usage
//!
//! ```
//! use openapi_assembler::{
//!     config::{Options, ProjectMetadata},
//!     introspection::Snapshot,
//!     openapi_builder::assemble,
//!     serializer::serialize_yaml,
//! };
//!
//! let snapshot: Snapshot = serde_json::from_str(r#"{
//!     "routes": [{ "method": "Widget.prototype.findById", "verb": "get", "path": "/widgets/:id" }],
//!     "classes": [{ "name": "Widget", "methods": [{ "name": "findById" }] }],
//!     "models": { "Widget": { "name": "Widget", "properties": { "id": { "type": "string" } } } }
//! }"#).unwrap();
//!
//! let assembly = assemble(&snapshot, &Options::default(), &ProjectMetadata::default());
//! let yaml = serialize_yaml(&assembly.document).unwrap();
//! assert!(yaml.contains("/widgets/{id}"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod introspection;
pub mod model_mapper;
pub mod openapi_builder;
pub mod operation_ids;
pub mod route_mapper;
pub mod schema_registry;
pub mod serializer;
pub mod tag_builder;
pub mod type_converter;
