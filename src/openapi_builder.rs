//! Assembly of the complete OpenAPI document.
//!
//! [`OpenApiBuilder`] runs the assembly as a fixed sequence of single passes:
//!
//! 1. [`OpenApiBuilder::new`] builds the document skeleton from resolved options.
//! 2. [`OpenApiBuilder::register_models`] registers every model schema.
//! 3. [`OpenApiBuilder::build_tag_candidates`] builds a tag for every class with at
//!    least one documented method.
//! 4. [`OpenApiBuilder::add_routes`] maps every documented route into the path grid.
//! 5. [`OpenApiBuilder::build`] sorts paths and schemas, prunes unused tags and
//!    returns the finished document.
//!
//! [`assemble`] drives all five steps over a [`Snapshot`]. Registries live inside the
//! builder, so every assembly starts from empty state.

use crate::config::{Options, ProjectMetadata, ResolvedOptions};
use crate::document::{Components, OpenApiDocument, PathItem, SecurityRequirement, Server, Tag};
use crate::introspection::{ClassDescriptor, ModelDescriptor, RouteDescriptor, Snapshot};
use crate::model_mapper;
use crate::operation_ids::OperationIdRegistry;
use crate::route_mapper;
use crate::schema_registry::SchemaRegistry;
use crate::tag_builder;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// OpenAPI version written to every document
pub const OPENAPI_VERSION: &str = "3.0.0";

/// A non-fatal problem found while assembling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The route's owning class is unknown, unnamed, or has no documented methods
    OrphanRoute {
        class_name: String,
        method_name: String,
        path: String,
    },
    /// A `$ref` points at a schema name that was never registered
    UnresolvedSchemaReference { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OrphanRoute {
                class_name,
                method_name,
                path,
            } => write!(
                f,
                "route {} ({}.{}) skipped: no documented class named {}",
                path, class_name, method_name, class_name
            ),
            Diagnostic::UnresolvedSchemaReference { name } => {
                write!(f, "schema {} is referenced but never defined", name)
            }
        }
    }
}

/// Result of one assembly run
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: OpenApiDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// OpenAPI document builder
pub struct OpenApiBuilder {
    /// Skeleton filled in by `build`
    document: OpenApiDocument,
    options: ResolvedOptions,
    schemas: SchemaRegistry,
    operation_ids: OperationIdRegistry,
    tag_candidates: Vec<Tag>,
    /// Path template -> operations, unordered until `build`
    paths: HashMap<String, PathItem>,
    diagnostics: Vec<Diagnostic>,
}

impl OpenApiBuilder {
    /// Create a builder holding the document skeleton for `options`
    pub fn new(options: ResolvedOptions) -> Self {
        debug!("Initializing OpenApiBuilder for base path {}", options.base_path);

        let security = options
            .security_schemes
            .keys()
            .map(|name| SecurityRequirement::from([(name.clone(), Vec::new())]))
            .collect();

        let document = OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: options.info.clone(),
            servers: vec![Server {
                url: options.base_path.clone(),
            }],
            paths: BTreeMap::new(),
            tags: Vec::new(),
            components: Components {
                schemas: BTreeMap::new(),
                security_schemes: options.security_schemes.clone(),
            },
            security,
            extensions: options.extensions.clone(),
        };

        Self {
            document,
            options,
            schemas: SchemaRegistry::new(),
            operation_ids: OperationIdRegistry::new(),
            tag_candidates: Vec::new(),
            paths: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Registers every model of the catalog.
    pub fn register_models(&mut self, models: &BTreeMap<String, ModelDescriptor>) {
        debug!("Registering {} models", models.len());
        self.schemas
            .reserve_declared(models.values().map(|model| model.name.as_str()));
        for model in models.values() {
            model_mapper::register_model(model, &mut self.schemas);
        }
    }

    /// Builds a tag candidate for every named class with a documented method.
    ///
    /// Candidates that no operation ends up using are pruned by `build`. When several
    /// classes share a name, the first one owns the tag, matching the route lookup.
    pub fn build_tag_candidates(&mut self, classes: &[ClassDescriptor]) {
        for class in classes {
            if !is_eligible(class) {
                debug!("Class {:?} has no documented methods, no tag", class.name);
                continue;
            }
            let tag = tag_builder::build_tag(class);
            if self.tag_candidates.iter().any(|existing| existing.name == tag.name) {
                debug!("Class {} is declared more than once, keeping the first", tag.name);
                continue;
            }
            self.tag_candidates.push(tag);
        }
        debug!("Built {} tag candidates", self.tag_candidates.len());
    }

    /// Maps every documented route of an eligible class into the path grid.
    ///
    /// Routes whose class is missing are skipped and recorded as
    /// [`Diagnostic::OrphanRoute`]; methods left out by a class allow-list are skipped
    /// silently.
    pub fn add_routes(&mut self, routes: &[RouteDescriptor], classes: &[ClassDescriptor]) {
        let mut lookup: HashMap<&str, &ClassDescriptor> = HashMap::new();
        for class in classes.iter().filter(|class| is_eligible(class)) {
            if let Some(name) = class.name.as_deref() {
                lookup.entry(name).or_insert(class);
            }
        }

        for route in routes {
            if !route.documented {
                debug!("Skipping undocumented route: {} {}", route.verb, route.path);
                continue;
            }

            let Some(class) = lookup.get(route.class_name.as_str()) else {
                let diagnostic = Diagnostic::OrphanRoute {
                    class_name: route.class_name.clone(),
                    method_name: route.method_name.clone(),
                    path: route.path.clone(),
                };
                warn!("{}", diagnostic);
                self.diagnostics.push(diagnostic);
                continue;
            };

            if !class.exposes(&route.method_name) {
                debug!(
                    "Method {}.{} is not in the class allow-list",
                    route.class_name, route.method_name
                );
                continue;
            }

            self.add_route(route, class);
        }
    }

    /// Maps one route and merges it into the path grid.
    ///
    /// A later route for the same path and method replaces the earlier one.
    pub fn add_route(&mut self, route: &RouteDescriptor, class: &ClassDescriptor) {
        let mapped = route_mapper::map_route(
            route,
            class,
            &mut self.schemas,
            &mut self.operation_ids,
            &self.options,
        );

        let path_item = self.paths.entry(mapped.path.clone()).or_default();
        if let Some(replaced) = path_item.insert(mapped.method, mapped.operation) {
            debug!(
                "{} {} was mapped twice, replacing {}",
                mapped.method, mapped.path, replaced.operation_id
            );
        }
    }

    /// Build the final OpenAPI document
    pub fn build(self) -> Assembly {
        debug!("Building final OpenAPI document");
        let mut document = self.document;
        let mut diagnostics = self.diagnostics;

        for name in self.schemas.unresolved_references() {
            let diagnostic = Diagnostic::UnresolvedSchemaReference { name };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }

        document.paths = self.paths.into_iter().collect();
        document.components.schemas = self.schemas.into_sorted();

        let used: HashSet<String> = document
            .operations()
            .flat_map(|operation| operation.tags.iter().cloned())
            .collect();
        let mut tags: Vec<Tag> = self
            .tag_candidates
            .into_iter()
            .filter(|tag| used.contains(&tag.name))
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        document.tags = tags;

        Assembly {
            document,
            diagnostics,
        }
    }
}

/// Named classes with at least one documented method get a tag and may own routes.
fn is_eligible(class: &ClassDescriptor) -> bool {
    class.name.as_deref().is_some_and(|name| !name.is_empty()) && class.has_documented_methods()
}

/// Assembles the document for `snapshot`.
///
/// # Example
///
/// ```
/// use openapi_assembler::config::{Options, ProjectMetadata};
/// use openapi_assembler::introspection::{ClassDescriptor, HttpMethod, RouteDescriptor, Snapshot};
/// use openapi_assembler::openapi_builder::assemble;
///
/// let snapshot = Snapshot {
///     routes: vec![RouteDescriptor::new("Widget", "find", HttpMethod::Get, "/widgets")],
///     classes: vec![ClassDescriptor::new("Widget").with_method("find", true)],
///     models: Default::default(),
/// };
/// let assembly = assemble(&snapshot, &Options::default(), &ProjectMetadata::default());
/// assert!(assembly.document.paths.contains_key("/widgets"));
/// assert_eq!(assembly.document.tags[0].name, "Widget");
/// ```
pub fn assemble(snapshot: &Snapshot, options: &Options, metadata: &ProjectMetadata) -> Assembly {
    let mut builder = OpenApiBuilder::new(ResolvedOptions::resolve(options, metadata));
    builder.register_models(&snapshot.models);
    builder.build_tag_candidates(&snapshot.classes);
    builder.add_routes(&snapshot.routes, &snapshot.classes);
    let assembly = builder.build();

    info!(
        "Assembled {} paths, {} schemas, {} tags ({} diagnostics)",
        assembly.document.paths.len(),
        assembly.document.components.schemas.len(),
        assembly.document.tags.len(),
        assembly.diagnostics.len()
    );
    assembly
}

/// Like [`assemble`], then hands the finished document to `hook` for inspection or
/// last-minute changes.
pub fn assemble_with_hook<F>(
    snapshot: &Snapshot,
    options: &Options,
    metadata: &ProjectMetadata,
    hook: F,
) -> Assembly
where
    F: FnOnce(&mut OpenApiDocument),
{
    let mut assembly = assemble(snapshot, options, metadata);
    hook(&mut assembly.document);
    assembly
}
