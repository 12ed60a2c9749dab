//! Introspection descriptors consumed by the assembler.
//!
//! These types describe what a host application exposes: its routes, the classes
//! (resources) that own them, and its data models. They are read-only inputs; the
//! host materializes them once, usually as a JSON or YAML [`Snapshot`].
//!
//! The compound `Class.method` identifier carried by raw routes is split exactly once,
//! at deserialization, by [`parse_method_identifier`]. Everything downstream works with
//! the separated `class_name` / `method_name` fields.
//!
//! # Example
//!
//! ```
//! use openapi_assembler::introspection::RouteDescriptor;
//!
//! let route: RouteDescriptor = serde_json::from_str(
//!     r#"{ "method": "Widget.prototype.findById", "verb": "get", "path": "/widgets/:id" }"#,
//! ).unwrap();
//! assert_eq!(route.class_name, "Widget");
//! assert_eq!(route.method_name, "findById");
//! ```

use crate::error::{Error, Result};
use crate::serializer;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Marker inserted between class and method name for instance methods.
const INSTANCE_METHOD_MARKER: &str = "prototype.";

fn default_true() -> bool {
    true
}

/// Everything introspected from one application, as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
    /// Model catalog, keyed by model name
    #[serde(default)]
    pub models: BTreeMap<String, ModelDescriptor>,
}

impl Snapshot {
    /// Loads a snapshot from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        serializer::read_from_file(path)
    }
}

/// HTTP methods a path item can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// All methods in path-item emission order.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(verb: &str) -> std::result::Result<Self, Self::Err> {
        match verb.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" | "del" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            other => Err(format!("unsupported HTTP verb `{other}`")),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(verb: String) -> std::result::Result<Self, Self::Error> {
        verb.parse()
    }
}

/// Splits a compound method identifier into `(class_name, method_name)`.
///
/// Accepts `Class.method` and `Class.prototype.method`; the instance-method marker
/// is stripped. Anything else is a contract violation of the introspection source.
///
/// # Errors
///
/// Returns [`Error::InvalidMethodIdentifier`] when there is no `.` separator or
/// either part is empty.
pub fn parse_method_identifier(identifier: &str) -> Result<(String, String)> {
    let invalid = || Error::InvalidMethodIdentifier(identifier.to_string());

    let (class_name, rest) = identifier.split_once('.').ok_or_else(invalid)?;
    let method_name = rest.strip_prefix(INSTANCE_METHOD_MARKER).unwrap_or(rest);

    if class_name.is_empty() || method_name.is_empty() {
        return Err(invalid());
    }

    Ok((class_name.to_string(), method_name.to_string()))
}

/// Localizable text: a single string or a list of lines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Single(String),
    Lines(Vec<String>),
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::Single(text.to_string())
    }
}

/// One callable endpoint of the application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRoute")]
pub struct RouteDescriptor {
    /// Name of the owning class
    pub class_name: String,
    /// Method name, without the instance-method marker
    pub method_name: String,
    pub verb: HttpMethod,
    /// Path template relative to the base path (`:param` or `{param}` segments)
    pub path: String,
    /// Undocumented routes never reach the document
    pub documented: bool,
    pub description: Option<Text>,
    pub notes: Option<Text>,
    pub deprecated: bool,
    pub accepts: Vec<ArgDescriptor>,
    pub returns: Vec<ArgDescriptor>,
}

impl RouteDescriptor {
    /// Create a documented route with no arguments and no return values
    pub fn new(class_name: &str, method_name: &str, verb: HttpMethod, path: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            verb,
            path: path.to_string(),
            documented: true,
            description: None,
            notes: None,
            deprecated: false,
            accepts: Vec::new(),
            returns: Vec::new(),
        }
    }
}

/// Wire shape of a route, before the method identifier is split.
#[derive(Deserialize)]
struct RawRoute {
    method: String,
    verb: HttpMethod,
    path: String,
    #[serde(default = "default_true")]
    documented: bool,
    description: Option<Text>,
    notes: Option<Text>,
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    accepts: Vec<ArgDescriptor>,
    #[serde(default)]
    returns: Vec<ArgDescriptor>,
}

impl TryFrom<RawRoute> for RouteDescriptor {
    type Error = Error;

    fn try_from(raw: RawRoute) -> Result<Self> {
        let (class_name, method_name) = parse_method_identifier(&raw.method)?;
        Ok(Self {
            class_name,
            method_name,
            verb: raw.verb,
            path: raw.path,
            documented: raw.documented,
            description: raw.description,
            notes: raw.notes,
            deprecated: raw.deprecated,
            accepts: raw.accepts,
            returns: raw.returns,
        })
    }
}

/// A resource class and its remote methods.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassDescriptor {
    /// Unnamed classes are never documented
    pub name: Option<String>,
    pub description: Option<Text>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Optional allow-list restricting which documented methods are emitted
    #[serde(rename = "swaggerMethods", alias = "_swaggerMethods", default)]
    pub swagger_methods: Option<Vec<String>>,
}

impl ClassDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Adds a method descriptor, builder style.
    pub fn with_method(mut self, name: &str, documented: bool) -> Self {
        self.methods.push(MethodDescriptor {
            name: name.to_string(),
            documented,
        });
        self
    }

    pub fn has_documented_methods(&self) -> bool {
        self.methods.iter().any(|method| method.documented)
    }

    /// Whether the allow-list (if any) lets `method_name` through.
    pub fn exposes(&self, method_name: &str) -> bool {
        match &self.swagger_methods {
            Some(allowed) => allowed.iter().any(|name| name == method_name),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default = "default_true")]
    pub documented: bool,
}

/// Type of a property, argument or return value.
///
/// A name is either a scalar (`string`, `number`, `date`, ...) or a model name; a
/// one-element list `[T]` is an array of `T`; an object is an anonymous inline model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Array(Vec<TypeRef>),
    Inline(Box<ModelDescriptor>),
}

impl Default for TypeRef {
    fn default() -> Self {
        TypeRef::Name("any".to_string())
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Name(name.to_string())
    }
}

/// A data-model definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub description: Option<Text>,
    /// Properties in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// Property names kept out of the schema
    #[serde(default)]
    pub hidden: Vec<String>,
    /// Strict models reject unknown properties
    #[serde(default)]
    pub strict: bool,
}

impl ModelDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            properties: IndexMap::new(),
            hidden: Vec::new(),
            strict: false,
        }
    }

    /// Adds a property, builder style.
    pub fn with_property(mut self, name: &str, type_ref: TypeRef, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            PropertyDescriptor {
                type_ref,
                required,
                description: None,
                default: None,
                hidden: false,
            },
        );
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(rename = "type", default)]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub required: bool,
    pub description: Option<Text>,
    pub default: Option<Value>,
    #[serde(default)]
    pub hidden: bool,
}

/// One accepted argument or return value of a remote method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArgDescriptor {
    pub arg: String,
    #[serde(rename = "type", default)]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub required: bool,
    pub description: Option<Text>,
    pub http: Option<HttpMapping>,
    /// For return values: the value is the whole response body
    #[serde(default)]
    pub root: bool,
}

impl ArgDescriptor {
    pub fn new(arg: &str, type_ref: TypeRef) -> Self {
        Self {
            arg: arg.to_string(),
            type_ref,
            required: false,
            description: None,
            http: None,
            root: false,
        }
    }

    /// Sets the HTTP source, builder style.
    pub fn from_source(mut self, source: ArgSource) -> Self {
        self.http = Some(HttpMapping { source });
        self
    }

    pub fn source(&self) -> Option<ArgSource> {
        self.http.as_ref().map(|http| http.source)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HttpMapping {
    pub source: ArgSource,
}

/// Where an argument is taken from in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgSource {
    Path,
    Query,
    Header,
    Body,
    Form,
    /// Server-internal sources, never documented
    Req,
    Res,
    Context,
}
