//! Assembly options and their resolution against project metadata.
//!
//! [`Options`] is what the caller supplies (every field optional), [`ProjectMetadata`]
//! is what could be read from the project's package file, and [`ResolvedOptions`] is
//! the single merged view the assembler works from. Precedence for every field is:
//! explicit option, then project metadata, then the static default.

use crate::document::{Contact, Info, License, SecurityScheme};
use crate::error::Result;
use crate::introspection::Text;
use crate::serializer;
use crate::type_converter::convert_text;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_BASE_PATH: &str = "/api";
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_TITLE: &str = "Application";

/// Top-level document keys extension fields may not override.
const RESERVED_KEYS: [&str; 7] = [
    "openapi",
    "info",
    "servers",
    "paths",
    "tags",
    "components",
    "security",
];

/// Caller-supplied options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Base path of the REST API (default `/api`)
    pub base_path: Option<String>,
    /// Request media types (default `application/json`)
    pub consumes: Option<Vec<String>>,
    /// Response media types (default `application/json`)
    pub produces: Option<Vec<String>>,
    /// Security schemes by name (default: API key in header and in query)
    pub security_schemes: Option<IndexMap<String, SecurityScheme>>,
    /// API version (default: project version, then `1.0.0`)
    pub version: Option<String>,
    pub api_info: Option<ApiInfo>,
    /// Extra top-level fields copied verbatim into the document
    pub extensions: IndexMap<String, Value>,
}

impl Options {
    /// Loads options from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        serializer::read_from_file(path)
    }
}

/// Overrides for the document's `info` object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiInfo {
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
}

/// Name, version and description of the host project, as far as they are known.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl ProjectMetadata {
    /// Reads a `package.json`-style file. Any failure yields empty metadata.
    pub fn load(path: &Path) -> Self {
        match serializer::read_from_file(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(
                    "Could not read project metadata from {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// Options after merging with project metadata and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Base path without a trailing slash
    pub base_path: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub security_schemes: IndexMap<String, SecurityScheme>,
    pub info: Info,
    pub extensions: IndexMap<String, Value>,
}

impl ResolvedOptions {
    /// Merges `options` over `metadata` over the static defaults.
    pub fn resolve(options: &Options, metadata: &ProjectMetadata) -> Self {
        let api_info = options.api_info.clone().unwrap_or_default();

        let title = api_info
            .title
            .as_ref()
            .map(convert_text)
            .or_else(|| metadata.name.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let description = api_info
            .description
            .as_ref()
            .map(convert_text)
            .or_else(|| metadata.description.clone())
            .unwrap_or_else(|| title.clone());
        let version = options
            .version
            .clone()
            .or_else(|| metadata.version.clone())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let mut extensions = options.extensions.clone();
        extensions.retain(|key, _| {
            let reserved = RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                warn!("Ignoring extension field `{}`: it would replace a document section", key);
            }
            !reserved
        });

        Self {
            base_path: normalize_base_path(options.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH)),
            consumes: media_types(options.consumes.as_ref()),
            produces: media_types(options.produces.as_ref()),
            security_schemes: options
                .security_schemes
                .clone()
                .unwrap_or_else(default_security_schemes),
            info: Info {
                title,
                description,
                version,
                terms_of_service: api_info.terms_of_service,
                contact: api_info.contact,
                license: api_info.license,
            },
            extensions,
        }
    }
}

/// Built-in schemes: an access token in the `Authorization` header or the
/// `access_token` query parameter.
pub fn default_security_schemes() -> IndexMap<String, SecurityScheme> {
    let mut schemes = IndexMap::new();
    schemes.insert(
        "accessTokenHeader".to_string(),
        SecurityScheme::api_key("header", "Authorization"),
    );
    schemes.insert(
        "accessTokenQuery".to_string(),
        SecurityScheme::api_key("query", "access_token"),
    );
    schemes
}

/// Strips one trailing slash. The root path `/` is kept as is.
pub fn normalize_base_path(base_path: &str) -> String {
    match base_path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => base_path.to_string(),
    }
}

fn media_types(configured: Option<&Vec<String>>) -> Vec<String> {
    match configured {
        Some(types) if !types.is_empty() => types.clone(),
        _ => vec![DEFAULT_MEDIA_TYPE.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_defaults() {
        let resolved = ResolvedOptions::resolve(&Options::default(), &ProjectMetadata::default());

        assert_eq!(resolved.base_path, "/api");
        assert_eq!(resolved.consumes, vec!["application/json".to_string()]);
        assert_eq!(resolved.produces, vec!["application/json".to_string()]);
        assert_eq!(resolved.info.title, "Application");
        assert_eq!(resolved.info.description, "Application");
        assert_eq!(resolved.info.version, "1.0.0");
        assert_eq!(
            resolved.security_schemes.keys().collect::<Vec<_>>(),
            vec!["accessTokenHeader", "accessTokenQuery"]
        );
        assert!(resolved.extensions.is_empty());
    }

    #[test]
    fn test_resolve_prefers_metadata_over_defaults() {
        let metadata = ProjectMetadata {
            name: Some("widget-shop".to_string()),
            version: Some("2.3.1".to_string()),
            description: Some("Sells widgets".to_string()),
        };

        let resolved = ResolvedOptions::resolve(&Options::default(), &metadata);

        assert_eq!(resolved.info.title, "widget-shop");
        assert_eq!(resolved.info.description, "Sells widgets");
        assert_eq!(resolved.info.version, "2.3.1");
    }

    #[test]
    fn test_resolve_prefers_options_over_metadata() {
        let metadata = ProjectMetadata {
            name: Some("widget-shop".to_string()),
            version: Some("2.3.1".to_string()),
            description: None,
        };
        let options = Options {
            version: Some("9.0.0".to_string()),
            api_info: Some(ApiInfo {
                title: Some(Text::from("Widget API")),
                description: Some(Text::Lines(vec!["Line one".to_string(), "Line two".to_string()])),
                ..Default::default()
            }),
            ..Default::default()
        };

        let resolved = ResolvedOptions::resolve(&options, &metadata);

        assert_eq!(resolved.info.title, "Widget API");
        assert_eq!(resolved.info.description, "Line one\nLine two");
        assert_eq!(resolved.info.version, "9.0.0");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("https://example.com/v1/"), "https://example.com/v1");
    }

    #[test]
    fn test_empty_media_types_fall_back_to_default() {
        let options = Options {
            consumes: Some(Vec::new()),
            produces: Some(vec!["application/xml".to_string()]),
            ..Default::default()
        };

        let resolved = ResolvedOptions::resolve(&options, &ProjectMetadata::default());

        assert_eq!(resolved.consumes, vec!["application/json".to_string()]);
        assert_eq!(resolved.produces, vec!["application/xml".to_string()]);
    }

    #[test]
    fn test_reserved_extension_keys_are_dropped() {
        let mut extensions = IndexMap::new();
        extensions.insert("x-gateway".to_string(), json!({ "timeout": 30 }));
        extensions.insert("paths".to_string(), json!({}));
        let options = Options {
            extensions,
            ..Default::default()
        };

        let resolved = ResolvedOptions::resolve(&options, &ProjectMetadata::default());

        assert_eq!(resolved.extensions.keys().collect::<Vec<_>>(), vec!["x-gateway"]);
    }

    #[test]
    fn test_options_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("options.yaml");
        fs::write(
            &path,
            r#"
basePath: /rest/
produces: [application/json, application/xml]
securitySchemes:
  bearer:
    type: http
    scheme: bearer
    bearerFormat: JWT
apiInfo:
  title: Shop
  license:
    name: MIT
extensions:
  x-audience: public
"#,
        )
        .unwrap();

        let options = Options::from_path(&path).unwrap();
        let resolved = ResolvedOptions::resolve(&options, &ProjectMetadata::default());

        assert_eq!(resolved.base_path, "/rest");
        assert_eq!(resolved.produces.len(), 2);
        assert_eq!(resolved.security_schemes["bearer"].scheme.as_deref(), Some("bearer"));
        assert_eq!(resolved.info.title, "Shop");
        assert_eq!(resolved.info.license.as_ref().map(|l| l.name.as_str()), Some("MIT"));
        assert_eq!(resolved.extensions["x-audience"], json!("public"));
    }

    #[test]
    fn test_project_metadata_load_falls_back_silently() {
        let temp_dir = TempDir::new().unwrap();

        let missing = ProjectMetadata::load(&temp_dir.path().join("package.json"));
        assert!(missing.name.is_none());

        let broken_path = temp_dir.path().join("broken.json");
        fs::write(&broken_path, "{ not json").unwrap();
        let broken = ProjectMetadata::load(&broken_path);
        assert!(broken.version.is_none());

        let package_path = temp_dir.path().join("package.json");
        fs::write(
            &package_path,
            r#"{ "name": "shop", "version": "0.4.0", "private": true }"#,
        )
        .unwrap();
        let package = ProjectMetadata::load(&package_path);
        assert_eq!(package.name.as_deref(), Some("shop"));
        assert_eq!(package.version.as_deref(), Some("0.4.0"));
    }
}
