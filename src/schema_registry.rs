//! Run-scoped registry binding schema names to schema objects.
//!
//! Every structural definition that reaches `components.schemas` goes through
//! [`SchemaRegistry::register`]. Registering the same name with the same shape is
//! idempotent; registering the same name with a different shape allocates a new
//! name (`Name_2`, `Name_3`, ...) instead of overwriting the existing entry.

use crate::document::Schema;
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Schema registry for one assembly run
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Allocated name -> schema
    schemas: HashMap<String, Schema>,
    /// Canonical base name -> names allocated for it, in allocation order
    variants: HashMap<String, Vec<String>>,
    /// Names handed out through `$ref`s
    referenced: BTreeSet<String>,
    /// Canonical names declared by catalog models, never used as suffixed variants
    declared: HashSet<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        debug!("Initializing SchemaRegistry");
        Self::default()
    }

    /// Computes the canonical schema name for a declared model name.
    ///
    /// Component names may only contain `[A-Za-z0-9._-]`; any other character is
    /// replaced with `_`. An empty name becomes `Anonymous`.
    pub fn canonical_name(declared: &str) -> String {
        if declared.is_empty() {
            return "Anonymous".to_string();
        }
        declared
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Reserves the canonical names of models that will be registered later.
    ///
    /// A collision suffix never takes a reserved name, so a `$ref` to a declared model
    /// made before that model is registered still lands on it.
    pub fn reserve_declared<'a>(&mut self, declared_names: impl IntoIterator<Item = &'a str>) {
        self.declared
            .extend(declared_names.into_iter().map(Self::canonical_name));
    }

    /// Registers `schema` under `declared_name` and returns the name it is stored under.
    ///
    /// # Arguments
    ///
    /// * `declared_name` - The model's own name, before canonicalization
    /// * `schema` - The structural definition
    ///
    /// # Returns
    ///
    /// The existing name when an identical shape was already registered under this
    /// declared name, otherwise a freshly allocated, unused name.
    pub fn register(&mut self, declared_name: &str, schema: Schema) -> String {
        let base = Self::canonical_name(declared_name);

        if let Some(existing) = self.find_identical(&base, &schema) {
            debug!("Schema {} already registered", existing);
            return existing.to_string();
        }

        let name = self.allocate(&base);
        if name != base {
            debug!("Schema name {} is taken by a different shape, using {}", base, name);
        }

        self.variants.entry(base).or_default().push(name.clone());
        self.schemas.insert(name.clone(), schema);
        name
    }

    /// Returns a `$ref` schema for a model that may not be registered yet.
    ///
    /// The reference resolves to the first name allocated for `declared_name`, which
    /// is the canonical name itself unless it was already occupied.
    pub fn reference(&mut self, declared_name: &str) -> Schema {
        let base = Self::canonical_name(declared_name);
        let name = self
            .variants
            .get(&base)
            .and_then(|names| names.first())
            .cloned()
            .unwrap_or(base);

        let schema = Schema::reference_to(&name);
        self.referenced.insert(name);
        schema
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Referenced names that no registration ever bound, sorted.
    pub fn unresolved_references(&self) -> Vec<String> {
        self.referenced
            .iter()
            .filter(|name| !self.schemas.contains_key(*name))
            .cloned()
            .collect()
    }

    /// Consumes the registry, yielding the schemas sorted by name.
    pub fn into_sorted(self) -> BTreeMap<String, Schema> {
        self.schemas.into_iter().collect()
    }

    fn find_identical(&self, base: &str, schema: &Schema) -> Option<&str> {
        self.variants
            .get(base)?
            .iter()
            .find(|name| self.schemas.get(*name) == Some(schema))
            .map(String::as_str)
    }

    fn allocate(&self, base: &str) -> String {
        if !self.schemas.contains_key(base) {
            return base.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !self.is_taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// A suffixed name is taken once it holds a schema, was promised through a `$ref`,
    /// is the base of an allocated model, or is declared by a catalog model.
    fn is_taken(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
            || self.variants.contains_key(name)
            || self.referenced.contains(name)
            || self.declared.contains(name)
    }
}
