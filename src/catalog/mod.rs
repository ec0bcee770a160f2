//! Collection catalog
//!
//! The catalog is built once at startup from the embedded retail
//! declarations (products, orders, customers, reviews), optionally
//! overridden by declarations on disk, and is read-only afterwards.

mod examples;

pub use examples::{builtin_examples, ExampleDocument};

use std::path::Path;

use crate::observability::Logger;
use crate::schema::{CollectionSpec, SchemaDefinition, SchemaDefinitionError, SchemaLoader, SchemaResult};

const BUILTIN_DECLARATIONS: [(&str, &str); 4] = [
    ("products.json", include_str!("../../schemas/products.json")),
    ("orders.json", include_str!("../../schemas/orders.json")),
    ("customers.json", include_str!("../../schemas/customers.json")),
    ("reviews.json", include_str!("../../schemas/reviews.json")),
];

/// Registry of collection declarations, in registration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    collections: Vec<CollectionSpec>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the four retail collections from the embedded declarations.
    pub fn builtin() -> SchemaResult<Self> {
        let mut catalog = Self::new();
        for (origin, content) in BUILTIN_DECLARATIONS {
            catalog.register(SchemaLoader::parse_str(content, origin)?)?;
        }
        Ok(catalog)
    }

    /// Adds a collection. Names must be unique.
    pub fn register(&mut self, spec: CollectionSpec) -> SchemaResult<()> {
        if self.get(spec.name()).is_some() {
            return Err(SchemaDefinitionError::DuplicateCollection(
                spec.name().to_string(),
            ));
        }
        self.collections.push(spec);
        Ok(())
    }

    /// Adds a collection or replaces the one with the same name.
    /// Returns true when an existing collection was replaced.
    pub fn replace(&mut self, spec: CollectionSpec) -> bool {
        match self.collections.iter_mut().find(|c| c.name() == spec.name()) {
            Some(existing) => {
                *existing = spec;
                true
            }
            None => {
                self.collections.push(spec);
                false
            }
        }
    }

    /// Loads every declaration in `dir` over the current collections.
    pub fn with_overrides_from(mut self, dir: &Path) -> SchemaResult<Self> {
        let loader = SchemaLoader::new(dir);
        let dir_display = loader.schema_dir().display().to_string();
        for spec in loader.load_all()? {
            let name = spec.name().to_string();
            let replaced = self.replace(spec);
            Logger::info(
                "SCHEMA_OVERRIDE",
                &[
                    ("collection", name.as_str()),
                    ("dir", dir_display.as_str()),
                    ("replaced", if replaced { "true" } else { "false" }),
                ],
            );
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name() == name)
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaDefinition> {
        self.get(name).map(|c| &c.schema)
    }

    pub fn collections(&self) -> impl Iterator<Item = &CollectionSpec> {
        self.collections.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
