//! Collection declarations: a schema plus its secondary index metadata
//!
//! Index declarations describe what the document store is expected to
//! build. They are checked against the schema here, but uniqueness is the
//! store's job and is never enforced by this crate.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

use super::errors::{SchemaDefinitionError, SchemaResult};
use super::types::SchemaDefinition;

/// Index key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The `1` / `-1` form used in index declarations
    pub fn as_i8(&self) -> i8 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexKey {
    pub field: String,
    pub direction: Direction,
}

/// A secondary index declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub keys: Vec<IndexKey>,
    pub unique: bool,
}

impl IndexSpec {
    pub fn new(keys: Vec<(&str, Direction)>) -> Self {
        Self {
            keys: keys
                .into_iter()
                .map(|(field, direction)| IndexKey {
                    field: field.to_string(),
                    direction,
                })
                .collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Conventional store index name (`category_1_sub_category_1`)
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|k| format!("{}_{}", k.field, k.direction.as_i8()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .keys
            .iter()
            .map(|k| format!("{}: {}", k.field, k.direction.as_i8()))
            .collect();
        write!(f, "{{ {} }}", keys.join(", "))?;
        if self.unique {
            write!(f, " unique")?;
        }
        Ok(())
    }
}

/// A collection: its schema, declared indexes, and a content fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSpec {
    pub schema: SchemaDefinition,
    pub indexes: Vec<IndexSpec>,
    #[serde(skip)]
    fingerprint: String,
}

impl CollectionSpec {
    /// Builds a collection, checking that every index names a declared field.
    pub fn new(schema: SchemaDefinition, indexes: Vec<IndexSpec>) -> SchemaResult<Self> {
        for index in &indexes {
            if index.keys.is_empty() {
                return Err(SchemaDefinitionError::InvalidIndex {
                    collection: schema.collection.clone(),
                    reason: "index declares no keys".into(),
                });
            }
            for key in &index.keys {
                if schema.root.lookup_path(&key.field).is_none() {
                    return Err(SchemaDefinitionError::InvalidIndex {
                        collection: schema.collection.clone(),
                        reason: format!("'{}' is not a declared field", key.field),
                    });
                }
            }
        }

        let canonical = serde_json::to_vec(&(&schema, &indexes)).map_err(|e| {
            SchemaDefinitionError::MalformedFile {
                path: schema.collection.clone(),
                reason: format!("cannot serialize schema: {}", e),
            }
        })?;
        let fingerprint = Sha256::digest(&canonical)
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        Ok(Self {
            schema,
            indexes,
            fingerprint,
        })
    }

    pub fn name(&self) -> &str {
        &self.schema.collection
    }

    /// SHA-256 of the canonical schema and index declarations, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn unique_indexes(&self) -> impl Iterator<Item = &IndexSpec> {
        self.indexes.iter().filter(|i| i.unique)
    }
}
