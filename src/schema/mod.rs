//! Schema validation subsystem
//!
//! Schemas are declarative, per-collection rule trees loaded once at
//! startup and read-only afterwards. Documents are validated against them
//! before they reach the store.
//!
//! # Design Principles
//!
//! - Every violation is reported, never just the first
//! - Violations are data; only schema definition mistakes are errors
//! - No coercion: `int` fields reject fractional numbers
//! - Validation is a pure function of schema and document

mod collection;
mod errors;
mod loader;
mod types;
mod validator;
mod value;
mod violation;

pub use collection::{CollectionSpec, Direction, IndexKey, IndexSpec};
pub use errors::{SchemaDefinitionError, SchemaResult};
pub use loader::SchemaLoader;
pub use types::{
    ArrayRule, Bound, FieldRule, FieldSpec, NumberKind, NumberRule, ObjectRule, Pattern,
    SchemaDefinition, StringRule, ValidationAction,
};
pub use validator::{validate, SchemaValidator};
pub use value::{bson_type_of, parse_extended_date, BsonType, Document};
pub use violation::{Limit, ValidationResult, Violation, ViolationKind};
