//! Schema definition errors
//!
//! These are configuration mistakes detected while a schema is built or
//! loaded. Document problems are never reported here; they are violations.
//!
//! Error codes:
//! - GM_SCHEMA_UNKNOWN_TYPE
//! - GM_SCHEMA_INAPPLICABLE_CONSTRAINT
//! - GM_SCHEMA_UNSUPPORTED_KEYWORD
//! - GM_SCHEMA_MALFORMED_KEYWORD
//! - GM_SCHEMA_INVALID_PATTERN
//! - GM_SCHEMA_INVALID_BOUNDS
//! - GM_SCHEMA_EMPTY_ENUM
//! - GM_SCHEMA_DUPLICATE_FIELD
//! - GM_SCHEMA_REQUIRED_NOT_DECLARED
//! - GM_SCHEMA_INVALID_INDEX
//! - GM_SCHEMA_INVALID_OPTION
//! - GM_SCHEMA_DUPLICATE_COLLECTION
//! - GM_SCHEMA_MALFORMED_FILE

use thiserror::Error;

use super::types::display_path;
use super::value::BsonType;

/// Result type for schema construction and loading
pub type SchemaResult<T> = Result<T, SchemaDefinitionError>;

/// A structurally invalid schema. Always fatal at load time.
///
/// `path` is the dotted field path; the empty path is the document root.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaDefinitionError {
    #[error("field '{}': unknown bsonType '{name}'", display_path(.path))]
    UnknownType { path: String, name: String },

    #[error("field '{}': '{keyword}' does not apply to bsonType '{bson_type}'", display_path(.path))]
    InapplicableConstraint {
        path: String,
        keyword: String,
        bson_type: BsonType,
    },

    #[error("field '{}': unsupported keyword '{keyword}'", display_path(.path))]
    UnsupportedKeyword { path: String, keyword: String },

    #[error("field '{}': '{keyword}' must be {expected}", display_path(.path))]
    MalformedKeyword {
        path: String,
        keyword: String,
        expected: &'static str,
    },

    #[error("field '{}': invalid pattern '{pattern}': {reason}", display_path(.path))]
    InvalidPattern {
        path: String,
        pattern: String,
        reason: String,
    },

    #[error("field '{}': {reason}", display_path(.path))]
    InvalidBounds { path: String, reason: String },

    #[error("field '{}': enum must list at least one value", display_path(.path))]
    EmptyEnum { path: String },

    #[error("field '{}': '{field}' is declared more than once", display_path(.path))]
    DuplicateField { path: String, field: String },

    #[error("field '{}': required field '{field}' is not declared in properties", display_path(.path))]
    RequiredNotDeclared { path: String, field: String },

    #[error("collection '{collection}': invalid index: {reason}")]
    InvalidIndex { collection: String, reason: String },

    #[error("collection '{collection}': invalid {option} '{value}'")]
    InvalidOption {
        collection: String,
        option: &'static str,
        value: String,
    },

    #[error("collection '{0}' is declared more than once")]
    DuplicateCollection(String),

    #[error("malformed schema file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },
}

impl SchemaDefinitionError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "GM_SCHEMA_UNKNOWN_TYPE",
            Self::InapplicableConstraint { .. } => "GM_SCHEMA_INAPPLICABLE_CONSTRAINT",
            Self::UnsupportedKeyword { .. } => "GM_SCHEMA_UNSUPPORTED_KEYWORD",
            Self::MalformedKeyword { .. } => "GM_SCHEMA_MALFORMED_KEYWORD",
            Self::InvalidPattern { .. } => "GM_SCHEMA_INVALID_PATTERN",
            Self::InvalidBounds { .. } => "GM_SCHEMA_INVALID_BOUNDS",
            Self::EmptyEnum { .. } => "GM_SCHEMA_EMPTY_ENUM",
            Self::DuplicateField { .. } => "GM_SCHEMA_DUPLICATE_FIELD",
            Self::RequiredNotDeclared { .. } => "GM_SCHEMA_REQUIRED_NOT_DECLARED",
            Self::InvalidIndex { .. } => "GM_SCHEMA_INVALID_INDEX",
            Self::InvalidOption { .. } => "GM_SCHEMA_INVALID_OPTION",
            Self::DuplicateCollection(_) => "GM_SCHEMA_DUPLICATE_COLLECTION",
            Self::MalformedFile { .. } => "GM_SCHEMA_MALFORMED_FILE",
        }
    }

    pub(crate) fn malformed(path: &str, keyword: &str, expected: &'static str) -> Self {
        Self::MalformedKeyword {
            path: path.to_string(),
            keyword: keyword.to_string(),
            expected,
        }
    }

    pub(crate) fn bounds(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
