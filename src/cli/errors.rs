//! CLI-specific error types
//!
//! All CLI errors end the run with exit status 1. Rejected documents are
//! not errors; they only change the exit status.

use std::fmt;
use std::io;

use crate::schema::SchemaDefinitionError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/input file)
    IoError,
    /// Input is not a document or list of documents
    InputError,
    /// Schema declaration failed to load
    SchemaError,
    /// Collection not present in the catalog
    UnknownCollection,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "GM_CLI_CONFIG_ERROR",
            Self::IoError => "GM_CLI_IO_ERROR",
            Self::InputError => "GM_CLI_INPUT_ERROR",
            Self::SchemaError => "GM_CLI_SCHEMA_ERROR",
            Self::UnknownCollection => "GM_CLI_UNKNOWN_COLLECTION",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InputError, msg)
    }

    pub fn unknown_collection(name: &str, known: &[&str]) -> Self {
        Self::new(
            CliErrorCode::UnknownCollection,
            format!(
                "Collection '{}' not found (known: {})",
                name,
                known.join(", ")
            ),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::input_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaDefinitionError> for CliError {
    fn from(e: SchemaDefinitionError) -> Self {
        Self::new(CliErrorCode::SchemaError, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
