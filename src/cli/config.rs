//! Configuration file
//!
//! ```json
//! {
//!   "schema_dir": "./schemas.d",
//!   "strict": false,
//!   "log_level": "warn",
//!   "output": "text"
//! }
//! ```
//!
//! Every field is optional. Command-line flags take precedence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory of declarations overriding or extending the built-in ones
    #[serde(default)]
    pub schema_dir: Option<String>,

    /// Treat every collection as strict (default: false)
    #[serde(default)]
    pub strict: bool,

    /// Minimum log severity (default: "warn")
    #[serde(default)]
    pub log_level: Severity,

    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: None,
            strict: false,
            log_level: Severity::default(),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if let Some(dir) = &self.schema_dir {
            if dir.trim().is_empty() {
                return Err(CliError::config_error("schema_dir must not be empty"));
            }
        }

        Ok(())
    }

    pub fn log_severity(&self) -> Severity {
        self.log_level
    }

    pub fn schema_path(&self) -> Option<&Path> {
        self.schema_dir.as_deref().map(Path::new)
    }
}
