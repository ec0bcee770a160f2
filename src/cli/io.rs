//! Document input
//!
//! Accepted input shapes (UTF-8):
//! - a single JSON value
//! - a JSON array, each element validated as one document
//! - newline-delimited JSON, one document per line
//!
//! Elements that are not objects are passed through; the validator reports
//! them as type mismatches at `$root`.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads documents from `file`, or stdin when `None`
pub fn read_documents(file: Option<&Path>) -> CliResult<Vec<Value>> {
    let content = match file {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read '{}': {}", path.display(), e))
        })?,
        None => {
            let mut buffer = String::new();
            io::stdin().lock().read_to_string(&mut buffer)?;
            buffer
        }
    };
    parse_documents(&content)
}

pub fn parse_documents(content: &str) -> CliResult<Vec<Value>> {
    if content.trim().is_empty() {
        return Err(CliError::input_error("Empty input"));
    }

    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Ok(match value {
            Value::Array(items) => items,
            other => vec![other],
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::input_error(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}
