//! CLI module for GlobalMarket
//!
//! Provides command-line interface for:
//! - validate: check documents from a file or stdin against a collection
//! - examples: run the built-in example documents
//! - schemas: list loaded collections, required fields and indexes

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod report;

pub use args::{Cli, Command};
pub use commands::{run, run_command, Session, EXIT_OK, EXIT_REJECTED};
pub use config::{Config, OutputFormat};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_documents, read_documents};
pub use report::{render_json, render_text};
