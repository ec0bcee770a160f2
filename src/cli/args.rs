//! CLI argument definitions using clap
//!
//! Commands:
//! - globalmarket validate --collection <name> [--file <path>] [--strict] [--json]
//! - globalmarket examples [--json]
//! - globalmarket schemas [--json]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GlobalMarket - validate retail documents against collection schemas
#[derive(Parser, Debug)]
#[command(name = "globalmarket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate documents read from a file or stdin
    Validate {
        /// Target collection (products, orders, customers, reviews, ...)
        #[arg(long, short)]
        collection: String,

        /// Input file: one object, an array of objects, or one object per line.
        /// Reads stdin when omitted.
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Reject undeclared fields in every collection
        #[arg(long)]
        strict: bool,

        /// Emit one JSON object per document
        #[arg(long)]
        json: bool,
    },

    /// Validate the built-in example documents
    Examples {
        /// Emit one JSON object per document
        #[arg(long)]
        json: bool,
    },

    /// List loaded collection schemas and their indexes
    Schemas {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
