//! CLI command implementations
//!
//! Every run follows the same sequence:
//! 1. Load configuration (optional file, defaults otherwise)
//! 2. Configure logging and stamp the run id
//! 3. Build the catalog once (built-in declarations plus overrides)
//! 4. Dispatch the command, writing reports to stdout
//!
//! Exit status: 0 when every document was accepted (or only warned),
//! 2 when any document was rejected, 1 on errors (handled by `main`).

use std::io::{self, Write};

use uuid::Uuid;

use crate::catalog::{builtin_examples, Catalog};
use crate::observability::{Logger, ValidationMetrics};
use crate::schema::{CollectionSpec, SchemaValidator, ValidationAction, ValidationResult};
use serde_json::Value;

use super::args::{Cli, Command};
use super::config::{Config, OutputFormat};
use super::errors::{CliError, CliResult};
use super::io::read_documents;
use super::report::{outcome, render_collection_json, render_collection_text, render_json, render_text};

pub const EXIT_OK: i32 = 0;
pub const EXIT_REJECTED: i32 = 2;

/// Parse process arguments and run
pub fn run() -> CliResult<i32> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the command described by `cli`
pub fn run_command(cli: Cli) -> CliResult<i32> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Logger::set_min_severity(config.log_severity());
    Logger::set_run_id(Uuid::new_v4().to_string());

    let session = Session::open(config)?;
    let mut stdout = io::stdout().lock();

    let status = match cli.command {
        Command::Validate {
            collection,
            file,
            strict,
            json,
        } => {
            let documents = read_documents(file.as_deref())?;
            session.validate(&collection, &documents, strict, json, &mut stdout)?
        }
        Command::Examples { json } => session.examples(json, &mut stdout)?,
        Command::Schemas { json } => session.schemas(json, &mut stdout)?,
    };
    stdout.flush()?;

    let status_str = status.to_string();
    let metrics = session.metrics.to_json();
    Logger::info(
        "RUN_COMPLETE",
        &[("exit_status", status_str.as_str()), ("metrics", metrics.as_str())],
    );
    Ok(status)
}

/// Loaded state for one run
pub struct Session {
    config: Config,
    catalog: Catalog,
    metrics: ValidationMetrics,
}

impl Session {
    /// Builds the catalog described by `config`
    pub fn open(config: Config) -> CliResult<Self> {
        let mut catalog = Catalog::builtin()?;
        if let Some(dir) = config.schema_path() {
            catalog = catalog.with_overrides_from(dir)?;
        }

        let names = catalog.names().join(",");
        Logger::info("CATALOG_LOADED", &[("collections", names.as_str())]);

        Ok(Self::with_catalog(config, catalog))
    }

    pub fn with_catalog(config: Config, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            metrics: ValidationMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &ValidationMetrics {
        &self.metrics
    }

    fn collection(&self, name: &str) -> CliResult<&CollectionSpec> {
        self.catalog
            .get(name)
            .ok_or_else(|| CliError::unknown_collection(name, &self.catalog.names()))
    }

    fn wants_json(&self, flag: bool) -> bool {
        flag || self.config.output == OutputFormat::Json
    }

    /// `validate`: checks each document against one collection
    pub fn validate<W: Write>(
        &self,
        collection: &str,
        documents: &[Value],
        strict: bool,
        json: bool,
        out: &mut W,
    ) -> CliResult<i32> {
        let spec = self.collection(collection)?;
        let validator = SchemaValidator::new().force_strict(strict || self.config.strict);
        let json = self.wants_json(json);

        let mut status = EXIT_OK;
        for document in documents {
            let result = validator.validate_value(&spec.schema, document);
            if !result.is_accepted() && spec.schema.action == ValidationAction::Error {
                status = EXIT_REJECTED;
            }
            self.report(spec, None, &result, json, out)?;
        }
        Ok(status)
    }

    /// `examples`: runs the built-in example documents. Always exits 0; the
    /// rejections are part of the demonstration.
    pub fn examples<W: Write>(&self, json: bool, out: &mut W) -> CliResult<i32> {
        let validator = SchemaValidator::new().force_strict(self.config.strict);
        let json = self.wants_json(json);

        if !json {
            writeln!(out, "=== validation examples ===")?;
        }
        for example in builtin_examples() {
            let spec = self.collection(example.collection)?;
            let result = validator.validate(&spec.schema, &example.document);
            self.report(spec, Some(example.label), &result, json, out)?;
        }
        Ok(EXIT_OK)
    }

    /// `schemas`: lists loaded collections
    pub fn schemas<W: Write>(&self, json: bool, out: &mut W) -> CliResult<i32> {
        if self.wants_json(json) {
            let listing: Vec<Value> = self.catalog.collections().map(render_collection_json).collect();
            serde_json::to_writer_pretty(&mut *out, &listing)?;
            writeln!(out)?;
        } else {
            for spec in self.catalog.collections() {
                write!(out, "{}", render_collection_text(spec))?;
            }
        }
        Ok(EXIT_OK)
    }

    fn report<W: Write>(
        &self,
        spec: &CollectionSpec,
        label: Option<&str>,
        result: &ValidationResult,
        json: bool,
        out: &mut W,
    ) -> CliResult<()> {
        self.metrics.record(result);

        let action = spec.schema.action;
        let count = result.violations().len().to_string();
        let fields = [
            ("collection", spec.name()),
            ("label", label.unwrap_or("")),
            ("violations", count.as_str()),
        ];
        match outcome(result, action) {
            "accepted" => Logger::trace("DOCUMENT_ACCEPTED", &fields),
            "warned" => Logger::warn("DOCUMENT_WARNED", &fields),
            _ => Logger::info("DOCUMENT_REJECTED", &fields),
        }

        if json {
            serde_json::to_writer(&mut *out, &render_json(spec.name(), label, action, result))?;
            writeln!(out)?;
        } else {
            write!(out, "{}", render_text(spec.name(), label, action, result))?;
        }
        Ok(())
    }
}
