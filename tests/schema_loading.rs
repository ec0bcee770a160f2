//! Schema Loading Tests
//!
//! Declarations loaded from disk:
//! - Structural errors are fatal and carry stable codes
//! - Override directories replace built-in collections by name
//! - The CLI honours the schema directory from its configuration

use std::fs;
use std::path::Path;

use clap::Parser;
use globalmarket::catalog::Catalog;
use globalmarket::cli::{run_command, Cli, Config, Session, EXIT_OK, EXIT_REJECTED};
use globalmarket::schema::{validate, SchemaDefinitionError, SchemaLoader};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_declaration(dir: &Path, file: &str, declaration: &Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(declaration).unwrap()).unwrap();
}

fn inventory_declaration() -> Value {
    json!({
        "collection": "inventory",
        "validator": {
            "$jsonSchema": {
                "bsonType": "object",
                "required": ["sku", "on_hand"],
                "properties": {
                    "sku": {"bsonType": "string", "pattern": "^SKU-[0-9]{4}$"},
                    "on_hand": {"bsonType": "int", "minimum": 0},
                    "bins": {"bsonType": "array", "maxItems": 2, "items": {"bsonType": "string"}}
                }
            }
        },
        "indexes": [{"keys": {"sku": 1}, "unique": true}]
    })
}

fn doc(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {}", other),
    }
}

// =============================================================================
// Structural Error Tests
// =============================================================================

/// A pattern on an int field is a definition error, not a validation result.
#[test]
fn test_pattern_on_int_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut declaration = inventory_declaration();
    declaration["validator"]["$jsonSchema"]["properties"]["on_hand"]["pattern"] = json!("^[0-9]+$");
    write_declaration(tmp.path(), "inventory.json", &declaration);

    let err = SchemaLoader::new(tmp.path()).load_all().unwrap_err();
    assert_eq!(err.code(), "GM_SCHEMA_INAPPLICABLE_CONSTRAINT");
    match err {
        SchemaDefinitionError::InapplicableConstraint { path, keyword, .. } => {
            assert_eq!(path, "on_hand");
            assert_eq!(keyword, "pattern");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_inverted_bounds_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut declaration = inventory_declaration();
    declaration["validator"]["$jsonSchema"]["properties"]["on_hand"]["maximum"] = json!(-1);
    write_declaration(tmp.path(), "inventory.json", &declaration);

    let err = SchemaLoader::new(tmp.path()).load_all().unwrap_err();
    assert_eq!(err.code(), "GM_SCHEMA_INVALID_BOUNDS");
}

#[test]
fn test_index_on_undeclared_field_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut declaration = inventory_declaration();
    declaration["indexes"] = json!([{"keys": {"warehouse": 1}}]);
    write_declaration(tmp.path(), "inventory.json", &declaration);

    let err = SchemaLoader::new(tmp.path()).load_all().unwrap_err();
    assert_eq!(err.code(), "GM_SCHEMA_INVALID_INDEX");
}

/// Two files declaring the same collection are rejected.
#[test]
fn test_duplicate_collection_across_files() {
    let tmp = TempDir::new().unwrap();
    write_declaration(tmp.path(), "a.json", &inventory_declaration());
    write_declaration(tmp.path(), "b.json", &inventory_declaration());

    let err = SchemaLoader::new(tmp.path()).load_all().unwrap_err();
    assert_eq!(
        err,
        SchemaDefinitionError::DuplicateCollection("inventory".to_string())
    );
}

// =============================================================================
// Loaded Schema Behaviour Tests
// =============================================================================

#[test]
fn test_loaded_schema_validates_documents() {
    let tmp = TempDir::new().unwrap();
    write_declaration(tmp.path(), "inventory.json", &inventory_declaration());
    fs::write(tmp.path().join("README.txt"), "ignored").unwrap();

    let specs = SchemaLoader::new(tmp.path()).load_all().unwrap();
    assert_eq!(specs.len(), 1);
    let schema = &specs[0].schema;
    assert!(!schema.strict);

    let ok = doc(json!({"sku": "SKU-0001", "on_hand": 3, "bins": ["A1"]}));
    assert!(validate(schema, &ok).is_accepted());

    let bad = doc(json!({"sku": "SKU-1", "on_hand": 3, "bins": ["A1", "A2", "A3"]}));
    let rules: Vec<_> = validate(schema, &bad)
        .violations()
        .iter()
        .map(|v| (v.path.clone(), v.rule()))
        .collect();
    assert_eq!(
        rules,
        vec![
            ("sku".to_string(), "PatternViolation"),
            ("bins".to_string(), "ArityViolation"),
        ]
    );
}

/// Loading the same declaration twice yields the same fingerprint.
#[test]
fn test_fingerprint_is_stable() {
    let tmp = TempDir::new().unwrap();
    write_declaration(tmp.path(), "inventory.json", &inventory_declaration());

    let first = SchemaLoader::new(tmp.path()).load_all().unwrap();
    let second = SchemaLoader::new(tmp.path()).load_all().unwrap();
    assert_eq!(first[0].fingerprint(), second[0].fingerprint());
    assert_eq!(first[0].fingerprint().len(), 64);
}

// =============================================================================
// Override Tests
// =============================================================================

/// An override named "reviews" replaces the built-in reviews schema.
#[test]
fn test_override_replaces_builtin_collection() {
    let tmp = TempDir::new().unwrap();
    let mut declaration = inventory_declaration();
    declaration["collection"] = json!("reviews");
    write_declaration(tmp.path(), "reviews.json", &declaration);

    let builtin = Catalog::builtin().unwrap();
    let catalog = Catalog::builtin()
        .unwrap()
        .with_overrides_from(tmp.path())
        .unwrap();

    assert_eq!(catalog.len(), 4);
    assert_ne!(
        catalog.get("reviews").unwrap().fingerprint(),
        builtin.get("reviews").unwrap().fingerprint()
    );
    let reviews = catalog.schema("reviews").unwrap();
    assert!(validate(reviews, &doc(json!({"sku": "SKU-0001", "on_hand": 0}))).is_accepted());
}

// =============================================================================
// CLI Tests
// =============================================================================

#[test]
fn test_session_uses_configured_schema_dir() {
    let tmp = TempDir::new().unwrap();
    write_declaration(tmp.path(), "inventory.json", &inventory_declaration());

    let config = Config::parse(&json!({"schema_dir": tmp.path()}).to_string()).unwrap();
    let session = Session::open(config).unwrap();

    let mut out = Vec::new();
    let status = session
        .validate("inventory", &[json!({"sku": "SKU-0001", "on_hand": 1})], false, false, &mut out)
        .unwrap();
    assert_eq!(status, EXIT_OK);

    let mut out = Vec::new();
    let status = session
        .validate("inventory", &[json!({"sku": "SKU-0001"})], false, false, &mut out)
        .unwrap();
    assert_eq!(status, EXIT_REJECTED);
    assert!(String::from_utf8(out).unwrap().contains("  - on_hand: required field is missing"));
}

#[test]
fn test_run_command_exit_status() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("products.ndjson");
    fs::write(
        &input,
        concat!(
            r#"{"product_id": "PROD-001", "product_name": "Laptop", "category": "Technology", "price": 10.0}"#,
            "\n",
            r#"{"product_id": "PROD-002", "product_name": "Mouse", "category": "Technology", "price": -1}"#,
            "\n"
        ),
    )
    .unwrap();

    let cli = Cli::parse_from([
        "globalmarket",
        "validate",
        "--collection",
        "products",
        "--file",
        input.to_str().unwrap(),
        "--json",
    ]);
    assert_eq!(run_command(cli).unwrap(), EXIT_REJECTED);

    let cli = Cli::parse_from(["globalmarket", "examples"]);
    assert_eq!(run_command(cli).unwrap(), EXIT_OK);
}

#[test]
fn test_run_command_bad_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{"log_level": "loud"}"#).unwrap();

    let cli = Cli::parse_from([
        "globalmarket",
        "--config",
        config.to_str().unwrap(),
        "schemas",
    ]);
    let err = run_command(cli).unwrap_err();
    assert_eq!(err.code_str(), "GM_CLI_CONFIG_ERROR");
}
