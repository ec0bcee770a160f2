//! Schema loader for `$jsonSchema` collection declarations
//!
//! A declaration file mirrors the arguments of the store's
//! `createCollection` call:
//!
//! ```json
//! {
//!   "collection": "reviews",
//!   "validator": { "$jsonSchema": { "bsonType": "object", ... } },
//!   "validationLevel": "strict",
//!   "validationAction": "error",
//!   "indexes": [ { "keys": { "review_id": 1 }, "unique": true } ]
//! }
//! ```
//!
//! Structural problems (unknown types, constraints that do not apply to the
//! declared type, bad regexes, inverted bounds) fail the load.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::Logger;

use super::collection::{CollectionSpec, Direction, IndexKey, IndexSpec};
use super::errors::{SchemaDefinitionError, SchemaResult};
use super::types::{
    child_path, ArrayRule, Bound, FieldRule, FieldSpec, NumberRule, ObjectRule, Pattern,
    SchemaDefinition, StringRule, ValidationAction,
};
use super::value::BsonType;

const COMMON_KEYWORDS: &[&str] = &["bsonType", "description", "title"];
const STRING_KEYWORDS: &[&str] = &["minLength", "maxLength", "pattern", "enum"];
const NUMBER_KEYWORDS: &[&str] = &["minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum"];
const ARRAY_KEYWORDS: &[&str] = &["minItems", "maxItems", "items"];
const OBJECT_KEYWORDS: &[&str] = &["required", "properties", "additionalProperties"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CollectionDeclaration {
    collection: String,
    #[serde(default)]
    description: Option<String>,
    validator: ValidatorDeclaration,
    #[serde(default)]
    validation_level: Option<String>,
    #[serde(default)]
    validation_action: Option<String>,
    #[serde(default)]
    indexes: Vec<IndexDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValidatorDeclaration {
    #[serde(rename = "$jsonSchema")]
    json_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexDeclaration {
    keys: Map<String, Value>,
    #[serde(default)]
    unique: bool,
}

/// Loads collection declarations from a directory of `*.json` files.
pub struct SchemaLoader {
    schema_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the directory, in file name order.
    pub fn load_all(&self) -> SchemaResult<Vec<CollectionSpec>> {
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaDefinitionError::MalformedFile {
                path: self.schema_dir.display().to_string(),
                reason: format!("failed to read schema directory: {}", e),
            }
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| SchemaDefinitionError::MalformedFile {
                    path: self.schema_dir.display().to_string(),
                    reason: format!("failed to read directory entry: {}", e),
                })?
                .path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut specs: Vec<CollectionSpec> = Vec::with_capacity(paths.len());
        for path in paths {
            let spec = Self::load_file(&path)?;
            if specs.iter().any(|s| s.name() == spec.name()) {
                return Err(SchemaDefinitionError::DuplicateCollection(
                    spec.name().to_string(),
                ));
            }
            specs.push(spec);
        }
        Ok(specs)
    }

    /// Loads a single declaration file.
    pub fn load_file(path: &Path) -> SchemaResult<CollectionSpec> {
        let origin = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| SchemaDefinitionError::MalformedFile {
            path: origin.clone(),
            reason: format!("failed to read file: {}", e),
        })?;
        Self::parse_str(&content, &origin)
    }

    /// Parses a declaration from JSON text. `origin` names the source in errors.
    pub fn parse_str(content: &str, origin: &str) -> SchemaResult<CollectionSpec> {
        let declaration: CollectionDeclaration =
            serde_json::from_str(content).map_err(|e| SchemaDefinitionError::MalformedFile {
                path: origin.to_string(),
                reason: format!("invalid declaration: {}", e),
            })?;
        let spec = build_collection(declaration)?;

        Logger::trace(
            "SCHEMA_LOADED",
            &[
                ("collection", spec.name()),
                ("origin", origin),
                ("fingerprint", spec.fingerprint()),
            ],
        );
        Ok(spec)
    }

    /// Parses a bare `$jsonSchema` document into a permissive schema.
    pub fn parse_schema(collection: &str, json_schema: &Value) -> SchemaResult<SchemaDefinition> {
        SchemaDefinition::new(collection, parse_root(json_schema)?)
    }
}

fn build_collection(declaration: CollectionDeclaration) -> SchemaResult<CollectionSpec> {
    let collection = declaration.collection;

    let strict = match declaration.validation_level.as_deref() {
        None | Some("moderate") => false,
        Some("strict") => true,
        Some(other) => {
            return Err(SchemaDefinitionError::InvalidOption {
                collection,
                option: "validationLevel",
                value: other.to_string(),
            })
        }
    };
    let action = match declaration.validation_action.as_deref() {
        None | Some("error") => ValidationAction::Error,
        Some("warn") => ValidationAction::Warn,
        Some(other) => {
            return Err(SchemaDefinitionError::InvalidOption {
                collection,
                option: "validationAction",
                value: other.to_string(),
            })
        }
    };

    let mut schema = SchemaDefinition::new(
        collection.as_str(),
        parse_root(&declaration.validator.json_schema)?,
    )?
    .with_strict(strict)
    .with_action(action);
    if let Some(description) = declaration.description {
        schema = schema.with_description(description);
    }

    let indexes = declaration
        .indexes
        .into_iter()
        .map(|index| parse_index(&collection, index))
        .collect::<SchemaResult<Vec<_>>>()?;

    CollectionSpec::new(schema, indexes)
}

fn parse_index(collection: &str, index: IndexDeclaration) -> SchemaResult<IndexSpec> {
    let mut keys = Vec::with_capacity(index.keys.len());
    for (field, order) in index.keys {
        let direction = match order.as_i64() {
            Some(1) => Direction::Ascending,
            Some(-1) => Direction::Descending,
            _ => {
                return Err(SchemaDefinitionError::InvalidIndex {
                    collection: collection.to_string(),
                    reason: format!("key '{}' must be 1 or -1, got {}", field, order),
                })
            }
        };
        keys.push(IndexKey { field, direction });
    }
    Ok(IndexSpec {
        keys,
        unique: index.unique,
    })
}

fn parse_root(node: &Value) -> SchemaResult<ObjectRule> {
    match parse_rule(node, "")? {
        FieldRule::Object(rule) => Ok(rule),
        _ => Err(SchemaDefinitionError::malformed(
            "",
            "bsonType",
            "'object' at the document root",
        )),
    }
}

fn parse_rule(node: &Value, path: &str) -> SchemaResult<FieldRule> {
    let obj = node
        .as_object()
        .ok_or_else(|| SchemaDefinitionError::malformed(path, "schema", "an object"))?;

    let type_name = match obj.get("bsonType") {
        Some(Value::String(name)) => name.as_str(),
        Some(_) => return Err(SchemaDefinitionError::malformed(path, "bsonType", "a string")),
        None => {
            return Err(SchemaDefinitionError::UnknownType {
                path: path.to_string(),
                name: String::new(),
            })
        }
    };

    let (bson_type, applicable) = match type_name {
        "string" => (BsonType::String, STRING_KEYWORDS),
        "int" => (BsonType::Int, NUMBER_KEYWORDS),
        "long" => (BsonType::Long, NUMBER_KEYWORDS),
        "double" | "decimal" | "number" => (BsonType::Double, NUMBER_KEYWORDS),
        "bool" => (BsonType::Bool, &[][..]),
        "date" => (BsonType::Date, &[][..]),
        "array" => (BsonType::Array, ARRAY_KEYWORDS),
        "object" => (BsonType::Object, OBJECT_KEYWORDS),
        other => {
            return Err(SchemaDefinitionError::UnknownType {
                path: path.to_string(),
                name: other.to_string(),
            })
        }
    };

    for keyword in obj.keys() {
        let keyword = keyword.as_str();
        if COMMON_KEYWORDS.contains(&keyword) || applicable.contains(&keyword) {
            continue;
        }
        let known = [STRING_KEYWORDS, NUMBER_KEYWORDS, ARRAY_KEYWORDS, OBJECT_KEYWORDS]
            .iter()
            .any(|set| set.contains(&keyword));
        return Err(if known {
            SchemaDefinitionError::InapplicableConstraint {
                path: path.to_string(),
                keyword: keyword.to_string(),
                bson_type,
            }
        } else {
            SchemaDefinitionError::UnsupportedKeyword {
                path: path.to_string(),
                keyword: keyword.to_string(),
            }
        });
    }

    Ok(match bson_type {
        BsonType::String => FieldRule::String(parse_string(obj, path)?),
        BsonType::Int => FieldRule::Number(parse_number(obj, path, NumberRule::int())?),
        BsonType::Long => FieldRule::Number(parse_number(obj, path, NumberRule::long())?),
        BsonType::Double => FieldRule::Number(parse_number(obj, path, NumberRule::double())?),
        BsonType::Bool => FieldRule::Bool,
        BsonType::Date => FieldRule::Date,
        BsonType::Array => FieldRule::Array(parse_array(obj, path)?),
        BsonType::Object | BsonType::Null => FieldRule::Object(parse_object(obj, path)?),
    })
}

fn parse_string(obj: &Map<String, Value>, path: &str) -> SchemaResult<StringRule> {
    let mut rule = StringRule::new();
    rule.min_length = usize_keyword(obj, "minLength", path)?;
    rule.max_length = usize_keyword(obj, "maxLength", path)?;

    if let Some(value) = obj.get("pattern") {
        let source = value
            .as_str()
            .ok_or_else(|| SchemaDefinitionError::malformed(path, "pattern", "a string"))?;
        let pattern = Pattern::new(source).map_err(|e| SchemaDefinitionError::InvalidPattern {
            path: path.to_string(),
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        rule = rule.pattern(pattern);
    }

    if let Some(value) = obj.get("enum") {
        let values = value
            .as_array()
            .ok_or_else(|| SchemaDefinitionError::malformed(path, "enum", "an array of strings"))?;
        let allowed = values
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    SchemaDefinitionError::malformed(path, "enum", "an array of strings")
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        rule.allowed = Some(allowed);
    }

    Ok(rule)
}

fn parse_number(obj: &Map<String, Value>, path: &str, mut rule: NumberRule) -> SchemaResult<NumberRule> {
    rule.minimum = bound_keyword(obj, "minimum", "exclusiveMinimum", path)?;
    rule.maximum = bound_keyword(obj, "maximum", "exclusiveMaximum", path)?;
    Ok(rule)
}

fn parse_array(obj: &Map<String, Value>, path: &str) -> SchemaResult<ArrayRule> {
    let mut rule = ArrayRule::any();
    rule.min_items = usize_keyword(obj, "minItems", path)?;
    rule.max_items = usize_keyword(obj, "maxItems", path)?;
    if let Some(items) = obj.get("items") {
        rule.items = Some(Box::new(parse_rule(items, &format!("{}[]", path))?));
    }
    Ok(rule)
}

fn parse_object(obj: &Map<String, Value>, path: &str) -> SchemaResult<ObjectRule> {
    let mut rule = ObjectRule::new();

    if let Some(value) = obj.get("additionalProperties") {
        rule.additional_properties = value.as_bool().ok_or_else(|| {
            SchemaDefinitionError::malformed(path, "additionalProperties", "a boolean")
        })?;
    }

    if let Some(value) = obj.get("properties") {
        let properties = value
            .as_object()
            .ok_or_else(|| SchemaDefinitionError::malformed(path, "properties", "an object"))?;
        for (name, child) in properties {
            let child_rule = parse_rule(child, &child_path(path, name))?;
            rule.fields.push(FieldSpec {
                name: name.clone(),
                required: false,
                rule: child_rule,
                description: child
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }

    if let Some(value) = obj.get("required") {
        let names = value
            .as_array()
            .ok_or_else(|| SchemaDefinitionError::malformed(path, "required", "an array of strings"))?;
        for name in names {
            let name = name.as_str().ok_or_else(|| {
                SchemaDefinitionError::malformed(path, "required", "an array of strings")
            })?;
            let field = rule
                .fields
                .iter_mut()
                .find(|f| f.name == name)
                .ok_or_else(|| SchemaDefinitionError::RequiredNotDeclared {
                    path: path.to_string(),
                    field: name.to_string(),
                })?;
            field.required = true;
        }
    }

    Ok(rule)
}

fn usize_keyword(obj: &Map<String, Value>, keyword: &str, path: &str) -> SchemaResult<Option<usize>> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| SchemaDefinitionError::malformed(path, keyword, "a non-negative integer")),
    }
}

fn bound_keyword(
    obj: &Map<String, Value>,
    keyword: &str,
    exclusive_keyword: &str,
    path: &str,
) -> SchemaResult<Option<Bound>> {
    let exclusive = match obj.get(exclusive_keyword) {
        None => false,
        Some(value) => value
            .as_bool()
            .ok_or_else(|| SchemaDefinitionError::malformed(path, exclusive_keyword, "a boolean"))?,
    };

    match obj.get(keyword) {
        None if exclusive => Err(SchemaDefinitionError::bounds(
            path,
            format!("{} requires {}", exclusive_keyword, keyword),
        )),
        None => Ok(None),
        Some(value) => {
            let value = value
                .as_f64()
                .ok_or_else(|| SchemaDefinitionError::malformed(path, keyword, "a number"))?;
            Ok(Some(Bound { value, exclusive }))
        }
    }
}
