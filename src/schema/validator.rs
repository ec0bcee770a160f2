//! Schema validator for documents
//!
//! Validation semantics:
//! - Every missing required field is reported
//! - Declared fields must carry their declared BSON type
//! - Type-specific constraints run only after the type check passed
//! - Undeclared fields are reported only in strict mode or below an object
//!   declared with `additionalProperties: false`
//! - Every violation is collected; validation never stops at the first one
//!
//! Ordering: missing required fields first (declaration order), then fields
//! in document order, recursing depth-first into arrays and nested objects.

use serde_json::{Map, Number, Value};

use super::types::{
    child_path, ArrayRule, FieldRule, NumberRule, ObjectRule, SchemaDefinition, StringRule,
    ROOT_LABEL,
};
use super::value::{bson_type_of, BsonType, Document};
use super::violation::{Limit, ValidationResult, Violation, ViolationKind};

/// Validates documents against schema definitions.
///
/// The validator holds no state between calls. A single instance may be
/// shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    force_strict: bool,
}

impl SchemaValidator {
    /// Honours each schema's own strict flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats every schema as strict.
    pub fn strict() -> Self {
        Self { force_strict: true }
    }

    pub fn force_strict(mut self, force: bool) -> Self {
        self.force_strict = force;
        self
    }

    /// Whether undeclared fields are violations for `schema`
    pub fn is_strict_for(&self, schema: &SchemaDefinition) -> bool {
        self.force_strict || schema.strict
    }

    /// Validates a document against a schema.
    pub fn validate(&self, schema: &SchemaDefinition, document: &Document) -> ValidationResult {
        let mut walk = Walk {
            strict: self.is_strict_for(schema),
            violations: Vec::new(),
        };
        walk.object(&schema.root, document, "");
        ValidationResult::from_violations(walk.violations)
    }

    /// Validates an arbitrary JSON value; anything but an object is rejected
    /// with a type mismatch at `$root`.
    pub fn validate_value(&self, schema: &SchemaDefinition, value: &Value) -> ValidationResult {
        match value {
            Value::Object(document) => self.validate(schema, document),
            other => ValidationResult::Rejected(vec![Violation::new(
                ROOT_LABEL,
                ViolationKind::TypeMismatch {
                    expected: BsonType::Object,
                    actual: bson_type_of(other),
                },
            )]),
        }
    }
}

/// Validates with default settings.
pub fn validate(schema: &SchemaDefinition, document: &Document) -> ValidationResult {
    SchemaValidator::new().validate(schema, document)
}

/// Store-assigned primary key. Undeclared `_id` at the root is never an
/// unknown field.
const ID_FIELD: &str = "_id";

struct Walk {
    strict: bool,
    violations: Vec<Violation>,
}

impl Walk {
    fn push(&mut self, path: &str, kind: ViolationKind) {
        self.violations.push(Violation::new(path, kind));
    }

    fn object(&mut self, rule: &ObjectRule, obj: &Map<String, Value>, prefix: &str) {
        for name in rule.required_fields() {
            if !obj.contains_key(name) {
                self.push(&child_path(prefix, name), ViolationKind::MissingRequiredField);
            }
        }

        let closed = self.strict || !rule.additional_properties;
        for (key, value) in obj {
            let path = child_path(prefix, key);
            match rule.get(key) {
                Some(spec) => self.value(&spec.rule, value, &path),
                None if prefix.is_empty() && key == ID_FIELD => {}
                None if closed => self.push(&path, ViolationKind::UnknownFieldViolation),
                None => {}
            }
        }
    }

    fn value(&mut self, rule: &FieldRule, value: &Value, path: &str) {
        let actual = bson_type_of(value);
        if !rule.accepts(actual) {
            self.push(
                path,
                ViolationKind::TypeMismatch {
                    expected: rule.bson_type(),
                    actual,
                },
            );
            return;
        }

        match (rule, value) {
            (FieldRule::String(r), Value::String(s)) => self.string(r, s, path),
            (FieldRule::Number(r), Value::Number(n)) => self.number(r, n, path),
            (FieldRule::Array(r), Value::Array(items)) => self.array(r, items, path),
            (FieldRule::Object(r), Value::Object(obj)) => self.object(r, obj, path),
            // bool and date carry no constraints beyond their type
            _ => {}
        }
    }

    fn string(&mut self, rule: &StringRule, s: &str, path: &str) {
        let len = s.chars().count();
        if let Some(min) = rule.min_length {
            if len < min {
                self.push(
                    path,
                    ViolationKind::LengthViolation {
                        limit: Limit::Minimum,
                        bound: min,
                        actual: len,
                    },
                );
            }
        }
        if let Some(max) = rule.max_length {
            if len > max {
                self.push(
                    path,
                    ViolationKind::LengthViolation {
                        limit: Limit::Maximum,
                        bound: max,
                        actual: len,
                    },
                );
            }
        }
        if let Some(pattern) = &rule.pattern {
            if !pattern.is_full_match(s) {
                self.push(
                    path,
                    ViolationKind::PatternViolation {
                        pattern: pattern.as_str().to_string(),
                        actual: s.to_string(),
                    },
                );
            }
        }
        if let Some(allowed) = &rule.allowed {
            if !allowed.iter().any(|v| v == s) {
                self.push(
                    path,
                    ViolationKind::EnumViolation {
                        allowed: allowed.clone(),
                        actual: s.to_string(),
                    },
                );
            }
        }
    }

    fn number(&mut self, rule: &NumberRule, n: &Number, path: &str) {
        let Some(actual) = n.as_f64() else {
            return;
        };
        if let Some(bound) = rule.minimum {
            if !bound.admits_from_below(actual) {
                self.push(
                    path,
                    ViolationKind::RangeViolation {
                        limit: Limit::Minimum,
                        bound,
                        actual,
                    },
                );
            }
        }
        if let Some(bound) = rule.maximum {
            if !bound.admits_from_above(actual) {
                self.push(
                    path,
                    ViolationKind::RangeViolation {
                        limit: Limit::Maximum,
                        bound,
                        actual,
                    },
                );
            }
        }
    }

    fn array(&mut self, rule: &ArrayRule, items: &[Value], path: &str) {
        if let Some(min) = rule.min_items {
            if items.len() < min {
                self.push(
                    path,
                    ViolationKind::ArityViolation {
                        limit: Limit::Minimum,
                        bound: min,
                        actual: items.len(),
                    },
                );
            }
        }
        if let Some(max) = rule.max_items {
            if items.len() > max {
                self.push(
                    path,
                    ViolationKind::ArityViolation {
                        limit: Limit::Maximum,
                        bound: max,
                        actual: items.len(),
                    },
                );
            }
        }
        if let Some(item_rule) = &rule.items {
            for (i, item) in items.iter().enumerate() {
                self.value(item_rule, item, &format!("{}[{}]", path, i));
            }
        }
    }
}
