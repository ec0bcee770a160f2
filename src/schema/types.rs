//! Schema rule tree
//!
//! Each field maps to a `FieldRule` variant that carries only the
//! constraints applicable to its type:
//! - string: length bounds, full-match pattern, enum
//! - int / double: minimum and maximum, each inclusive or exclusive
//! - bool, date: type only
//! - array: item count bounds and an optional item rule
//! - object: ordered field list and an additional-properties flag

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

use super::errors::{SchemaDefinitionError, SchemaResult};
use super::value::BsonType;

/// A compiled regular expression that must match the whole string.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source`, anchoring it so only full matches succeed.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the pattern as declared
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// A numeric bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }

    /// Whether `actual` satisfies this bound used as a minimum
    pub fn admits_from_below(&self, actual: f64) -> bool {
        if self.exclusive {
            actual > self.value
        } else {
            actual >= self.value
        }
    }

    /// Whether `actual` satisfies this bound used as a maximum
    pub fn admits_from_above(&self, actual: f64) -> bool {
        if self.exclusive {
            actual < self.value
        } else {
            actual <= self.value
        }
    }
}

/// Numeric storage kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberKind {
    /// Integral values within 32 bits
    Int,
    /// Any integral value
    Long,
    /// Any numeric value
    Double,
}

impl NumberKind {
    pub fn bson_type(&self) -> BsonType {
        match self {
            NumberKind::Int => BsonType::Int,
            NumberKind::Long => BsonType::Long,
            NumberKind::Double => BsonType::Double,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn one_of<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.as_ref().to_string()).collect());
        self
    }

    fn check(&self, path: &str) -> SchemaResult<()> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(SchemaDefinitionError::bounds(
                    path,
                    format!("minLength {} exceeds maxLength {}", min, max),
                ));
            }
        }
        if matches!(&self.allowed, Some(values) if values.is_empty()) {
            return Err(SchemaDefinitionError::EmptyEnum {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberRule {
    pub kind: NumberKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
}

impl NumberRule {
    pub fn int() -> Self {
        Self {
            kind: NumberKind::Int,
            minimum: None,
            maximum: None,
        }
    }

    pub fn long() -> Self {
        Self {
            kind: NumberKind::Long,
            minimum: None,
            maximum: None,
        }
    }

    pub fn double() -> Self {
        Self {
            kind: NumberKind::Double,
            minimum: None,
            maximum: None,
        }
    }

    pub fn min(mut self, value: f64) -> Self {
        self.minimum = Some(Bound::inclusive(value));
        self
    }

    pub fn exclusive_min(mut self, value: f64) -> Self {
        self.minimum = Some(Bound::exclusive(value));
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.maximum = Some(Bound::inclusive(value));
        self
    }

    pub fn exclusive_max(mut self, value: f64) -> Self {
        self.maximum = Some(Bound::exclusive(value));
        self
    }

    fn check(&self, path: &str) -> SchemaResult<()> {
        for bound in self.minimum.iter().chain(self.maximum.iter()) {
            if !bound.value.is_finite() {
                return Err(SchemaDefinitionError::bounds(path, "bounds must be finite"));
            }
        }
        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            let empty = if min.exclusive || max.exclusive {
                min.value >= max.value
            } else {
                min.value > max.value
            };
            if empty {
                return Err(SchemaDefinitionError::bounds(
                    path,
                    format!("range between {} and {} admits no value", min.value, max.value),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrayRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldRule>>,
}

impl ArrayRule {
    /// An array whose elements are not constrained
    pub fn any() -> Self {
        Self::default()
    }

    /// An array whose every element must satisfy `rule`
    pub fn of(rule: FieldRule) -> Self {
        Self {
            items: Some(Box::new(rule)),
            ..Self::default()
        }
    }

    pub fn min_items(mut self, count: usize) -> Self {
        self.min_items = Some(count);
        self
    }

    pub fn max_items(mut self, count: usize) -> Self {
        self.max_items = Some(count);
        self
    }

    fn check(&self, path: &str) -> SchemaResult<()> {
        if let (Some(min), Some(max)) = (self.min_items, self.max_items) {
            if min > max {
                return Err(SchemaDefinitionError::bounds(
                    path,
                    format!("minItems {} exceeds maxItems {}", min, max),
                ));
            }
        }
        match &self.items {
            Some(rule) => rule.check(&format!("{}[]", path)),
            None => Ok(()),
        }
    }
}

/// A named field within an object rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub rule: FieldRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectRule {
    /// Declared fields, in declaration order
    pub fields: Vec<FieldSpec>,
    /// When false, undeclared fields are violations at this level
    pub additional_properties: bool,
}

impl Default for ObjectRule {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            additional_properties: true,
        }
    }
}

impl ObjectRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.field(name, true, rule)
    }

    pub fn optional(self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.field(name, false, rule)
    }

    /// Rejects undeclared fields at this level
    pub fn closed(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    fn field(mut self, name: impl Into<String>, required: bool, rule: FieldRule) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            required,
            rule,
            description: None,
        });
        self
    }

    /// Looks up a declared field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolves a dotted path (`shipping_address.city`) through nested objects
    pub fn lookup_path(&self, path: &str) -> Option<&FieldSpec> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let spec = self.get(head)?;
        match (rest, &spec.rule) {
            (None, _) => Some(spec),
            (Some(rest), FieldRule::Object(inner)) => inner.lookup_path(rest),
            (Some(_), _) => None,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    fn check(&self, path: &str) -> SchemaResult<()> {
        for (i, spec) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == spec.name) {
                return Err(SchemaDefinitionError::DuplicateField {
                    path: path.to_string(),
                    field: spec.name.clone(),
                });
            }
            spec.rule.check(&child_path(path, &spec.name))?;
        }
        Ok(())
    }
}

/// Type-specific validation rule for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "bsonType", rename_all = "lowercase")]
pub enum FieldRule {
    String(StringRule),
    Number(NumberRule),
    Bool,
    Date,
    Array(ArrayRule),
    Object(ObjectRule),
}

impl FieldRule {
    pub fn string() -> Self {
        FieldRule::String(StringRule::new())
    }

    pub fn int() -> Self {
        FieldRule::Number(NumberRule::int())
    }

    pub fn long() -> Self {
        FieldRule::Number(NumberRule::long())
    }

    pub fn double() -> Self {
        FieldRule::Number(NumberRule::double())
    }

    /// Returns the declared BSON type
    pub fn bson_type(&self) -> BsonType {
        match self {
            FieldRule::String(_) => BsonType::String,
            FieldRule::Number(rule) => rule.kind.bson_type(),
            FieldRule::Bool => BsonType::Bool,
            FieldRule::Date => BsonType::Date,
            FieldRule::Array(_) => BsonType::Array,
            FieldRule::Object(_) => BsonType::Object,
        }
    }

    /// Whether a value of runtime type `actual` passes the type check.
    ///
    /// `double` admits any number and `long` any integral one. `int` admits
    /// only integral values that fit in 32 bits.
    pub fn accepts(&self, actual: BsonType) -> bool {
        match self {
            FieldRule::Number(rule) => match rule.kind {
                NumberKind::Int => actual == BsonType::Int,
                NumberKind::Long => matches!(actual, BsonType::Int | BsonType::Long),
                NumberKind::Double => {
                    matches!(actual, BsonType::Int | BsonType::Long | BsonType::Double)
                }
            },
            _ => self.bson_type() == actual,
        }
    }

    pub(crate) fn check(&self, path: &str) -> SchemaResult<()> {
        match self {
            FieldRule::String(rule) => rule.check(path),
            FieldRule::Number(rule) => rule.check(path),
            FieldRule::Bool | FieldRule::Date => Ok(()),
            FieldRule::Array(rule) => rule.check(path),
            FieldRule::Object(rule) => rule.check(path),
        }
    }
}

/// What the store does with a rejected document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    /// Refuse the write
    #[default]
    Error,
    /// Accept the write and log the violations
    Warn,
}

impl ValidationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationAction::Error => "error",
            ValidationAction::Warn => "warn",
        }
    }
}

/// Complete schema for one collection.
///
/// Immutable once built; share it freely across threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDefinition {
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root: ObjectRule,
    /// Undeclared fields are violations at every depth
    pub strict: bool,
    pub action: ValidationAction,
}

impl SchemaDefinition {
    /// Builds a permissive schema after checking its structure.
    pub fn new(collection: impl Into<String>, root: ObjectRule) -> SchemaResult<Self> {
        root.check("")?;
        Ok(Self {
            collection: collection.into(),
            description: None,
            root,
            strict: false,
            action: ValidationAction::Error,
        })
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_action(mut self, action: ValidationAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.root.required_fields()
    }
}

/// Label for the document root in messages. Internally the root path is "".
pub(crate) const ROOT_LABEL: &str = "$root";

pub(crate) fn display_path(path: &str) -> &str {
    if path.is_empty() {
        ROOT_LABEL
    } else {
        path
    }
}

pub(crate) fn child_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
