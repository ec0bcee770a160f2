//! Runtime BSON type classification for JSON documents
//!
//! Documents arrive as JSON. The BSON type of each value is derived as:
//! - integral numbers within 32 bits are `int`, wider ones `long`, all
//!   other numbers are `double`
//! - `{"$date": ...}` (extended JSON) is `date`
//! - everything else maps to its obvious JSON counterpart

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A document: an ordered mapping from field name to value.
pub type Document = Map<String, Value>;

/// BSON type tags referenced by schema type constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BsonType {
    String,
    Int,
    Long,
    Double,
    Bool,
    Date,
    Array,
    Object,
    Null,
}

impl BsonType {
    /// Returns the type name used in schemas and violation reports
    pub fn name(&self) -> &'static str {
        match self {
            BsonType::String => "string",
            BsonType::Int => "int",
            BsonType::Long => "long",
            BsonType::Double => "double",
            BsonType::Bool => "bool",
            BsonType::Date => "date",
            BsonType::Array => "array",
            BsonType::Object => "object",
            BsonType::Null => "null",
        }
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the BSON type of a JSON value.
pub fn bson_type_of(value: &Value) -> BsonType {
    match value {
        Value::Null => BsonType::Null,
        Value::Bool(_) => BsonType::Bool,
        Value::Number(n) if n.as_i64().map_or(false, |i| i32::try_from(i).is_ok()) => {
            BsonType::Int
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => BsonType::Long,
        Value::Number(_) => BsonType::Double,
        Value::String(_) => BsonType::String,
        Value::Array(_) => BsonType::Array,
        Value::Object(obj) if parse_extended_date(obj).is_some() => BsonType::Date,
        Value::Object(_) => BsonType::Object,
    }
}

/// Parses an extended JSON date wrapper.
///
/// Accepted forms:
/// - `{"$date": "2024-03-01T10:00:00Z"}` (RFC 3339)
/// - `{"$date": 1709287200000}` (epoch milliseconds)
/// - `{"$date": {"$numberLong": "1709287200000"}}`
pub fn parse_extended_date(obj: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if obj.len() != 1 {
        return None;
    }

    match obj.get("$date")? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::Object(inner) if inner.len() == 1 => inner
            .get("$numberLong")?
            .as_str()?
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
