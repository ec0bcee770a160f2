//! Human-readable and JSON rendering of validation outcomes
//!
//! Text form, one headline per document then one line per violation:
//!
//! ```text
//! ✗ products: document rejected (1 violation)
//!   - price: -10.99 must be greater than 0
//! ```

use serde_json::{json, Value};

use crate::schema::{CollectionSpec, ValidationAction, ValidationResult, Violation};

/// Renders one outcome as text. `label` annotates the headline.
pub fn render_text(
    collection: &str,
    label: Option<&str>,
    action: ValidationAction,
    result: &ValidationResult,
) -> String {
    let heading = match label {
        Some(label) => format!("{} ({})", collection, label),
        None => collection.to_string(),
    };

    let violations = result.violations();
    let mut out = match (result, action) {
        (ValidationResult::Accepted, _) => format!("✓ {}: document accepted\n", heading),
        (ValidationResult::Rejected(_), ValidationAction::Warn) => format!(
            "! {}: document accepted with warnings ({})\n",
            heading,
            count(violations.len())
        ),
        (ValidationResult::Rejected(_), ValidationAction::Error) => format!(
            "✗ {}: document rejected ({})\n",
            heading,
            count(violations.len())
        ),
    };
    for violation in violations {
        out.push_str(&format!("  - {}\n", violation));
    }
    out
}

/// Renders one outcome as a JSON object.
pub fn render_json(
    collection: &str,
    label: Option<&str>,
    action: ValidationAction,
    result: &ValidationResult,
) -> Value {
    let mut value = json!({
        "collection": collection,
        "outcome": outcome(result, action),
        "violations": result.violations().iter().map(violation_json).collect::<Vec<_>>(),
    });
    if let (Some(label), Some(obj)) = (label, value.as_object_mut()) {
        obj.insert("label".into(), Value::String(label.to_string()));
    }
    value
}

fn violation_json(violation: &Violation) -> Value {
    let mut value = serde_json::to_value(violation).unwrap_or_else(|_| json!({ "path": violation.path }));
    if let Some(obj) = value.as_object_mut() {
        obj.insert("reason".into(), Value::String(violation.reason()));
    }
    value
}

/// `accepted`, `rejected`, or `warned` (rejected under a warn-only action)
pub fn outcome(result: &ValidationResult, action: ValidationAction) -> &'static str {
    match (result, action) {
        (ValidationResult::Accepted, _) => "accepted",
        (ValidationResult::Rejected(_), ValidationAction::Warn) => "warned",
        (ValidationResult::Rejected(_), ValidationAction::Error) => "rejected",
    }
}

/// Text listing of one collection for the `schemas` command
pub fn render_collection_text(spec: &CollectionSpec) -> String {
    let schema = &spec.schema;
    let mut out = format!(
        "{}  {}  action={}  fingerprint={}\n",
        spec.name(),
        if schema.strict { "strict" } else { "permissive" },
        schema.action.as_str(),
        &spec.fingerprint()[..12],
    );
    if let Some(description) = &schema.description {
        out.push_str(&format!("  {}\n", description));
    }
    out.push_str(&format!(
        "  required: {}\n",
        schema.required_fields().collect::<Vec<_>>().join(", ")
    ));
    for index in &spec.indexes {
        out.push_str(&format!("  index: {}\n", index));
    }
    out
}

pub fn render_collection_json(spec: &CollectionSpec) -> Value {
    let schema = &spec.schema;
    json!({
        "collection": spec.name(),
        "strict": schema.strict,
        "action": schema.action.as_str(),
        "fingerprint": spec.fingerprint(),
        "required": schema.required_fields().collect::<Vec<_>>(),
        "fields": schema.root.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        "indexes": spec.indexes.iter().map(|i| json!({
            "name": i.name(),
            "keys": i.keys.iter().map(|k| json!({ "field": k.field, "order": k.direction.as_i8() })).collect::<Vec<_>>(),
            "unique": i.unique,
        })).collect::<Vec<_>>(),
    })
}

fn count(n: usize) -> String {
    if n == 1 {
        "1 violation".to_string()
    } else {
        format!("{} violations", n)
    }
}
