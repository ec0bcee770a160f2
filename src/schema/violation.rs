//! Violations and validation results
//!
//! Violations are data: they are aggregated and returned, never raised.

use serde::Serialize;
use std::fmt;

use super::types::Bound;
use super::value::BsonType;

/// Which side of a range was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    Minimum,
    Maximum,
}

/// The rule a document value failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule")]
pub enum ViolationKind {
    MissingRequiredField,
    TypeMismatch {
        expected: BsonType,
        actual: BsonType,
    },
    RangeViolation {
        limit: Limit,
        bound: Bound,
        actual: f64,
    },
    LengthViolation {
        limit: Limit,
        bound: usize,
        actual: usize,
    },
    PatternViolation {
        pattern: String,
        actual: String,
    },
    EnumViolation {
        allowed: Vec<String>,
        actual: String,
    },
    ArityViolation {
        limit: Limit,
        bound: usize,
        actual: usize,
    },
    UnknownFieldViolation,
}

impl ViolationKind {
    /// Returns the rule name
    pub fn rule(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredField => "MissingRequiredField",
            ViolationKind::TypeMismatch { .. } => "TypeMismatch",
            ViolationKind::RangeViolation { .. } => "RangeViolation",
            ViolationKind::LengthViolation { .. } => "LengthViolation",
            ViolationKind::PatternViolation { .. } => "PatternViolation",
            ViolationKind::EnumViolation { .. } => "EnumViolation",
            ViolationKind::ArityViolation { .. } => "ArityViolation",
            ViolationKind::UnknownFieldViolation => "UnknownFieldViolation",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingRequiredField => write!(f, "required field is missing"),
            ViolationKind::TypeMismatch { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            ViolationKind::RangeViolation {
                limit,
                bound,
                actual,
            } => match (limit, bound.exclusive) {
                (Limit::Minimum, true) => {
                    write!(f, "{} must be greater than {}", actual, bound.value)
                }
                (Limit::Minimum, false) => {
                    write!(f, "{} is less than the minimum {}", actual, bound.value)
                }
                (Limit::Maximum, true) => write!(f, "{} must be less than {}", actual, bound.value),
                (Limit::Maximum, false) => {
                    write!(f, "{} is greater than the maximum {}", actual, bound.value)
                }
            },
            ViolationKind::LengthViolation {
                limit,
                bound,
                actual,
            } => match limit {
                Limit::Minimum => write!(f, "length {} is shorter than minLength {}", actual, bound),
                Limit::Maximum => write!(f, "length {} is longer than maxLength {}", actual, bound),
            },
            ViolationKind::PatternViolation { pattern, actual } => {
                write!(f, "'{}' does not match pattern '{}'", actual, pattern)
            }
            ViolationKind::EnumViolation { allowed, actual } => {
                write!(f, "'{}' is not one of [{}]", actual, allowed.join(", "))
            }
            ViolationKind::ArityViolation {
                limit,
                bound,
                actual,
            } => match limit {
                Limit::Minimum => write!(f, "{} items, fewer than minItems {}", actual, bound),
                Limit::Maximum => write!(f, "{} items, more than maxItems {}", actual, bound),
            },
            ViolationKind::UnknownFieldViolation => {
                write!(f, "field is not declared in the schema")
            }
        }
    }
}

/// A single rule failure at a field path (`items[0].quantity`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn rule(&self) -> &'static str {
        self.kind.rule()
    }

    /// Human-readable reason
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "violations", rename_all = "lowercase")]
pub enum ValidationResult {
    Accepted,
    Rejected(Vec<Violation>),
}

impl ValidationResult {
    /// `Accepted` exactly when no violation was collected
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            ValidationResult::Accepted
        } else {
            ValidationResult::Rejected(violations)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Accepted => &[],
            ValidationResult::Rejected(violations) => violations,
        }
    }

    pub fn into_violations(self) -> Vec<Violation> {
        match self {
            ValidationResult::Accepted => Vec::new(),
            ValidationResult::Rejected(violations) => violations,
        }
    }
}
