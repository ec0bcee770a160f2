//! Validation counters
//!
//! - Counters only, monotonic
//! - Thread-safe with relaxed atomics

use std::sync::atomic::{AtomicU64, Ordering};

use crate::schema::ValidationResult;

/// Running totals for one process
#[derive(Debug, Default)]
pub struct ValidationMetrics {
    documents_validated: AtomicU64,
    documents_accepted: AtomicU64,
    documents_rejected: AtomicU64,
    violations: AtomicU64,
}

impl ValidationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one validation outcome
    pub fn record(&self, result: &ValidationResult) {
        self.documents_validated.fetch_add(1, Ordering::Relaxed);
        match result {
            ValidationResult::Accepted => {
                self.documents_accepted.fetch_add(1, Ordering::Relaxed);
            }
            ValidationResult::Rejected(violations) => {
                self.documents_rejected.fetch_add(1, Ordering::Relaxed);
                self.violations
                    .fetch_add(violations.len() as u64, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_validated: self.documents_validated.load(Ordering::Relaxed),
            documents_accepted: self.documents_accepted.load(Ordering::Relaxed),
            documents_rejected: self.documents_rejected.load(Ordering::Relaxed),
            violations: self.violations.load(Ordering::Relaxed),
        }
    }

    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"documents_validated":{},"documents_accepted":{},"documents_rejected":{},"violations":{}}}"#,
            s.documents_validated, s.documents_accepted, s.documents_rejected, s.violations,
        )
    }
}

/// A point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub documents_validated: u64,
    pub documents_accepted: u64,
    pub documents_rejected: u64,
    pub violations: u64,
}
