//! Observability for validation runs
//!
//! - Structured JSON log lines on stderr
//! - Validation counters
//!
//! # Usage
//!
//! ```ignore
//! use globalmarket::observability::{Logger, ValidationMetrics};
//!
//! Logger::info("CATALOG_LOADED", &[("collections", "4")]);
//!
//! let metrics = ValidationMetrics::new();
//! metrics.record(&result);
//! ```

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ValidationMetrics};
