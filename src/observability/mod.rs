//! Observability for the reconciliation service.
//!
//! Counters for OCR, extraction, import and comparison activity, plus a
//! timer that logs operation durations through `tracing`.

pub mod metrics;

pub use metrics::{MetricsTracker, Timer};
