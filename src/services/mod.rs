//! Application service layer.
//!
//! Services orchestrate OCR, extraction, roster import and comparison over
//! the repositories. They sit between the MCP handlers and the core.

mod reconciliation_service;

pub use reconciliation_service::{
    BatchExtraction, BatchFailure, ExtractionOutcome, ReconciliationService,
    ReconciliationServiceImpl, ScreenshotRequest,
};
