//! phone-recon - phone number extraction from chat screenshots and
//! reconciliation against a CRM roster, served over MCP.
//!
//! # Architecture
//!
//! - **phone**: parsing, E.164 normalization and country metadata
//! - **extraction**: per-source candidate patterns and the extraction pipeline
//! - **roster**: roster normalization and CRM CSV import
//! - **matching**: exact and partial comparison against the roster
//! - **ocr**: screenshot text recognition (tesseract)
//! - **models**: records exchanged between the core and its collaborators
//! - **repositories**: storage abstraction with in-memory implementations
//! - **services**: orchestration of OCR, extraction, import and comparison
//! - **server**: MCP protocol server
//! - **config**, **error**, **observability**: ambient concerns

pub mod config;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod matching;
pub mod models;
pub mod observability;
pub mod ocr;
pub mod phone;
pub mod repositories;
pub mod roster;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::Config;
pub use domain::SourceHint;
pub use error::{ConfigError, ImportError, OcrError, ServiceError, StoreError};
pub use extraction::{CandidateExtractor, ExtractionPipeline};
pub use matching::{ComparisonEngine, ComparisonReport};
pub use models::{
    ComparisonSummary, CountryGroup, DuplicateGroup, ExtractedNumber, MatchFilter, MatchRecord,
    MatchType, NumberStats, ParsedPhone, ReconciliationStats, RosterEntry, RosterRow,
};
pub use observability::{MetricsTracker, Timer};
pub use phone::PhoneNumberCodec;
pub use roster::{ContactNormalizer, ImportStats};
pub use server::PhoneReconServer;
