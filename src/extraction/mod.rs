//! Phone number extraction from recognized screenshot text.
//!
//! - [`patterns`]: the per-source ordered pattern configuration
//! - [`candidates`]: pattern matching, cleanup and first-seen deduplication
//! - [`pipeline`]: candidates → parsed numbers, deduplicated by key

pub mod candidates;
pub mod patterns;
pub mod pipeline;

pub use candidates::{clean_candidate, CandidateExtractor, RawCandidate, MIN_CANDIDATE_LEN};
pub use patterns::{PatternConfig, PatternDef};
pub use pipeline::{Extraction, ExtractionPipeline};
