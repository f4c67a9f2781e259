//! OCR text → parsed, deduplicated phone numbers.

use super::candidates::{CandidateExtractor, RawCandidate};
use crate::domain::SourceHint;
use crate::models::ParsedPhone;
use crate::phone::PhoneNumberCodec;
use std::collections::HashSet;

/// Result of running the pipeline over one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Candidates that reached the parser, in discovery order
    pub candidates: Vec<RawCandidate>,

    /// Parsed numbers, deduplicated, in candidate order
    pub numbers: Vec<ParsedPhone>,
}

impl Extraction {
    pub fn valid_count(&self) -> usize {
        self.numbers.iter().filter(|n| n.is_valid).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.numbers.len() - self.valid_count()
    }
}

/// Runs candidate discovery and parsing over recognized text.
///
/// The pipeline holds no mutable state, so one instance can serve any
/// number of concurrent extractions.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    extractor: CandidateExtractor,
    codec: PhoneNumberCodec,
}

impl ExtractionPipeline {
    pub fn new(extractor: CandidateExtractor, codec: PhoneNumberCodec) -> Self {
        Self { extractor, codec }
    }

    pub fn codec(&self) -> &PhoneNumberCodec {
        &self.codec
    }

    /// Extract phone numbers from `text`.
    ///
    /// Output order follows candidate order. Valid numbers are deduplicated
    /// by their normalized value, so a second spelling of the same number is
    /// dropped; invalid numbers are deduplicated by their raw string.
    pub fn extract(&self, text: &str, source: SourceHint) -> Vec<ParsedPhone> {
        self.run(text, source).numbers
    }

    /// Like [`extract`](Self::extract), also returning the candidates.
    pub fn run(&self, text: &str, source: SourceHint) -> Extraction {
        let candidates = self.extractor.extract_candidates(text, source);

        let mut seen_normalized: HashSet<String> = HashSet::new();
        let mut seen_raw: HashSet<String> = HashSet::new();
        let mut numbers = Vec::new();

        for candidate in &candidates {
            let parsed = self.codec.parse(&candidate.text);

            let is_new = match parsed.normalized.as_ref() {
                Some(normalized) => seen_normalized.insert(normalized.clone()),
                None => seen_raw.insert(parsed.raw.clone()),
            };

            if is_new {
                numbers.push(parsed);
            }
        }

        let extraction = Extraction {
            candidates,
            numbers,
        };

        tracing::debug!(
            source = %source,
            candidates = extraction.candidates.len(),
            valid = extraction.valid_count(),
            invalid = extraction.invalid_count(),
            "Extraction pipeline completed"
        );

        extraction
    }
}
