//! Candidate discovery over noisy OCR text.

use super::patterns::PatternConfig;
use crate::domain::SourceHint;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Candidates shorter than this (in characters) are discarded.
pub const MIN_CANDIDATE_LEN: usize = 7;

static LABEL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:Phone|Mobile|Cell)[\s:]+").expect("Failed to compile label prefix regex")
});

/// A phone-shaped substring and the pattern that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub text: String,
    pub pattern: &'static str,
}

/// Scans text for phone-number-shaped substrings.
///
/// Every pattern for the source is applied to the full text (no
/// short-circuiting). Matches are concatenated in pattern order, cleaned,
/// and deduplicated by exact string keeping the first occurrence, so the
/// output is deterministic for a given `(text, source)`.
#[derive(Debug, Clone)]
pub struct CandidateExtractor {
    patterns: PatternConfig,
}

impl CandidateExtractor {
    /// Create an extractor with the built-in pattern configuration.
    pub fn new() -> Self {
        Self::with_patterns(PatternConfig::default())
    }

    /// Create an extractor with a custom pattern configuration.
    pub fn with_patterns(patterns: PatternConfig) -> Self {
        Self { patterns }
    }

    /// Find candidates in `text`, with provenance.
    pub fn extract_candidates(&self, text: &str, source: SourceHint) -> Vec<RawCandidate> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();

        for pattern in self.patterns.patterns_for(source) {
            for captures in pattern.regex.captures_iter(text) {
                let Some(found) = captures.get(1) else {
                    continue;
                };

                let Some(cleaned) = clean_candidate(found.as_str()) else {
                    continue;
                };

                if seen.insert(cleaned.clone()) {
                    candidates.push(RawCandidate {
                        text: cleaned,
                        pattern: pattern.name,
                    });
                }
            }
        }

        tracing::debug!(
            source = %source,
            candidate_count = candidates.len(),
            "Candidate extraction completed"
        );

        candidates
    }
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a leading `Phone:`/`Mobile:`/`Cell:` label and surrounding
/// whitespace. Returns `None` when what is left is too short to be a number.
pub fn clean_candidate(matched: &str) -> Option<String> {
    let stripped = LABEL_PREFIX.replace(matched, "");
    let cleaned = stripped.trim();

    if cleaned.chars().count() >= MIN_CANDIDATE_LEN {
        Some(cleaned.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(candidates: &[RawCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_clean_candidate() {
        assert_eq!(
            clean_candidate("Cell: 555 123 4567").as_deref(),
            Some("555 123 4567")
        );
        assert_eq!(
            clean_candidate("PHONE  +1 415 555 0132 ").as_deref(),
            Some("+1 415 555 0132")
        );
        assert_eq!(clean_candidate("  123456 "), None);
        assert_eq!(clean_candidate("Phone: 12"), None);
        assert_eq!(clean_candidate("1234567").as_deref(), Some("1234567"));
    }

    #[test]
    fn test_empty_text_has_no_candidates() {
        let extractor = CandidateExtractor::new();
        assert!(extractor
            .extract_candidates("", SourceHint::WhatsApp)
            .is_empty());
        assert!(extractor.extract_candidates("", SourceHint::Sms).is_empty());
    }

    #[test]
    fn test_whatsapp_contact_screen() {
        let extractor = CandidateExtractor::new();
        let text = "Phone: +1 415-555-0132 contact me at +1 (415) 555-0132 again";
        let candidates = extractor.extract_candidates(text, SourceHint::WhatsApp);

        assert_eq!(
            texts(&candidates),
            vec![
                "+1 415-555-0132",
                "+1 (415) 555-0132",
                "415-555-0132",
                "(415) 555-0132"
            ]
        );
        assert_eq!(candidates[0].pattern, "labelled");
        assert_eq!(candidates[1].pattern, "international");
        assert_eq!(candidates[2].pattern, "us_national");
    }

    #[test]
    fn test_indian_mobile_pattern() {
        let extractor = CandidateExtractor::new();
        let candidates =
            extractor.extract_candidates("Mobile: +91 98765 43210", SourceHint::WhatsApp);

        assert_eq!(texts(&candidates), vec!["+91 98765 43210", "98765 43210"]);
        assert_eq!(candidates[1].pattern, "indian_mobile");
    }

    #[test]
    fn test_generic_source_skips_whatsapp_patterns() {
        let extractor = CandidateExtractor::new();
        let text = "Call (415) 555-0132 or 4155550132";

        let candidates = extractor.extract_candidates(text, SourceHint::Sms);
        assert_eq!(texts(&candidates), vec!["(415) 555-0132", "4155550132"]);

        // The Indian-mobile shape only exists in the WhatsApp list.
        let candidates = extractor.extract_candidates("98765 43210", SourceHint::Unknown);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_first_occurrence_wins_within_and_across_patterns() {
        let extractor = CandidateExtractor::new();
        let text = "4155550132 then 4155550132 then 4155550132";
        let candidates = extractor.extract_candidates(text, SourceHint::Sms);

        assert_eq!(texts(&candidates), vec!["4155550132"]);
        assert_eq!(candidates[0].pattern, "us_national");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = CandidateExtractor::new();
        let text = "Mobile: +44 20 7946 0958\n+1 415 555 0132\n(212) 555-0100 98765 43210";

        let first = extractor.extract_candidates(text, SourceHint::WhatsApp);
        let second = extractor.extract_candidates(text, SourceHint::WhatsApp);
        assert_eq!(first, second);
    }
}
