//! Candidate pattern configuration.
//!
//! Each source hint maps to an ordered list of patterns. Order matters:
//! stricter, more specific shapes come before loose fallbacks, because later
//! deduplication keeps the first occurrence of a candidate.

use crate::domain::SourceHint;
use once_cell::sync::Lazy;
use regex::Regex;

/// A named candidate pattern. The first capture group is the candidate.
#[derive(Debug, Clone)]
pub struct PatternDef {
    /// Provenance tag attached to every candidate this pattern produces
    pub name: &'static str,

    /// Compiled pattern; capture group 1 holds the phone-shaped substring
    pub regex: Regex,
}

impl PatternDef {
    /// Compile a case-insensitive pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("(?i){}", pattern))?;
        Ok(Self { name, regex })
    }
}

/// Immutable `source hint -> ordered pattern list` configuration.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    whatsapp: Vec<PatternDef>,
    generic: Vec<PatternDef>,
}

impl PatternConfig {
    /// Build a configuration from two pattern lists.
    pub fn new(whatsapp: Vec<PatternDef>, generic: Vec<PatternDef>) -> Self {
        Self { whatsapp, generic }
    }

    /// The patterns to apply for a source, in priority order.
    pub fn patterns_for(&self, source: SourceHint) -> &[PatternDef] {
        match source {
            SourceHint::WhatsApp => &self.whatsapp,
            SourceHint::Sms | SourceHint::CallLog | SourceHint::Unknown => &self.generic,
        }
    }

    /// The built-in configuration.
    pub fn builtin() -> &'static PatternConfig {
        &BUILTIN_PATTERNS
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        BUILTIN_PATTERNS.clone()
    }
}

const INTERNATIONAL: &str =
    r"(\+\d{1,3}[\s\-]?\(?\d{1,4}\)?[\s\-]?\d{1,4}[\s\-]?\d{1,9})";
const US_NATIONAL: &str = r"(\(?\d{3}\)?[\s\-.]?\d{3}[\s\-.]?\d{4})";
const DIGIT_RUN: &str = r"(\b\d{10,12}\b)";

static BUILTIN_PATTERNS: Lazy<PatternConfig> = Lazy::new(|| {
    let compile = |name: &'static str, pattern: &str| {
        PatternDef::new(name, pattern).expect("Failed to compile builtin phone pattern")
    };

    let whatsapp = vec![
        // Contact info screen: "Phone: +1 555-123-4567"
        compile("labelled", r"(?:Phone|Mobile|Cell)[\s:]+(\+?\d[\d\s\-().]{8,20})"),
        compile("international", INTERNATIONAL),
        // Group participant list: "+1 555 123 4567"
        compile("group_participant", r"(\+\d{1,3}\s\d{3}\s\d{3}\s\d{4})"),
        compile("us_national", US_NATIONAL),
        // "98765 43210" or "9876543210"
        compile("indian_mobile", r"(\b[6-9]\d{4}[\s]?\d{5}\b)"),
        compile("digit_run", DIGIT_RUN),
    ];

    let generic = vec![
        compile("international", INTERNATIONAL),
        compile("us_national", US_NATIONAL),
        compile("digit_run", DIGIT_RUN),
    ];

    PatternConfig::new(whatsapp, generic)
});
