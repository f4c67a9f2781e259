//! Exact and partial matching of extracted numbers against the roster.
//!
//! Classification per extracted number with normalized value `N`:
//! - exact: `N` is a roster key (confidence 1.0)
//! - partial: `N` has at least 10 characters and some roster key, first in
//!   roster order, ends with the last 10 characters of `N` (confidence 0.8)
//! - none: otherwise (confidence 0.0)
//!
//! Numbers without a normalized value are left out entirely.

use super::roster_index::RosterIndex;
use crate::models::{
    ComparisonSummary, ExtractedNumber, MatchRecord, MatchType, RosterEntry,
};
use chrono::{DateTime, Utc};

/// Number of trailing characters compared by partial matching.
pub const PARTIAL_SUFFIX_LEN: usize = 10;

/// Output of a comparison run: the full replacement set of match records.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub records: Vec<MatchRecord>,
    pub summary: ComparisonSummary,
}

/// Classifies extracted numbers against a roster.
///
/// A pure function of its inputs: every run recomputes the complete match
/// set, and callers replace any previously stored set with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEngine;

impl ComparisonEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compare every extracted number that has a normalized value.
    pub fn compare(&self, extracted: &[ExtractedNumber], roster: &[RosterEntry]) -> ComparisonReport {
        self.compare_at(extracted, roster, Utc::now())
    }

    /// [`compare`](Self::compare) with an explicit timestamp for the records.
    pub fn compare_at(
        &self,
        extracted: &[ExtractedNumber],
        roster: &[RosterEntry],
        compared_at: DateTime<Utc>,
    ) -> ComparisonReport {
        let index = RosterIndex::build(roster);
        let mut summary = ComparisonSummary::default();
        let mut records = Vec::with_capacity(extracted.len());

        for number in extracted {
            let Some(normalized) = number.normalized() else {
                continue;
            };

            let (match_type, entry) = self.classify(normalized, &index);
            summary.record(match_type);
            records.push(MatchRecord::new(
                number.id.clone(),
                entry.map(|e| e.id.clone()),
                match_type,
                compared_at,
            ));
        }

        tracing::debug!(
            total = summary.total,
            exact = summary.exact_matches,
            partial = summary.partial_matches,
            new = summary.new_numbers,
            roster_size = index.len(),
            "Comparison completed"
        );

        ComparisonReport { records, summary }
    }

    /// Classify one normalized number.
    pub fn classify<'a>(
        &self,
        normalized: &str,
        index: &RosterIndex<'a>,
    ) -> (MatchType, Option<&'a RosterEntry>) {
        if let Some(entry) = index.get(normalized) {
            return (MatchType::Exact, Some(entry));
        }

        if let Some(suffix) = last_chars(normalized, PARTIAL_SUFFIX_LEN) {
            if let Some(entry) = index.find_by_suffix(suffix) {
                return (MatchType::Partial, Some(entry));
            }
        }

        (MatchType::None, None)
    }
}

/// The last `n` characters of `s`, or `None` if `s` is shorter than `n`.
fn last_chars(s: &str, n: usize) -> Option<&str> {
    let count = s.chars().count();
    if count < n {
        return None;
    }

    let start = s
        .char_indices()
        .nth(count - n)
        .map(|(offset, _)| offset)
        .unwrap_or(s.len());
    Some(&s[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedPhone;

    fn extracted(id: &str, normalized: Option<&str>) -> ExtractedNumber {
        let mut phone = ParsedPhone::invalid(normalized.unwrap_or("garbage"));
        if let Some(n) = normalized {
            phone.normalized = Some(n.to_string());
            phone.is_valid = true;
        }
        let mut number = ExtractedNumber::new(None, phone);
        number.id = id.to_string();
        number
    }

    fn roster_entry(id: &str, normalized: &str) -> RosterEntry {
        let mut entry = RosterEntry::new(normalized);
        entry.id = id.to_string();
        entry
    }

    #[test]
    fn test_last_chars() {
        assert_eq!(last_chars("+14155550132", 10), Some("4155550132"));
        assert_eq!(last_chars("4155550132", 10), Some("4155550132"));
        assert_eq!(last_chars("555013", 10), None);
        assert_eq!(last_chars("", 0), Some(""));
    }

    #[test]
    fn test_exact_match() {
        let engine = ComparisonEngine::new();
        let report = engine.compare(
            &[extracted("x1", Some("+919876543210"))],
            &[roster_entry("r1", "+919876543210")],
        );

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.match_type, MatchType::Exact);
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.extracted_number_id, "x1");
        assert_eq!(record.roster_entry_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_partial_match_on_last_ten_characters() {
        let engine = ComparisonEngine::new();
        let report = engine.compare(
            &[extracted("x1", Some("+914155550132"))],
            &[roster_entry("r1", "+14155550132")],
        );

        let record = &report.records[0];
        assert_eq!(record.match_type, MatchType::Partial);
        assert_eq!(record.confidence, 0.8);
        assert_eq!(record.roster_entry_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_partial_match_first_roster_hit_wins() {
        let engine = ComparisonEngine::new();
        let roster = vec![
            roster_entry("r-first", "+14155550132"),
            roster_entry("r-second", "+444155550132"),
        ];
        let report = engine.compare(&[extracted("x1", Some("+914155550132"))], &roster);
        assert_eq!(report.records[0].roster_entry_id.as_deref(), Some("r-first"));

        let reversed: Vec<RosterEntry> = roster.into_iter().rev().collect();
        let report = engine.compare(&[extracted("x1", Some("+914155550132"))], &reversed);
        assert_eq!(report.records[0].roster_entry_id.as_deref(), Some("r-second"));
    }

    #[test]
    fn test_short_numbers_never_partially_match() {
        let engine = ComparisonEngine::new();
        let report = engine.compare(
            &[extracted("x1", Some("+5550132"))],
            &[roster_entry("r1", "+15555550132")],
        );

        let record = &report.records[0];
        assert_eq!(record.match_type, MatchType::None);
        assert_eq!(record.confidence, 0.0);
        assert!(record.roster_entry_id.is_none());
    }

    #[test]
    fn test_unnormalized_numbers_are_excluded() {
        let engine = ComparisonEngine::new();
        let report = engine.compare(
            &[extracted("bad", None), extracted("good", Some("+14155550132"))],
            &[roster_entry("r1", "+14155550132")],
        );

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].extracted_number_id, "good");
        assert_eq!(report.summary.total, 1);
    }

    #[test]
    fn test_summary_and_confidence_values() {
        let engine = ComparisonEngine::new();
        let extracted_set = vec![
            extracted("exact", Some("+14155550132")),
            extracted("partial", Some("+19876543210")),
            extracted("new", Some("+442079460958")),
        ];
        let roster = vec![
            roster_entry("r1", "+14155550132"),
            roster_entry("r2", "+919876543210"),
        ];

        let report = engine.compare(&extracted_set, &roster);

        assert_eq!(
            report.summary,
            ComparisonSummary {
                total: 3,
                exact_matches: 1,
                partial_matches: 1,
                new_numbers: 1,
            }
        );
        for record in &report.records {
            assert!([1.0, 0.8, 0.0].contains(&record.confidence));
        }
    }

    #[test]
    fn test_compare_is_repeatable() {
        let engine = ComparisonEngine::new();
        let extracted_set = vec![
            extracted("a", Some("+14155550132")),
            extracted("b", Some("+914155550132")),
            extracted("c", Some("+442079460958")),
        ];
        let roster = vec![
            roster_entry("r1", "+14155550132"),
            roster_entry("r2", "+614155550132"),
        ];
        let now = Utc::now();

        let first = engine.compare_at(&extracted_set, &roster, now);
        let second = engine.compare_at(&extracted_set, &roster, now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_roster_marks_everything_new() {
        let engine = ComparisonEngine::new();
        let report = engine.compare(&[extracted("a", Some("+14155550132"))], &[]);
        assert_eq!(report.records[0].match_type, MatchType::None);
        assert_eq!(report.summary.new_numbers, 1);
    }
}
