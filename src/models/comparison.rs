//! Comparison models: per-number match records and run summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence attached to an exact key match.
pub const EXACT_CONFIDENCE: f64 = 1.0;

/// Confidence attached to a last-10-characters suffix match.
pub const PARTIAL_CONFIDENCE: f64 = 0.8;

/// Confidence attached to a number with no roster counterpart.
pub const NO_MATCH_CONFIDENCE: f64 = 0.0;

/// How an extracted number relates to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Normalized keys are identical
    Exact,

    /// Last 10 characters agree
    Partial,

    /// Not in the roster
    None,
}

impl MatchType {
    /// Fixed confidence for this match type.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Exact => EXACT_CONFIDENCE,
            Self::Partial => PARTIAL_CONFIDENCE,
            Self::None => NO_MATCH_CONFIDENCE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Partial => "partial",
            Self::None => "none",
        }
    }

    /// Whether the number is already known to the roster.
    pub fn is_existing(&self) -> bool {
        matches!(self, Self::Exact | Self::Partial)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "partial" => Ok(Self::Partial),
            "none" | "new" => Ok(Self::None),
            other => Err(format!("Unknown match type: {}", other)),
        }
    }
}

/// Classification of one extracted number against the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Id of the extracted number
    pub extracted_number_id: String,

    /// Id of the linked roster entry (absent for `none`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster_entry_id: Option<String>,

    pub match_type: MatchType,

    /// One of 1.0, 0.8, 0.0
    pub confidence: f64,

    pub compared_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Build a record whose confidence follows from its match type.
    pub fn new(
        extracted_number_id: impl Into<String>,
        roster_entry_id: Option<String>,
        match_type: MatchType,
        compared_at: DateTime<Utc>,
    ) -> Self {
        Self {
            extracted_number_id: extracted_number_id.into(),
            roster_entry_id,
            match_type,
            confidence: match_type.confidence(),
            compared_at,
        }
    }
}

/// Selection over stored match records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFilter {
    #[default]
    All,
    Exact,
    Partial,
    /// `none` records: numbers not in the roster
    New,
    /// `exact` or `partial` records
    Existing,
}

impl MatchFilter {
    pub fn matches(&self, match_type: MatchType) -> bool {
        match self {
            Self::All => true,
            Self::Exact => match_type == MatchType::Exact,
            Self::Partial => match_type == MatchType::Partial,
            Self::New => match_type == MatchType::None,
            Self::Existing => match_type.is_existing(),
        }
    }
}

impl FromStr for MatchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "exact" => Ok(Self::Exact),
            "partial" => Ok(Self::Partial),
            "new" | "none" => Ok(Self::New),
            "existing" => Ok(Self::Existing),
            other => Err(format!("Unknown match filter: {}", other)),
        }
    }
}

/// Counts from a single comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Extracted numbers that were compared (those with a normalized value)
    pub total: usize,
    pub exact_matches: usize,
    pub partial_matches: usize,
    pub new_numbers: usize,
}

impl ComparisonSummary {
    /// Count one classified number.
    pub fn record(&mut self, match_type: MatchType) {
        self.total += 1;
        match match_type {
            MatchType::Exact => self.exact_matches += 1,
            MatchType::Partial => self.partial_matches += 1,
            MatchType::None => self.new_numbers += 1,
        }
    }
}

/// Aggregate view over everything stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationStats {
    pub total_extracted: usize,
    pub total_roster: usize,
    pub exact_matches: usize,
    pub partial_matches: usize,
    pub new_numbers: usize,
    /// Extracted numbers with no stored match record
    pub not_compared: usize,
    /// Percentage of extracted numbers matched (exact or partial), 2 decimals
    pub match_rate: f64,
}

impl ReconciliationStats {
    /// Derive stats from totals and the stored records' summary.
    pub fn from_summary(
        total_extracted: usize,
        total_roster: usize,
        summary: &ComparisonSummary,
    ) -> Self {
        let matched = summary.exact_matches + summary.partial_matches;
        let match_rate = if total_extracted > 0 {
            (matched as f64 / total_extracted as f64 * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_extracted,
            total_roster,
            exact_matches: summary.exact_matches,
            partial_matches: summary.partial_matches,
            new_numbers: summary.new_numbers,
            not_compared: total_extracted.saturating_sub(summary.total),
            match_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_per_type() {
        assert_eq!(MatchType::Exact.confidence(), 1.0);
        assert_eq!(MatchType::Partial.confidence(), 0.8);
        assert_eq!(MatchType::None.confidence(), 0.0);
    }

    #[test]
    fn test_match_type_serialization() {
        assert_eq!(serde_json::to_string(&MatchType::Exact).unwrap(), "\"exact\"");
        assert_eq!(serde_json::to_string(&MatchType::None).unwrap(), "\"none\"");
        let parsed: MatchType = serde_json::from_str("\"partial\"").unwrap();
        assert_eq!(parsed, MatchType::Partial);
    }

    #[test]
    fn test_match_type_from_str() {
        assert_eq!("EXACT".parse::<MatchType>().unwrap(), MatchType::Exact);
        assert_eq!("new".parse::<MatchType>().unwrap(), MatchType::None);
        assert!("fuzzy".parse::<MatchType>().is_err());
    }

    #[test]
    fn test_match_filter() {
        assert!(MatchFilter::All.matches(MatchType::None));
        assert!(MatchFilter::Existing.matches(MatchType::Partial));
        assert!(!MatchFilter::Existing.matches(MatchType::None));
        assert!(MatchFilter::New.matches(MatchType::None));
        assert!(!MatchFilter::Exact.matches(MatchType::Partial));
        assert_eq!("existing".parse::<MatchFilter>().unwrap(), MatchFilter::Existing);
        assert_eq!("none".parse::<MatchFilter>().unwrap(), MatchFilter::New);
        assert!("fuzzy".parse::<MatchFilter>().is_err());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = ComparisonSummary::default();
        summary.record(MatchType::Exact);
        summary.record(MatchType::None);
        summary.record(MatchType::None);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.exact_matches, 1);
        assert_eq!(summary.partial_matches, 0);
        assert_eq!(summary.new_numbers, 2);
    }

    #[test]
    fn test_stats_match_rate() {
        let summary = ComparisonSummary {
            total: 3,
            exact_matches: 1,
            partial_matches: 1,
            new_numbers: 1,
        };
        let stats = ReconciliationStats::from_summary(4, 10, &summary);
        assert_eq!(stats.match_rate, 50.0);
        assert_eq!(stats.not_compared, 1);

        let stats = ReconciliationStats::from_summary(3, 10, &summary);
        assert_eq!(stats.match_rate, 66.67);

        let stats = ReconciliationStats::from_summary(0, 0, &ComparisonSummary::default());
        assert_eq!(stats.match_rate, 0.0);
    }
}
