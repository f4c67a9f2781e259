//! Data models for extraction and reconciliation records.
//!
//! This module contains the records that flow between the core and its
//! collaborators: parsed numbers, stored extractions and views over them,
//! roster rows/entries, and comparison results.

pub mod comparison;
pub mod extracted;
pub mod number_stats;
pub mod parsed_phone;
pub mod roster;

pub use comparison::{
    ComparisonSummary, MatchFilter, MatchRecord, MatchType, ReconciliationStats,
};
pub use extracted::ExtractedNumber;
pub use number_stats::{
    find_duplicates, group_by_country, CountryCount, CountryGroup, DuplicateGroup, NumberStats,
    TypeCount,
};
pub use parsed_phone::ParsedPhone;
pub use roster::{RosterEntry, RosterRow, CSV_ROSTER_SOURCE};
