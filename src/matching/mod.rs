//! Reconciliation of extracted numbers against the imported roster.
//!
//! This module provides exact and suffix-based partial matching of
//! normalized numbers, over an insertion-ordered roster index.

pub mod comparison;
pub mod roster_index;

pub use comparison::{ComparisonEngine, ComparisonReport, PARTIAL_SUFFIX_LEN};
pub use roster_index::RosterIndex;
