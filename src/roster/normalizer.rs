//! Roster-side normalization and deduplicating ingestion.

use crate::domain::CountryInfo;
use crate::models::{RosterEntry, RosterRow, CSV_ROSTER_SOURCE};
use crate::phone::PhoneNumberCodec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A roster phone reduced to its comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPhone {
    pub key: String,
    pub country: CountryInfo,
}

/// Turns roster phone strings into the same keys extracted numbers use.
#[derive(Debug, Clone, Default)]
pub struct ContactNormalizer {
    codec: PhoneNumberCodec,
}

impl ContactNormalizer {
    pub fn new(codec: PhoneNumberCodec) -> Self {
        Self { codec }
    }

    /// Normalize a raw roster phone.
    ///
    /// Returns `None` when the phone reduces to an empty key. Country
    /// metadata is resolved from the key itself, not from the raw string.
    pub fn normalize(&self, raw: &str) -> Option<NormalizedPhone> {
        let key = self.codec.normalize_for_comparison(raw);
        if key.is_empty() {
            return None;
        }

        let country = self.codec.country_info(&key);
        Some(NormalizedPhone { key, country })
    }
}

/// What happened to a single roster row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Imported,
    /// Phone missing or blank
    Skipped,
    /// Key already present in the roster or earlier in this import
    Duplicate,
    /// Phone present but normalizes to nothing
    InvalidPhone,
}

/// Counts from one roster import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub invalid_phones: usize,
}

impl ImportStats {
    pub fn record(&mut self, outcome: RowOutcome) {
        self.total_rows += 1;
        match outcome {
            RowOutcome::Imported => self.imported += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Duplicate => self.duplicates += 1,
            RowOutcome::InvalidPhone => self.invalid_phones += 1,
        }
    }
}

/// Streams roster rows into new entries, skipping keys already seen.
///
/// The first row with a given key wins; later rows with the same key are
/// counted as duplicates and discarded, never merged.
#[derive(Debug)]
pub struct RosterIngest {
    normalizer: ContactNormalizer,
    seen: HashSet<String>,
    source: String,
    entries: Vec<RosterEntry>,
    stats: ImportStats,
}

impl RosterIngest {
    /// Start an import against the keys already stored in the roster.
    pub fn new<I>(normalizer: ContactNormalizer, existing_keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            normalizer,
            seen: existing_keys.into_iter().filter(|k| !k.is_empty()).collect(),
            source: CSV_ROSTER_SOURCE.to_string(),
            entries: Vec::new(),
            stats: ImportStats::default(),
        }
    }

    /// Tag imported entries with a source other than the CSV default.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn ingest(&mut self, row: RosterRow) -> RowOutcome {
        let outcome = self.classify(row);
        self.stats.record(outcome);
        outcome
    }

    fn classify(&mut self, row: RosterRow) -> RowOutcome {
        let Some(raw) = row.phone.as_deref().and_then(present) else {
            return RowOutcome::Skipped;
        };

        let Some(normalized) = self.normalizer.normalize(raw) else {
            return RowOutcome::InvalidPhone;
        };

        if !self.seen.insert(normalized.key.clone()) {
            return RowOutcome::Duplicate;
        }

        let mut entry = RosterEntry::new(normalized.key);
        entry.raw_number = Some(raw.to_string());
        entry.name = row.name.as_deref().and_then(present).map(String::from);
        entry.email = row.email.as_deref().and_then(present).map(String::from);
        entry.company = row.company.as_deref().and_then(present).map(String::from);
        entry.external_id = row.external_id.as_deref().and_then(present).map(String::from);
        entry.country_code = normalized.country.country_code;
        entry.country_name = normalized.country.country_name;
        entry.source = self.source.clone();
        self.entries.push(entry);

        RowOutcome::Imported
    }

    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    /// Entries imported so far, in row order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn finish(self) -> (Vec<RosterEntry>, ImportStats) {
        tracing::debug!(
            total_rows = self.stats.total_rows,
            imported = self.stats.imported,
            skipped = self.stats.skipped,
            duplicates = self.stats.duplicates,
            invalid_phones = self.stats.invalid_phones,
            "Roster ingest finished"
        );
        (self.entries, self.stats)
    }
}

/// Trimmed cell value, treating blanks and spreadsheet `nan` as missing.
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed)
    }
}
