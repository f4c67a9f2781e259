use crate::error::StoreResult;
use crate::models::*;
use async_trait::async_trait;

/// Repository for numbers extracted from screenshots.
///
/// Provides abstraction over extraction storage, enabling different
/// implementations (in-memory, database, mock).
#[async_trait]
pub trait ExtractedNumberRepository: Send + Sync {
    /// Replace every number stored for a screenshot with `numbers`.
    ///
    /// Readers observe either the old set or the new one, never a mix.
    async fn replace_for_screenshot(
        &self,
        screenshot_id: &str,
        numbers: Vec<ExtractedNumber>,
    ) -> StoreResult<()>;

    /// Append numbers not tied to a screenshot replacement.
    async fn add(&self, numbers: Vec<ExtractedNumber>) -> StoreResult<()>;

    /// All stored numbers in insertion order.
    async fn list(&self) -> StoreResult<Vec<ExtractedNumber>>;

    /// Numbers stored for one screenshot.
    ///
    /// A screenshot never stored is `StoreError::NotFound`; one stored with no
    /// numbers yields an empty list.
    async fn list_for_screenshot(&self, screenshot_id: &str) -> StoreResult<Vec<ExtractedNumber>>;

    async fn count(&self) -> StoreResult<usize>;
}

/// Repository for the imported roster.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Normalized numbers already present, for duplicate detection.
    async fn existing_keys(&self) -> StoreResult<Vec<String>>;

    /// Append entries, returning how many were stored.
    async fn insert_batch(&self, entries: Vec<RosterEntry>) -> StoreResult<usize>;

    /// All entries in import order.
    async fn list(&self) -> StoreResult<Vec<RosterEntry>>;

    async fn count(&self) -> StoreResult<usize>;
}

/// Repository for comparison results.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Clear all stored records and write `records` in their place.
    async fn replace_all(&self, records: Vec<MatchRecord>) -> StoreResult<()>;

    /// Stored records selected by `filter`.
    async fn list(&self, filter: MatchFilter) -> StoreResult<Vec<MatchRecord>>;

    /// Counts over the stored records.
    async fn summary(&self) -> StoreResult<ComparisonSummary>;
}
