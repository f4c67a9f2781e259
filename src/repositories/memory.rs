use crate::error::{StoreError, StoreResult};
use crate::models::*;
use crate::repositories::traits::{ExtractedNumberRepository, MatchRepository, RosterRepository};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ExtractedStore {
    numbers: Vec<ExtractedNumber>,
    /// Screenshots stored at least once, including those that yielded nothing
    screenshots: HashSet<String>,
}

/// Extracted numbers held in process memory.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExtractedNumberRepository {
    store: Arc<RwLock<ExtractedStore>>,
}

impl InMemoryExtractedNumberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExtractedNumberRepository for InMemoryExtractedNumberRepository {
    async fn replace_for_screenshot(
        &self,
        screenshot_id: &str,
        numbers: Vec<ExtractedNumber>,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store
            .numbers
            .retain(|n| n.screenshot_id.as_deref() != Some(screenshot_id));
        store.numbers.extend(numbers);
        store.screenshots.insert(screenshot_id.to_string());
        Ok(())
    }

    async fn add(&self, numbers: Vec<ExtractedNumber>) -> StoreResult<()> {
        let mut store = self.store.write().await;
        for id in numbers.iter().filter_map(|n| n.screenshot_id.as_ref()) {
            store.screenshots.insert(id.clone());
        }
        store.numbers.extend(numbers);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<ExtractedNumber>> {
        Ok(self.store.read().await.numbers.clone())
    }

    async fn list_for_screenshot(&self, screenshot_id: &str) -> StoreResult<Vec<ExtractedNumber>> {
        let store = self.store.read().await;
        if !store.screenshots.contains(screenshot_id) {
            return Err(StoreError::NotFound(format!("screenshot {}", screenshot_id)));
        }

        Ok(store
            .numbers
            .iter()
            .filter(|n| n.screenshot_id.as_deref() == Some(screenshot_id))
            .cloned()
            .collect())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.store.read().await.numbers.len())
    }
}

/// Roster entries held in process memory, in import order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterRepository {
    entries: Arc<RwLock<Vec<RosterEntry>>>,
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn existing_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|e| e.normalized_number.clone())
            .collect())
    }

    async fn insert_batch(&self, entries: Vec<RosterEntry>) -> StoreResult<usize> {
        let inserted = entries.len();
        self.entries.write().await.extend(entries);
        Ok(inserted)
    }

    async fn list(&self) -> StoreResult<Vec<RosterEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

/// Match records held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchRepository {
    records: Arc<RwLock<Vec<MatchRecord>>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn replace_all(&self, records: Vec<MatchRecord>) -> StoreResult<()> {
        *self.records.write().await = records;
        Ok(())
    }

    async fn list(&self, filter: MatchFilter) -> StoreResult<Vec<MatchRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r.match_type))
            .cloned()
            .collect())
    }

    async fn summary(&self) -> StoreResult<ComparisonSummary> {
        let mut summary = ComparisonSummary::default();
        for record in self.records.read().await.iter() {
            summary.record(record.match_type);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn number(screenshot: &str, normalized: &str) -> ExtractedNumber {
        let mut phone = ParsedPhone::invalid(normalized);
        phone.normalized = Some(normalized.to_string());
        phone.is_valid = true;
        ExtractedNumber::new(Some(screenshot.to_string()), phone)
    }

    #[tokio::test]
    async fn test_replace_for_screenshot_only_touches_that_screenshot() {
        let repo = InMemoryExtractedNumberRepository::new();
        repo.replace_for_screenshot("a", vec![number("a", "+14155550132")])
            .await
            .unwrap();
        repo.replace_for_screenshot("b", vec![number("b", "+919876543210")])
            .await
            .unwrap();

        repo.replace_for_screenshot("a", vec![number("a", "+442079460958")])
            .await
            .unwrap();

        let a = repo.list_for_screenshot("a").await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].normalized(), Some("+442079460958"));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_for_unknown_screenshot_is_not_found() {
        let repo = InMemoryExtractedNumberRepository::new();
        repo.replace_for_screenshot("blank", Vec::new()).await.unwrap();

        assert!(repo.list_for_screenshot("blank").await.unwrap().is_empty());
        assert!(matches!(
            repo.list_for_screenshot("never-seen").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_roster_keeps_import_order() {
        let repo = InMemoryRosterRepository::new();
        let inserted = repo
            .insert_batch(vec![
                RosterEntry::new("+14155550132"),
                RosterEntry::new("+919876543210"),
            ])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(
            repo.existing_keys().await.unwrap(),
            vec!["+14155550132".to_string(), "+919876543210".to_string()]
        );
    }

    #[tokio::test]
    async fn test_match_replace_all_and_filter() {
        let repo = InMemoryMatchRepository::new();
        let now = Utc::now();
        repo.replace_all(vec![
            MatchRecord::new("x1", Some("r1".into()), MatchType::Exact, now),
            MatchRecord::new("x2", None, MatchType::None, now),
        ])
        .await
        .unwrap();

        assert_eq!(repo.list(MatchFilter::New).await.unwrap().len(), 1);
        assert_eq!(repo.list(MatchFilter::Existing).await.unwrap().len(), 1);

        repo.replace_all(vec![MatchRecord::new("x3", None, MatchType::None, now)])
            .await
            .unwrap();

        let all = repo.list(MatchFilter::All).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].extracted_number_id, "x3");
        assert_eq!(repo.summary().await.unwrap().new_numbers, 1);
    }
}
