//! Reconciliation service.
//!
//! Screenshots go through OCR and the extraction pipeline into the
//! extracted-number store; CSV exports go through the roster normalizer
//! into the roster store; comparison runs reconcile the two.

use crate::domain::SourceHint;
use crate::error::{ImportError, ServiceResult};
use crate::extraction::ExtractionPipeline;
use crate::matching::ComparisonEngine;
use crate::models::{
    self, ComparisonSummary, CountryGroup, DuplicateGroup, ExtractedNumber, MatchFilter,
    MatchRecord, NumberStats, ParsedPhone, ReconciliationStats,
};
use crate::observability::{MetricsTracker, Timer};
use crate::ocr::OcrEngine;
use crate::repositories::{ExtractedNumberRepository, MatchRepository, RosterRepository};
use crate::roster::{self, ColumnMapping, ContactNormalizer, ImportStats, RosterPreview};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Screenshots recognized at once when no cap is configured.
const DEFAULT_MAX_CONCURRENT_OCR: usize = 4;

/// One screenshot to recognize and extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotRequest {
    /// Key the extracted numbers are stored under
    pub screenshot_id: String,
    pub image_path: PathBuf,
    pub source: SourceHint,
}

impl ScreenshotRequest {
    /// Request keyed by the image path itself.
    pub fn for_path(image_path: impl Into<PathBuf>, source: SourceHint) -> Self {
        let image_path = image_path.into();
        Self {
            screenshot_id: image_path.display().to_string(),
            image_path,
            source,
        }
    }
}

/// Result of extracting one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_id: Option<String>,
    pub source: SourceHint,
    /// Distinct candidates the patterns produced
    pub candidates: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub numbers: Vec<ExtractedNumber>,
    /// What OCR read, for screenshots; lets a user check or retry by hand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

/// A screenshot that could not be processed during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub screenshot_id: String,
    pub error: String,
}

/// Outcome of a batch; completion order, not request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchExtraction {
    pub processed: Vec<ExtractionOutcome>,
    pub errors: Vec<BatchFailure>,
}

/// Reconciliation service trait for business operations.
#[async_trait]
pub trait ReconciliationService: Send + Sync {
    /// Parse one phone string.
    fn parse_number(&self, raw: &str) -> ParsedPhone;

    /// Comparison key for one phone string.
    fn normalize_number(&self, raw: &str) -> String;

    /// Extract numbers from text without storing them.
    fn extract_numbers(&self, text: &str, source: SourceHint) -> Vec<ParsedPhone>;

    /// Extract from already recognized text and store the numbers.
    ///
    /// With a `screenshot_id`, previously stored numbers of that screenshot
    /// are replaced.
    async fn extract_text(
        &self,
        text: &str,
        source: SourceHint,
        screenshot_id: Option<String>,
    ) -> ServiceResult<ExtractionOutcome>;

    /// OCR a screenshot, then extract and store its numbers.
    async fn process_screenshot(&self, request: ScreenshotRequest)
        -> ServiceResult<ExtractionOutcome>;

    /// Process many screenshots concurrently; failures are collected, not raised.
    async fn process_batch(&self, requests: Vec<ScreenshotRequest>) -> BatchExtraction;

    /// Headers, sample rows and suggested mapping of a roster CSV.
    async fn preview_roster(&self, path: &Path, rows: usize) -> ServiceResult<RosterPreview>;

    /// Import a roster CSV; without a mapping, columns are auto-detected.
    async fn import_roster(
        &self,
        path: &Path,
        mapping: Option<ColumnMapping>,
    ) -> ServiceResult<ImportStats>;

    /// Recompute and replace all match records.
    async fn run_comparison(&self) -> ServiceResult<ComparisonSummary>;

    async fn comparison_results(&self, filter: MatchFilter) -> ServiceResult<Vec<MatchRecord>>;

    async fn stats(&self) -> ServiceResult<ReconciliationStats>;

    /// Valid/invalid totals with counts by country and number type.
    async fn number_stats(&self) -> ServiceResult<NumberStats>;

    /// Stored numbers grouped by calling code, largest group first.
    async fn numbers_by_country(&self) -> ServiceResult<Vec<CountryGroup>>;

    /// Normalized numbers stored more than once, e.g. across screenshots.
    async fn find_duplicates(&self) -> ServiceResult<Vec<DuplicateGroup>>;

    /// Numbers currently stored for one screenshot.
    async fn screenshot_numbers(&self, screenshot_id: &str)
        -> ServiceResult<Vec<ExtractedNumber>>;
}

/// Default implementation of ReconciliationService.
pub struct ReconciliationServiceImpl {
    pipeline: ExtractionPipeline,
    engine: ComparisonEngine,
    ocr: Arc<dyn OcrEngine>,
    extracted: Arc<dyn ExtractedNumberRepository>,
    roster: Arc<dyn RosterRepository>,
    matches: Arc<dyn MatchRepository>,
    metrics: MetricsTracker,
    max_concurrent_ocr: usize,
    import_lock: Mutex<()>,
    comparison_lock: Mutex<()>,
}

impl ReconciliationServiceImpl {
    /// Create a new reconciliation service with the built-in pipeline.
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        extracted: Arc<dyn ExtractedNumberRepository>,
        roster: Arc<dyn RosterRepository>,
        matches: Arc<dyn MatchRepository>,
    ) -> Self {
        Self {
            pipeline: ExtractionPipeline::default(),
            engine: ComparisonEngine::new(),
            ocr,
            extracted,
            roster,
            matches,
            metrics: MetricsTracker::new(),
            max_concurrent_ocr: DEFAULT_MAX_CONCURRENT_OCR,
            import_lock: Mutex::new(()),
            comparison_lock: Mutex::new(()),
        }
    }

    pub fn with_pipeline(mut self, pipeline: ExtractionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsTracker) -> Self {
        self.metrics = metrics;
        self
    }

    /// Cap on concurrent OCR calls during a batch (at least 1).
    pub fn with_max_concurrent_ocr(mut self, max: usize) -> Self {
        self.max_concurrent_ocr = max.max(1);
        self
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    fn normalizer(&self) -> ContactNormalizer {
        ContactNormalizer::new(self.pipeline.codec().clone())
    }

    async fn store_extraction(
        &self,
        text: &str,
        source: SourceHint,
        screenshot_id: Option<String>,
    ) -> ServiceResult<ExtractionOutcome> {
        let extraction = self.pipeline.run(text, source);
        let valid_count = extraction.valid_count();
        let invalid_count = extraction.invalid_count();
        let candidates = extraction.candidates.len();
        self.metrics
            .track_extraction(candidates, valid_count, invalid_count);

        let numbers: Vec<ExtractedNumber> = extraction
            .numbers
            .into_iter()
            .map(|phone| ExtractedNumber::new(screenshot_id.clone(), phone))
            .collect();

        match &screenshot_id {
            Some(id) => {
                self.extracted
                    .replace_for_screenshot(id, numbers.clone())
                    .await?
            }
            None => self.extracted.add(numbers.clone()).await?,
        }

        Ok(ExtractionOutcome {
            screenshot_id,
            source,
            candidates,
            valid_count,
            invalid_count,
            numbers,
            ocr_text: None,
        })
    }
}

#[async_trait]
impl ReconciliationService for ReconciliationServiceImpl {
    fn parse_number(&self, raw: &str) -> ParsedPhone {
        self.pipeline.codec().parse(raw)
    }

    fn normalize_number(&self, raw: &str) -> String {
        self.pipeline.codec().normalize_for_comparison(raw)
    }

    fn extract_numbers(&self, text: &str, source: SourceHint) -> Vec<ParsedPhone> {
        self.pipeline.extract(text, source)
    }

    async fn extract_text(
        &self,
        text: &str,
        source: SourceHint,
        screenshot_id: Option<String>,
    ) -> ServiceResult<ExtractionOutcome> {
        self.store_extraction(text, source, screenshot_id).await
    }

    async fn process_screenshot(
        &self,
        request: ScreenshotRequest,
    ) -> ServiceResult<ExtractionOutcome> {
        let timer = Timer::new("ocr");
        let recognized = self.ocr.recognize(&request.image_path, request.source).await;
        let duration_ms = timer.elapsed_ms();
        timer.finish_with_status(recognized.is_ok());
        self.metrics.track_ocr(duration_ms, recognized.is_ok());

        let text = recognized.map_err(|e| {
            tracing::warn!(
                screenshot_id = %request.screenshot_id,
                error = %e,
                "OCR failed"
            );
            e
        })?;

        let mut outcome = self
            .store_extraction(&text, request.source, Some(request.screenshot_id))
            .await?;
        outcome.ocr_text = Some(text);
        Ok(outcome)
    }

    async fn process_batch(&self, requests: Vec<ScreenshotRequest>) -> BatchExtraction {
        let total = requests.len();
        let results = stream::iter(requests)
            .map(|request| async move {
                let screenshot_id = request.screenshot_id.clone();
                (screenshot_id, self.process_screenshot(request).await)
            })
            .buffer_unordered(self.max_concurrent_ocr)
            .collect::<Vec<_>>()
            .await;

        let mut batch = BatchExtraction::default();
        for (screenshot_id, result) in results {
            match result {
                Ok(outcome) => batch.processed.push(outcome),
                Err(e) => batch.errors.push(BatchFailure {
                    screenshot_id,
                    error: e.to_string(),
                }),
            }
        }

        tracing::info!(
            total = total,
            processed = batch.processed.len(),
            failed = batch.errors.len(),
            "Batch extraction completed"
        );

        batch
    }

    async fn preview_roster(&self, path: &Path, rows: usize) -> ServiceResult<RosterPreview> {
        let path = path.to_path_buf();

        let preview = tokio::task::spawn_blocking(move || roster::preview_roster(&path, rows))
            .await
            .map_err(|e| ImportError::Task(e.to_string()))??;

        Ok(preview)
    }

    async fn import_roster(
        &self,
        path: &Path,
        mapping: Option<ColumnMapping>,
    ) -> ServiceResult<ImportStats> {
        let _guard = self.import_lock.lock().await;

        let mapping = match mapping {
            Some(mapping) => mapping,
            None => self.preview_roster(path, 0).await?.suggested_mapping,
        };
        let existing_keys = self.roster.existing_keys().await?;
        let normalizer = self.normalizer();
        let path = path.to_path_buf();

        let import = tokio::task::spawn_blocking(move || {
            roster::import_roster(&path, &mapping, normalizer, existing_keys)
        })
        .await
        .map_err(|e| ImportError::Task(e.to_string()))??;

        let stored = self.roster.insert_batch(import.entries).await?;
        self.metrics.track_roster_import(stored);

        Ok(import.stats)
    }

    async fn run_comparison(&self) -> ServiceResult<ComparisonSummary> {
        let _guard = self.comparison_lock.lock().await;
        let timer = Timer::new("comparison");

        let extracted = self.extracted.list().await?;
        let roster = self.roster.list().await?;
        let report = self.engine.compare(&extracted, &roster);

        self.matches.replace_all(report.records).await?;
        self.metrics
            .track_comparison(timer.finish(), report.summary.total);

        Ok(report.summary)
    }

    async fn comparison_results(&self, filter: MatchFilter) -> ServiceResult<Vec<MatchRecord>> {
        Ok(self.matches.list(filter).await?)
    }

    async fn stats(&self) -> ServiceResult<ReconciliationStats> {
        let total_extracted = self.extracted.count().await?;
        let total_roster = self.roster.count().await?;
        let summary = self.matches.summary().await?;

        Ok(ReconciliationStats::from_summary(
            total_extracted,
            total_roster,
            &summary,
        ))
    }

    async fn number_stats(&self) -> ServiceResult<NumberStats> {
        let numbers = self.extracted.list().await?;
        Ok(NumberStats::from_numbers(&numbers))
    }

    async fn numbers_by_country(&self) -> ServiceResult<Vec<CountryGroup>> {
        let numbers = self.extracted.list().await?;
        Ok(models::group_by_country(&numbers))
    }

    async fn find_duplicates(&self) -> ServiceResult<Vec<DuplicateGroup>> {
        let numbers = self.extracted.list().await?;
        let duplicates = models::find_duplicates(&numbers);
        tracing::debug!(groups = duplicates.len(), "Duplicate scan completed");
        Ok(duplicates)
    }

    async fn screenshot_numbers(
        &self,
        screenshot_id: &str,
    ) -> ServiceResult<Vec<ExtractedNumber>> {
        Ok(self.extracted.list_for_screenshot(screenshot_id).await?)
    }
}
