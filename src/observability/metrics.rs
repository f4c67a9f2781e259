//! Counters for screenshot extraction and roster reconciliation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared counters; clones update the same values.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    screenshots_processed: Arc<AtomicU64>,
    ocr_failures: Arc<AtomicU64>,
    candidates_found: Arc<AtomicU64>,
    valid_numbers: Arc<AtomicU64>,
    invalid_numbers: Arc<AtomicU64>,
    comparisons_run: Arc<AtomicU64>,
    roster_rows_imported: Arc<AtomicU64>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            screenshots_processed: Arc::new(AtomicU64::new(0)),
            ocr_failures: Arc::new(AtomicU64::new(0)),
            candidates_found: Arc::new(AtomicU64::new(0)),
            valid_numbers: Arc::new(AtomicU64::new(0)),
            invalid_numbers: Arc::new(AtomicU64::new(0)),
            comparisons_run: Arc::new(AtomicU64::new(0)),
            roster_rows_imported: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Track one OCR call.
    pub fn track_ocr(&self, duration_ms: u128, success: bool) {
        self.screenshots_processed.fetch_add(1, Ordering::Relaxed);

        if !success {
            self.ocr_failures.fetch_add(1, Ordering::Relaxed);
        }

        tracing::debug!(duration_ms = duration_ms, success = success, "OCR completed");
    }

    /// Track the outcome of one extraction run.
    pub fn track_extraction(&self, candidates: usize, valid: usize, invalid: usize) {
        self.candidates_found
            .fetch_add(candidates as u64, Ordering::Relaxed);
        self.valid_numbers.fetch_add(valid as u64, Ordering::Relaxed);
        self.invalid_numbers.fetch_add(invalid as u64, Ordering::Relaxed);

        tracing::info!(
            candidates = candidates,
            valid = valid,
            invalid = invalid,
            "Extraction completed"
        );
    }

    /// Track one comparison run.
    pub fn track_comparison(&self, duration_ms: u128, compared: usize) {
        self.comparisons_run.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            duration_ms = duration_ms,
            compared = compared,
            "Comparison run completed"
        );
    }

    /// Track rows stored by a roster import.
    pub fn track_roster_import(&self, imported: usize) {
        self.roster_rows_imported
            .fetch_add(imported as u64, Ordering::Relaxed);
    }

    pub fn screenshots_processed(&self) -> u64 {
        self.screenshots_processed.load(Ordering::Relaxed)
    }

    pub fn ocr_failures(&self) -> u64 {
        self.ocr_failures.load(Ordering::Relaxed)
    }

    pub fn candidates_found(&self) -> u64 {
        self.candidates_found.load(Ordering::Relaxed)
    }

    pub fn valid_numbers(&self) -> u64 {
        self.valid_numbers.load(Ordering::Relaxed)
    }

    pub fn invalid_numbers(&self) -> u64 {
        self.invalid_numbers.load(Ordering::Relaxed)
    }

    pub fn comparisons_run(&self) -> u64 {
        self.comparisons_run.load(Ordering::Relaxed)
    }

    pub fn roster_rows_imported(&self) -> u64 {
        self.roster_rows_imported.load(Ordering::Relaxed)
    }

    /// Share of OCR calls that failed (0.0 to 1.0).
    pub fn ocr_failure_rate(&self) -> f64 {
        let total = self.screenshots_processed() as f64;

        if total == 0.0 {
            0.0
        } else {
            self.ocr_failures() as f64 / total
        }
    }

    /// Share of parsed candidates that were valid numbers (0.0 to 1.0).
    pub fn valid_rate(&self) -> f64 {
        let valid = self.valid_numbers() as f64;
        let total = (self.valid_numbers() + self.invalid_numbers()) as f64;

        if total == 0.0 {
            0.0
        } else {
            valid / total
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Metrics Summary:\n\
             Screenshots Processed: {}\n\
             OCR Failures: {} ({:.2}% failure rate)\n\
             Candidates Found: {}\n\
             Valid Numbers: {} ({:.2}% valid)\n\
             Invalid Numbers: {}\n\
             Comparisons Run: {}\n\
             Roster Rows Imported: {}",
            self.screenshots_processed(),
            self.ocr_failures(),
            self.ocr_failure_rate() * 100.0,
            self.candidates_found(),
            self.valid_numbers(),
            self.valid_rate() * 100.0,
            self.invalid_numbers(),
            self.comparisons_run(),
            self.roster_rows_imported(),
        )
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A timer for tracking operation duration.
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Elapsed milliseconds so far, without finishing.
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Finish the timer and return the elapsed time in milliseconds.
    pub fn finish(self) -> u128 {
        let duration_ms = self.elapsed_ms();

        tracing::debug!(
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );

        duration_ms
    }

    pub fn finish_with_status(self, success: bool) -> u128 {
        let duration_ms = self.elapsed_ms();

        if success {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation succeeded"
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation failed"
            );
        }

        duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_tracker_creation() {
        let tracker = MetricsTracker::new();
        assert_eq!(tracker.screenshots_processed(), 0);
        assert_eq!(tracker.ocr_failures(), 0);
        assert_eq!(tracker.candidates_found(), 0);
        assert_eq!(tracker.comparisons_run(), 0);
        assert_eq!(tracker.roster_rows_imported(), 0);
    }

    #[test]
    fn test_track_ocr() {
        let tracker = MetricsTracker::new();

        tracker.track_ocr(120, true);
        tracker.track_ocr(80, false);
        assert_eq!(tracker.screenshots_processed(), 2);
        assert_eq!(tracker.ocr_failures(), 1);
        assert!((tracker.ocr_failure_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_track_extraction() {
        let tracker = MetricsTracker::new();

        tracker.track_extraction(4, 2, 1);
        tracker.track_extraction(1, 1, 0);
        assert_eq!(tracker.candidates_found(), 5);
        assert_eq!(tracker.valid_numbers(), 3);
        assert_eq!(tracker.invalid_numbers(), 1);
        assert!((tracker.valid_rate() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_clones_share_counters() {
        let tracker = MetricsTracker::new();
        let clone = tracker.clone();

        clone.track_comparison(5, 10);
        clone.track_roster_import(7);
        assert_eq!(tracker.comparisons_run(), 1);
        assert_eq!(tracker.roster_rows_imported(), 7);
    }

    #[test]
    fn test_rates_without_data() {
        let tracker = MetricsTracker::new();
        assert_eq!(tracker.ocr_failure_rate(), 0.0);
        assert_eq!(tracker.valid_rate(), 0.0);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        let duration = timer.finish();
        assert!(duration >= 10);
    }

    #[test]
    fn test_summary() {
        let tracker = MetricsTracker::new();
        tracker.track_ocr(100, true);
        tracker.track_extraction(3, 2, 1);

        let summary = tracker.summary();
        assert!(summary.contains("Screenshots Processed: 1"));
        assert!(summary.contains("Valid Numbers: 2"));
    }
}
