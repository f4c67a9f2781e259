use async_trait::async_trait;
use phone_recon::error::OcrResult;
use phone_recon::ocr::OcrEngine;
use phone_recon::SourceHint;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// OCR engine that takes a while and records how many calls overlap.
#[allow(dead_code)]
#[derive(Clone)]
pub struct SlowOcrEngine {
    delay: Duration,
    text: String,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl SlowOcrEngine {
    pub fn new(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            text: text.into(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Most calls ever running at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for SlowOcrEngine {
    async fn recognize(&self, _image: &Path, _source: SourceHint) -> OcrResult<String> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}
