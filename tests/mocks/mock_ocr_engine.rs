use async_trait::async_trait;
use phone_recon::error::{OcrError, OcrResult};
use phone_recon::ocr::OcrEngine;
use phone_recon::SourceHint;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock OCR engine for testing.
///
/// Answers from a configured image → text table and records which images
/// were recognized with which source hint.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockOcrEngine {
    texts: Arc<Mutex<HashMap<PathBuf, String>>>,
    failures: Arc<Mutex<HashMap<PathBuf, i32>>>,
    calls: Arc<Mutex<Vec<(PathBuf, SourceHint)>>>,
}

#[allow(dead_code)]
impl MockOcrEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognizing `image` yields `text`.
    pub fn add_text(&self, image: impl Into<PathBuf>, text: impl Into<String>) {
        let mut texts = self.texts.lock().unwrap();
        texts.insert(image.into(), text.into());
    }

    /// Recognizing `image` fails as if tesseract exited with `status`.
    pub fn add_failure(&self, image: impl Into<PathBuf>, status: i32) {
        let mut failures = self.failures.lock().unwrap();
        failures.insert(image.into(), status);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(PathBuf, SourceHint)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn recognize(&self, image: &Path, source: SourceHint) -> OcrResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((image.to_path_buf(), source));

        if let Some(status) = self.failures.lock().unwrap().get(image) {
            return Err(OcrError::RecognitionFailed {
                status: *status,
                stderr: "mock failure".to_string(),
            });
        }

        self.texts
            .lock()
            .unwrap()
            .get(image)
            .cloned()
            .ok_or_else(|| OcrError::ImageNotFound(image.display().to_string()))
    }
}
