//! Tesseract command-line OCR.

use super::OcrEngine;
use crate::domain::SourceHint;
use crate::error::{OcrError, OcrResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Page segmentation modes run per image: a uniform text block, then
/// sparse text for contact lists.
pub const TESSERACT_PASSES: [&str; 2] = ["6", "11"];

/// Runs the `tesseract` binary once per pass and joins the outputs.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    timeout: Duration,
}

impl TesseractOcr {
    /// `timeout` bounds the whole recognition of one image, all passes included.
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Arguments for one pass, with text written to stdout.
    fn pass_args(image: &Path, psm: &str) -> Vec<std::ffi::OsString> {
        vec![
            image.as_os_str().to_owned(),
            "stdout".into(),
            "--oem".into(),
            "3".into(),
            "--psm".into(),
            psm.into(),
        ]
    }

    async fn run_pass(&self, image: &Path, psm: &str) -> OcrResult<String> {
        let output = Command::new(&self.binary)
            .args(Self::pass_args(image, psm))
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(OcrError::RecognitionFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| OcrError::InvalidOutput)
    }

    async fn run_passes(&self, image: &Path) -> OcrResult<String> {
        let mut texts = Vec::with_capacity(TESSERACT_PASSES.len());
        for psm in TESSERACT_PASSES {
            texts.push(self.run_pass(image, psm).await?);
        }
        Ok(texts.join("\n"))
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &Path, source: SourceHint) -> OcrResult<String> {
        let is_file = tokio::fs::metadata(image)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(OcrError::ImageNotFound(image.display().to_string()));
        }

        tracing::debug!(image = %image.display(), source = %source, "Running tesseract");

        match tokio::time::timeout(self.timeout, self.run_passes(image)).await {
            Ok(result) => result,
            Err(_) => Err(OcrError::Timeout(self.timeout.as_secs())),
        }
    }
}
