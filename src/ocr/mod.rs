//! Text recognition collaborator.
//!
//! The extraction core only ever sees recognized text. Engines implement
//! [`OcrEngine`]; [`TesseractOcr`] shells out to the `tesseract` binary.

pub mod tesseract;

pub use tesseract::{TesseractOcr, TESSERACT_PASSES};

use crate::domain::SourceHint;
use crate::error::OcrResult;
use async_trait::async_trait;
use std::path::Path;

/// Recognizes the text in a screenshot.
///
/// Implementations may run several recognition passes over the same image
/// and return their outputs concatenated.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &Path, source: SourceHint) -> OcrResult<String>;
}
