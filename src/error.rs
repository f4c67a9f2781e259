//! Error types for the phone reconciliation service.
//!
//! The extraction and comparison core never fails: an unparseable number is a
//! value (`is_valid == false`), not an error. The enums here cover the
//! collaborators around the core (OCR, roster import, configuration, storage).

use thiserror::Error;

/// Errors raised by an OCR engine while recognizing a screenshot.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Image file does not exist or is not a regular file
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Spawning or talking to the OCR process failed
    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The OCR process exited unsuccessfully
    #[error("OCR failed (exit status {status}): {stderr}")]
    RecognitionFailed { status: i32, stderr: String },

    /// The OCR process did not finish before the deadline
    #[error("OCR timed out after {0} seconds")]
    Timeout(u64),

    /// OCR output was not valid UTF-8
    #[error("OCR output is not valid UTF-8")]
    InvalidOutput,
}

/// Errors that abort a roster import as a whole.
///
/// Bad rows never produce these; they are counted in `ImportStats` instead.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Reading the CSV file failed
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be opened
    #[error("Failed to open roster file: {0}")]
    Io(#[from] std::io::Error),

    /// The mapped phone column is not one of the file's headers
    #[error("Phone column not found in CSV: {0}")]
    MissingPhoneColumn(String),

    /// The blocking import task panicked or was cancelled
    #[error("Import task failed: {0}")]
    Task(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors surfaced by the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Errors surfaced by the reconciliation service to its callers.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for Results with OcrError
pub type OcrResult<T> = Result<T, OcrError>;

/// Convenience type alias for Results with ImportError
pub type ImportResult<T> = Result<T, ImportError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
