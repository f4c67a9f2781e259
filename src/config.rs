//! Configuration management for the phone reconciliation server.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file. Nothing here writes to stdout, which MCP uses for communication.

use crate::domain::SourceHint;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the phone reconciliation server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path or name of the tesseract binary (default: "tesseract")
    pub tesseract_path: PathBuf,

    /// Deadline for recognizing one screenshot, in seconds (default: 60)
    pub ocr_timeout_secs: u64,

    /// Screenshots recognized at once during batch extraction (default: 4)
    pub max_concurrent_ocr: usize,

    /// Source assumed when a request names none (default: whatsapp)
    pub default_source: SourceHint,

    /// Log filter used when `RUST_LOG` is unset (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `TESSERACT_PATH`: tesseract binary (default: "tesseract")
    /// - `OCR_TIMEOUT_SECS`: per-screenshot OCR deadline (default: 60)
    /// - `MAX_CONCURRENT_OCR`: batch concurrency cap (default: 4)
    /// - `DEFAULT_SOURCE`: whatsapp, sms, call_log (default: whatsapp)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let tesseract_path = match env::var("TESSERACT_PATH") {
            Ok(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: "TESSERACT_PATH".to_string(),
                    reason: "Cannot be empty".to_string(),
                })
            }
            Ok(path) => PathBuf::from(path.trim()),
            Err(_) => defaults.tesseract_path,
        };

        let ocr_timeout_secs = Self::parse_env_u64("OCR_TIMEOUT_SECS", defaults.ocr_timeout_secs)?;
        if ocr_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "OCR_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let max_concurrent_ocr =
            Self::parse_env_usize("MAX_CONCURRENT_OCR", defaults.max_concurrent_ocr)?;
        if max_concurrent_ocr == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_CONCURRENT_OCR".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let default_source = env::var("DEFAULT_SOURCE")
            .map(|label| SourceHint::from_label(&label))
            .unwrap_or(defaults.default_source);

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            tesseract_path,
            ocr_timeout_secs,
            max_concurrent_ocr,
            default_source,
            log_level,
        })
    }

    /// OCR deadline as a duration.
    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tesseract_path: PathBuf::from("tesseract"),
            ocr_timeout_secs: 60,
            max_concurrent_ocr: 4,
            default_source: SourceHint::WhatsApp,
            log_level: "error".to_string(),
        }
    }
}
