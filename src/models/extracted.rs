//! ExtractedNumber model: a parsed number stored against its screenshot.

use super::ParsedPhone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A number extracted from a screenshot and handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedNumber {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Screenshot the number was read from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_id: Option<String>,

    /// Parse result
    #[serde(flatten)]
    pub phone: ParsedPhone,

    /// When the number was extracted
    pub extracted_at: DateTime<Utc>,
}

impl ExtractedNumber {
    /// Wrap a parse result with a fresh id.
    pub fn new(screenshot_id: Option<String>, phone: ParsedPhone) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            screenshot_id,
            phone,
            extracted_at: Utc::now(),
        }
    }

    /// The normalized number, if parsing succeeded.
    pub fn normalized(&self) -> Option<&str> {
        self.phone.normalized.as_deref()
    }
}
