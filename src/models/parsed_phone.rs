//! ParsedPhone model: the canonical output of phone parsing.

use serde::{Deserialize, Serialize};

/// A phone number candidate after parsing and normalization.
///
/// `is_valid` is true exactly when `normalized` holds a non-empty E.164
/// string. Invalid numbers keep `raw` so a user can see or retry them; every
/// other field is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPhone {
    /// The matched substring as discovered (label prefix stripped)
    pub raw: String,

    /// E.164 form, e.g. `+14155550132`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,

    /// `+<digits>` calling code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// English country name, `Unknown` when the code has no named region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    /// Best-effort carrier name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    /// Number type tag (MOBILE, FIXED_LINE, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_type: Option<String>,

    /// Whether normalization succeeded under some region
    pub is_valid: bool,
}

impl ParsedPhone {
    /// An unparseable number: only `raw` is carried.
    pub fn invalid(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            normalized: None,
            country_code: None,
            country_name: None,
            carrier: None,
            number_type: None,
            is_valid: false,
        }
    }
}
