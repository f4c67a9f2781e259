//! Roster models: rows from a CRM export and the entries imported from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default `source` tag for entries imported from a CRM CSV export.
pub const CSV_ROSTER_SOURCE: &str = "crm_csv";

/// One row of a roster import, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub external_id: Option<String>,
}

impl RosterRow {
    /// A row with only a phone number.
    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Default::default()
        }
    }
}

/// A known contact from the imported roster.
///
/// `normalized_number` is the reconciliation key; the import step keeps it
/// unique across the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Canonical comparison key
    pub normalized_number: String,

    /// Phone as it appeared in the export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Record id in the source CRM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    /// Where the entry came from
    pub source: String,

    /// When the entry was imported
    pub imported_at: DateTime<Utc>,
}

impl RosterEntry {
    /// Create an entry with only its key set.
    pub fn new(normalized_number: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            normalized_number: normalized_number.into(),
            raw_number: None,
            name: None,
            email: None,
            company: None,
            external_id: None,
            country_code: None,
            country_name: None,
            source: CSV_ROSTER_SOURCE.to_string(),
            imported_at: Utc::now(),
        }
    }
}
