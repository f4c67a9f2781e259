//! Country metadata attached to a phone number.

use serde::{Deserialize, Serialize};

/// Calling code and country name for a number.
///
/// Both fields are independently optional: a number can resolve to a calling
/// code whose region has no name (`country_name == Some("Unknown")`), and an
/// unparseable number resolves to neither.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountryInfo {
    /// `+<digits>` calling code, e.g. `+91`
    pub country_code: Option<String>,

    /// English country name, e.g. `India`
    pub country_name: Option<String>,
}

impl CountryInfo {
    /// Country info for a number that could not be resolved at all.
    pub fn unknown() -> Self {
        Self::default()
    }
}
