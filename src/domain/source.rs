//! SourceHint value object.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Where a screenshot came from.
///
/// The hint selects the candidate pattern list used during extraction. Only
/// [`SourceHint::WhatsApp`] has a dedicated list; every other source uses the
/// generic one.
///
/// # Example
///
/// ```
/// use phone_recon::domain::SourceHint;
///
/// assert_eq!(SourceHint::from_label("WhatsApp"), SourceHint::WhatsApp);
/// assert_eq!(SourceHint::from_label("telegram"), SourceHint::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceHint {
    /// WhatsApp chat, contact-info or group participant screens
    #[default]
    WhatsApp,

    /// SMS conversation screens
    Sms,

    /// Phone call log screens
    CallLog,

    /// Anything else
    Unknown,
}

impl SourceHint {
    /// Parse a source label. Matching is case-insensitive and never fails;
    /// labels that are not recognized map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Self::WhatsApp,
            "sms" => Self::Sms,
            "call_log" | "calllog" | "call-log" => Self::CallLog,
            _ => Self::Unknown,
        }
    }

    /// The canonical label for this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::Sms => "sms",
            Self::CallLog => "call_log",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SourceHint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceHint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SourceHint::from_label(&s))
    }
}
