//! Phone number codec with region-priority disambiguation.
//!
//! A national-format string such as `4155550132` can be valid in more than one
//! country. The codec resolves this with a fixed tie-break order: it tries each
//! priority region in turn, then a region-less parse, and the first region
//! under which the string validates wins. An ambiguous number can therefore be
//! attributed to the "wrong" country; that is an accepted limitation of the
//! heuristic, not something the codec tries to infer around.

use super::carrier::{CarrierLookup, NoCarrierData};
use super::countries::country_name;
use crate::domain::{number_type_tag, strip_to_digits, CountryInfo};
use crate::models::ParsedPhone;
use phonenumber::country::Id as RegionId;
use phonenumber::{Mode, PhoneNumber};
use std::fmt;
use std::sync::Arc;

/// Regions tried, in order, by [`PhoneNumberCodec::parse`].
pub const PRIORITY_REGIONS: [RegionId; 8] = [
    RegionId::US,
    RegionId::IN,
    RegionId::CA,
    RegionId::GB,
    RegionId::AU,
    RegionId::AE,
    RegionId::PK,
    RegionId::BD,
];

/// Primary operating regions tried by
/// [`PhoneNumberCodec::normalize_for_comparison`].
pub const COMPARISON_REGIONS: [RegionId; 2] = [RegionId::US, RegionId::IN];

/// Inputs longer than this are never handed to the parser.
const MAX_INPUT_LEN: usize = 250;

/// Name reported when a calling code resolves but its region has no name.
const UNKNOWN_COUNTRY: &str = "Unknown";

/// Parses, validates and normalizes phone number strings.
///
/// Every entry point is total: malformed input degrades to an invalid
/// [`ParsedPhone`] or a digit-stripped string, never an error.
///
/// # Example
///
/// ```
/// use phone_recon::phone::PhoneNumberCodec;
///
/// let codec = PhoneNumberCodec::new();
/// let parsed = codec.parse("+1 415-555-0132");
/// assert!(parsed.is_valid);
/// assert_eq!(parsed.normalized.as_deref(), Some("+14155550132"));
/// assert_eq!(parsed.country_code.as_deref(), Some("+1"));
/// ```
#[derive(Clone)]
pub struct PhoneNumberCodec {
    priority_regions: Vec<RegionId>,
    comparison_regions: Vec<RegionId>,
    carriers: Arc<dyn CarrierLookup>,
}

impl PhoneNumberCodec {
    /// Create a codec with the default region order and no carrier data.
    pub fn new() -> Self {
        Self {
            priority_regions: PRIORITY_REGIONS.to_vec(),
            comparison_regions: COMPARISON_REGIONS.to_vec(),
            carriers: Arc::new(NoCarrierData),
        }
    }

    /// Use a different carrier lookup.
    pub fn with_carrier_lookup(mut self, carriers: Arc<dyn CarrierLookup>) -> Self {
        self.carriers = carriers;
        self
    }

    /// Parse a raw string into a [`ParsedPhone`].
    ///
    /// Tries the priority regions in order, then a region-less parse. The
    /// first attempt that yields a valid number populates every field;
    /// otherwise the result is invalid and carries only `raw`.
    pub fn parse(&self, raw: &str) -> ParsedPhone {
        let cleaned = raw.trim();

        let attempts = self
            .priority_regions
            .iter()
            .cloned()
            .map(Some)
            .chain(std::iter::once(None));

        for region in attempts {
            if let Some(number) = Self::parse_valid(cleaned, region) {
                return self.describe(raw, &number);
            }
        }

        tracing::trace!(raw = %raw, "No region validated phone candidate");
        ParsedPhone::invalid(raw)
    }

    /// Produce a comparison key for a phone string.
    ///
    /// Tries only the primary operating regions and returns the E.164 form
    /// on success. Otherwise falls back to digit stripping: a leading `+` is
    /// kept and every non-digit is dropped. The result may be empty; it is an
    /// approximate key for matching, not a display value.
    pub fn normalize_for_comparison(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let cleaned = raw.trim();
        for region in &self.comparison_regions {
            if let Some(number) = Self::parse_valid(cleaned, Some(region.clone())) {
                return Self::e164(&number);
            }
        }

        strip_to_digits(raw)
    }

    /// Country metadata for an already-normalized number.
    ///
    /// The string is parsed without a default region and without validity
    /// checks, so any `+<code>...` string resolves its calling code. Anything
    /// unparseable yields both fields absent.
    pub fn country_info(&self, normalized: &str) -> CountryInfo {
        if !Self::parseable(normalized) {
            return CountryInfo::unknown();
        }

        match phonenumber::parse(None, normalized) {
            Ok(number) => CountryInfo {
                country_code: Some(Self::calling_code(&number)),
                country_name: Some(Self::country_name_for(&number)),
            },
            Err(_) => CountryInfo::unknown(),
        }
    }

    fn parse_valid(input: &str, region: Option<RegionId>) -> Option<PhoneNumber> {
        if !Self::parseable(input) {
            return None;
        }

        let number = phonenumber::parse(region, input).ok()?;
        if phonenumber::is_valid(&number) {
            Some(number)
        } else {
            None
        }
    }

    /// Cheap pre-check before the parser sees the input.
    fn parseable(input: &str) -> bool {
        !input.is_empty()
            && input.len() <= MAX_INPUT_LEN
            && input.chars().any(|c| c.is_ascii_digit())
    }

    fn describe(&self, raw: &str, number: &PhoneNumber) -> ParsedPhone {
        let normalized = Self::e164(number);
        let carrier = self.carriers.carrier_for(&normalized);

        ParsedPhone {
            raw: raw.to_string(),
            country_code: Some(Self::calling_code(number)),
            country_name: Some(Self::country_name_for(number)),
            carrier,
            number_type: Self::number_type(number),
            normalized: Some(normalized),
            is_valid: true,
        }
    }

    fn e164(number: &PhoneNumber) -> String {
        number.format().mode(Mode::E164).to_string()
    }

    fn calling_code(number: &PhoneNumber) -> String {
        format!("+{}", number.code().value())
    }

    fn country_name_for(number: &PhoneNumber) -> String {
        number
            .country()
            .id()
            .and_then(|region| country_name(&format!("{:?}", region)))
            .unwrap_or(UNKNOWN_COUNTRY)
            .to_string()
    }

    fn number_type(number: &PhoneNumber) -> Option<String> {
        let kind = format!("{:?}", number.number_type(&phonenumber::metadata::DATABASE));
        if kind == "Unknown" {
            None
        } else {
            Some(number_type_tag(&kind))
        }
    }
}

impl Default for PhoneNumberCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhoneNumberCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneNumberCodec")
            .field("priority_regions", &self.priority_regions)
            .field("comparison_regions", &self.comparison_regions)
            .finish_non_exhaustive()
    }
}
