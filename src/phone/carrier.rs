//! Best-effort carrier resolution.
//!
//! The bundled phone metadata carries no carrier names, so carrier lookup is
//! a seam: the default knows nothing, and callers with their own prefix data
//! can plug in a [`PrefixCarrierTable`].

/// Resolve a carrier name for a normalized number.
pub trait CarrierLookup: Send + Sync {
    /// Carrier for an E.164 number, or `None` when unknown.
    fn carrier_for(&self, e164: &str) -> Option<String>;
}

/// Lookup with no data. Every number has an unknown carrier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCarrierData;

impl CarrierLookup for NoCarrierData {
    fn carrier_for(&self, _e164: &str) -> Option<String> {
        None
    }
}

/// Carrier lookup by longest matching E.164 prefix.
///
/// # Example
///
/// ```
/// use phone_recon::phone::{CarrierLookup, PrefixCarrierTable};
///
/// let table = PrefixCarrierTable::new(vec![
///     ("+9198".to_string(), "Airtel".to_string()),
///     ("+91987".to_string(), "Jio".to_string()),
/// ]);
/// assert_eq!(table.carrier_for("+919876543210").as_deref(), Some("Jio"));
/// assert_eq!(table.carrier_for("+14155550132"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrefixCarrierTable {
    entries: Vec<(String, String)>,
}

impl PrefixCarrierTable {
    /// Build a table from `(prefix, carrier)` pairs. Prefixes are E.164
    /// strings including the leading `+`.
    pub fn new(entries: Vec<(String, String)>) -> Self {
        let mut entries = entries;
        // Longest prefix first so the first hit is the most specific one.
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CarrierLookup for PrefixCarrierTable {
    fn carrier_for(&self, e164: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(prefix, _)| e164.starts_with(prefix.as_str()))
            .map(|(_, carrier)| carrier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_carrier_data() {
        assert_eq!(NoCarrierData.carrier_for("+14155550132"), None);
    }

    #[test]
    fn test_prefix_table_prefers_longest_prefix() {
        let table = PrefixCarrierTable::new(vec![
            ("+1".to_string(), "Generic NANP".to_string()),
            ("+1415".to_string(), "Bay Mobile".to_string()),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.carrier_for("+14155550132").as_deref(),
            Some("Bay Mobile")
        );
        assert_eq!(
            table.carrier_for("+12125550100").as_deref(),
            Some("Generic NANP")
        );
        assert_eq!(table.carrier_for("+442071234567"), None);
    }

    #[test]
    fn test_empty_table() {
        let table = PrefixCarrierTable::default();
        assert!(table.is_empty());
        assert_eq!(table.carrier_for("+14155550132"), None);
    }
}
