//! CRM CSV exports: column detection, preview and import.

use super::normalizer::{ContactNormalizer, ImportStats, RosterIngest};
use crate::error::{ImportError, ImportResult};
use crate::models::{RosterEntry, RosterRow};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Rows returned by a preview when the caller does not ask for a count.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

const PHONE_COLUMNS: &[&str] = &[
    "Phone",
    "Mobile",
    "Phone Number",
    "Mobile Number",
    "Work Phone",
    "Home Phone",
    "Primary Phone",
    "Secondary Phone",
];

const NAME_COLUMNS: &[&str] = &["Full Name", "Name", "Contact Name"];

const FIRST_NAME_COLUMNS: &[&str] = &["First Name", "FirstName", "First_Name"];

const LAST_NAME_COLUMNS: &[&str] = &["Last Name", "LastName", "Last_Name"];

const EMAIL_COLUMNS: &[&str] = &["Email", "Email Address", "Primary Email", "Secondary Email"];

const COMPANY_COLUMNS: &[&str] = &["Company", "Account Name", "Organization", "Company Name"];

const ID_COLUMNS: &[&str] = &["Record Id", "CONTACTID", "LEADID", "Contact ID", "Lead ID", "Id"];

/// Which CSV header feeds each roster field.
///
/// When `last_name` is set, `name` is treated as a first-name column and
/// the two are joined with a space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnMapping {
    /// Header of the phone column (required for import)
    pub phone: Option<String>,
    /// Header of the name (or first-name) column
    #[serde(default)]
    pub name: Option<String>,
    /// Header of a last-name column to append to `name`
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Header of the CRM record id column
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Headers, a few sample rows, and the detected mapping of a CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPreview {
    pub columns: Vec<String>,
    pub sample_rows: Vec<BTreeMap<String, String>>,
    pub suggested_mapping: ColumnMapping,
}

/// New roster entries plus the counts of an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterImport {
    pub entries: Vec<RosterEntry>,
    pub stats: ImportStats,
}

/// Suggest a mapping from CRM export headers.
///
/// Matching is case-insensitive and the first candidate present wins. The
/// returned names are the headers as they appear in the file.
pub fn detect_columns(headers: &[String]) -> ColumnMapping {
    let find = |candidates: &[&str]| -> Option<String> {
        candidates.iter().find_map(|candidate| {
            headers
                .iter()
                .find(|header| header.trim().eq_ignore_ascii_case(candidate))
                .cloned()
        })
    };

    let mut mapping = ColumnMapping {
        phone: find(PHONE_COLUMNS),
        name: find(NAME_COLUMNS),
        last_name: None,
        email: find(EMAIL_COLUMNS),
        company: find(COMPANY_COLUMNS),
        external_id: find(ID_COLUMNS),
    };

    if mapping.name.is_none() {
        if let Some(first) = find(FIRST_NAME_COLUMNS) {
            mapping.name = Some(first);
            mapping.last_name = find(LAST_NAME_COLUMNS);
        }
    }

    mapping
}

/// Preview the first `rows` data rows of a CSV file.
pub fn preview_roster(path: &Path, rows: usize) -> ImportResult<RosterPreview> {
    let file = File::open(path)?;
    preview_roster_from_reader(file, rows)
}

pub fn preview_roster_from_reader<R: Read>(source: R, rows: usize) -> ImportResult<RosterPreview> {
    let mut reader = csv_reader(source);
    let columns = read_headers(&mut reader)?;

    let mut sample_rows = Vec::with_capacity(rows);
    for record in reader.records().take(rows) {
        let record = record?;
        let row = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.clone(), record.get(idx).unwrap_or("").to_string()))
            .collect();
        sample_rows.push(row);
    }

    let suggested_mapping = detect_columns(&columns);
    Ok(RosterPreview {
        columns,
        sample_rows,
        suggested_mapping,
    })
}

/// Import a CSV file into new roster entries.
///
/// `existing_keys` are the normalized numbers already in the roster; rows
/// that collide with them (or with earlier rows) are counted as duplicates.
pub fn import_roster<I>(
    path: &Path,
    mapping: &ColumnMapping,
    normalizer: ContactNormalizer,
    existing_keys: I,
) -> ImportResult<RosterImport>
where
    I: IntoIterator<Item = String>,
{
    let file = File::open(path)?;
    import_roster_from_reader(file, mapping, normalizer, existing_keys)
}

pub fn import_roster_from_reader<R, I>(
    source: R,
    mapping: &ColumnMapping,
    normalizer: ContactNormalizer,
    existing_keys: I,
) -> ImportResult<RosterImport>
where
    R: Read,
    I: IntoIterator<Item = String>,
{
    let mut reader = csv_reader(source);
    let headers = read_headers(&mut reader)?;

    let position = |column: &Option<String>| -> Option<usize> {
        column
            .as_deref()
            .and_then(|name| headers.iter().position(|h| h == name))
    };

    let phone_idx = position(&mapping.phone).ok_or_else(|| {
        ImportError::MissingPhoneColumn(mapping.phone.clone().unwrap_or_else(|| "(unmapped)".to_string()))
    })?;
    let name_idx = position(&mapping.name);
    let last_name_idx = position(&mapping.last_name);
    let email_idx = position(&mapping.email);
    let company_idx = position(&mapping.company);
    let external_id_idx = position(&mapping.external_id);

    let mut ingest = RosterIngest::new(normalizer, existing_keys);

    for record in reader.records() {
        let record = record?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);

        let name = match (cell(name_idx), cell(last_name_idx)) {
            (Some(first), Some(last)) => Some(format!("{} {}", first.trim(), last.trim()).trim().to_string()),
            (first, None) => first,
            (None, last) => last,
        };

        ingest.ingest(RosterRow {
            phone: cell(Some(phone_idx)),
            name,
            email: cell(email_idx),
            company: cell(company_idx),
            external_id: cell(external_id_idx),
        });
    }

    let (entries, stats) = ingest.finish();
    tracing::info!(
        total_rows = stats.total_rows,
        imported = stats.imported,
        duplicates = stats.duplicates,
        "Roster CSV imported"
    );

    Ok(RosterImport { entries, stats })
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source)
}

fn read_headers<R: Read>(reader: &mut csv::Reader<R>) -> ImportResult<Vec<String>> {
    Ok(reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZOHO_EXPORT: &str = "\
Record Id,First Name,Last Name,Mobile,Email,Account Name
zcrm_1,Asha,Rao,+91 98765 43210,asha@example.com,Acme
zcrm_2,Ben,,+1 (415) 555-0132,,Globex
zcrm_3,Cara,Diaz,,cara@example.com,
zcrm_4,Dev,Shah,+919876543210,,
zcrm_5,Eve,,not a number,,
";

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_zoho_columns() {
        let mapping = detect_columns(&headers(&[
            "Record Id",
            "First Name",
            "Last Name",
            "Mobile",
            "Email",
            "Account Name",
        ]));

        assert_eq!(mapping.phone.as_deref(), Some("Mobile"));
        assert_eq!(mapping.name.as_deref(), Some("First Name"));
        assert_eq!(mapping.last_name.as_deref(), Some("Last Name"));
        assert_eq!(mapping.email.as_deref(), Some("Email"));
        assert_eq!(mapping.company.as_deref(), Some("Account Name"));
        assert_eq!(mapping.external_id.as_deref(), Some("Record Id"));
    }

    #[test]
    fn test_detect_is_case_insensitive_and_keeps_header_spelling() {
        let mapping = detect_columns(&headers(&["phone number", "NAME", "id"]));
        assert_eq!(mapping.phone.as_deref(), Some("phone number"));
        assert_eq!(mapping.name.as_deref(), Some("NAME"));
        assert!(mapping.last_name.is_none());
        assert_eq!(mapping.external_id.as_deref(), Some("id"));
    }

    #[test]
    fn test_detect_candidate_order_wins() {
        let mapping = detect_columns(&headers(&["Work Phone", "Mobile", "Phone"]));
        assert_eq!(mapping.phone.as_deref(), Some("Phone"));
    }

    #[test]
    fn test_detect_nothing() {
        assert_eq!(detect_columns(&headers(&["foo", "bar"])), ColumnMapping::default());
    }

    #[test]
    fn test_preview_limits_rows() {
        let preview = preview_roster_from_reader(ZOHO_EXPORT.as_bytes(), 2).unwrap();
        assert_eq!(preview.columns.len(), 6);
        assert_eq!(preview.sample_rows.len(), 2);
        assert_eq!(preview.sample_rows[0]["First Name"], "Asha");
        assert_eq!(preview.sample_rows[1]["Mobile"], "+1 (415) 555-0132");
        assert_eq!(preview.suggested_mapping.phone.as_deref(), Some("Mobile"));
    }

    #[test]
    fn test_import_counts_and_entries() {
        let mapping = detect_columns(&headers(&[
            "Record Id",
            "First Name",
            "Last Name",
            "Mobile",
            "Email",
            "Account Name",
        ]));

        let import = import_roster_from_reader(
            ZOHO_EXPORT.as_bytes(),
            &mapping,
            ContactNormalizer::default(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            import.stats,
            ImportStats {
                total_rows: 5,
                imported: 2,
                skipped: 1,
                duplicates: 1,
                invalid_phones: 1,
            }
        );

        let asha = &import.entries[0];
        assert_eq!(asha.normalized_number, "+919876543210");
        assert_eq!(asha.name.as_deref(), Some("Asha Rao"));
        assert_eq!(asha.external_id.as_deref(), Some("zcrm_1"));

        let ben = &import.entries[1];
        assert_eq!(ben.normalized_number, "+14155550132");
        assert_eq!(ben.name.as_deref(), Some("Ben"));
        assert!(ben.email.is_none());
        assert_eq!(ben.company.as_deref(), Some("Globex"));
    }

    #[test]
    fn test_import_missing_phone_column() {
        let mapping = ColumnMapping {
            phone: Some("Telephone".to_string()),
            ..Default::default()
        };

        let err = import_roster_from_reader(
            ZOHO_EXPORT.as_bytes(),
            &mapping,
            ContactNormalizer::default(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingPhoneColumn(ref c) if c == "Telephone"));

        let err = import_roster_from_reader(
            ZOHO_EXPORT.as_bytes(),
            &ColumnMapping::default(),
            ContactNormalizer::default(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingPhoneColumn(_)));
    }

    #[test]
    fn test_import_missing_file_is_io_error() {
        let err = import_roster(
            Path::new("/nonexistent/roster.csv"),
            &ColumnMapping::default(),
            ContactNormalizer::default(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
