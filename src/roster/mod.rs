//! Roster ingestion: normalizing CRM export rows into comparison keys.

pub mod csv_import;
pub mod normalizer;

pub use csv_import::{
    detect_columns, import_roster, import_roster_from_reader, preview_roster,
    preview_roster_from_reader, ColumnMapping, RosterImport, RosterPreview, DEFAULT_PREVIEW_ROWS,
};
pub use normalizer::{ContactNormalizer, ImportStats, NormalizedPhone, RosterIngest, RowOutcome};
