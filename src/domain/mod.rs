//! Domain value objects and types.
//!
//! Small, dependency-free types shared by the extraction, roster and
//! matching layers: the screenshot source hint, country metadata and the
//! digit-stripping helpers used when strict phone parsing gives up.

pub mod country;
pub mod phone;
pub mod source;

pub use country::CountryInfo;
pub use phone::{number_type_tag, strip_to_digits};
pub use source::SourceHint;
