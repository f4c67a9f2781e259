//! Phone number parsing, validation and normalization.
//!
//! [`PhoneNumberCodec`] wraps the libphonenumber metadata with the region
//! tie-break policy used throughout the crate. Country names and carriers are
//! resolved by the helpers in [`countries`] and [`carrier`].

pub mod carrier;
pub mod codec;
pub mod countries;

pub use carrier::{CarrierLookup, NoCarrierData, PrefixCarrierTable};
pub use codec::{PhoneNumberCodec, COMPARISON_REGIONS, PRIORITY_REGIONS};
pub use countries::country_name;
