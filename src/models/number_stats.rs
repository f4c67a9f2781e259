//! Read views over the extracted-number set: totals, per-country groups and
//! numbers seen more than once.

use super::ExtractedNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Countries listed in [`NumberStats::by_country`].
pub const TOP_COUNTRIES: usize = 10;

/// Numbers listed per group in [`CountryGroup::numbers`].
pub const COUNTRY_GROUP_LIMIT: usize = 100;

/// Country name used when a number carries a code but no name.
const UNKNOWN_COUNTRY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country_code: String,
    pub country_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub number_type: String,
    pub count: usize,
}

/// Totals over every stored extracted number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Most frequent countries first, at most [`TOP_COUNTRIES`]
    pub by_country: Vec<CountryCount>,
    /// Number types in order of first appearance
    pub by_type: Vec<TypeCount>,
}

impl NumberStats {
    pub fn from_numbers(numbers: &[ExtractedNumber]) -> Self {
        let valid = numbers.iter().filter(|n| n.phone.is_valid).count();

        let by_country = group_by_country(numbers)
            .into_iter()
            .take(TOP_COUNTRIES)
            .map(|group| CountryCount {
                country_code: group.country_code,
                country_name: group.country_name,
                count: group.count,
            })
            .collect();

        let mut by_type: Vec<TypeCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for tag in numbers.iter().filter_map(|n| n.phone.number_type.as_deref()) {
            match positions.get(tag) {
                Some(&pos) => by_type[pos].count += 1,
                None => {
                    positions.insert(tag, by_type.len());
                    by_type.push(TypeCount {
                        number_type: tag.to_string(),
                        count: 1,
                    });
                }
            }
        }

        Self {
            total: numbers.len(),
            valid,
            invalid: numbers.len() - valid,
            by_country,
            by_type,
        }
    }
}

/// Numbers sharing a calling code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryGroup {
    pub country_code: String,
    pub country_name: String,
    /// Every number with this code, even past the listing limit
    pub count: usize,
    /// First [`COUNTRY_GROUP_LIMIT`] numbers in storage order
    pub numbers: Vec<ExtractedNumber>,
}

/// Group numbers by calling code, largest group first.
///
/// Numbers without a code are left out. Groups of equal size keep the order
/// in which their code first appeared.
pub fn group_by_country(numbers: &[ExtractedNumber]) -> Vec<CountryGroup> {
    let mut groups: Vec<CountryGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for number in numbers {
        let Some(code) = number.phone.country_code.as_deref() else {
            continue;
        };
        let pos = *positions.entry(code).or_insert_with(|| {
            groups.push(CountryGroup {
                country_code: code.to_string(),
                country_name: number
                    .phone
                    .country_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
                count: 0,
                numbers: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[pos];
        group.count += 1;
        if group.numbers.len() < COUNTRY_GROUP_LIMIT {
            group.numbers.push(number.clone());
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// One normalized number stored more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub normalized_number: String,
    pub count: usize,
    pub instances: Vec<ExtractedNumber>,
}

/// Normalized numbers stored more than once, in order of first appearance.
///
/// Invalid numbers have no normalized value and never count as duplicates.
pub fn find_duplicates(numbers: &[ExtractedNumber]) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for number in numbers {
        let Some(key) = number.normalized() else {
            continue;
        };
        let pos = *positions.entry(key).or_insert_with(|| {
            groups.push(DuplicateGroup {
                normalized_number: key.to_string(),
                count: 0,
                instances: Vec::new(),
            });
            groups.len() - 1
        });
        groups[pos].count += 1;
        groups[pos].instances.push(number.clone());
    }

    groups.retain(|g| g.count > 1);
    groups
}
