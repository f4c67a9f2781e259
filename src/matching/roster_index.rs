//! Insertion-ordered lookup over roster entries.

use crate::models::RosterEntry;
use std::collections::HashMap;

/// Roster entries keyed by `normalized_number`, iterated in insertion order.
///
/// Partial matching returns the first entry (in iteration order) whose key
/// ends with a suffix, so a stable order is what makes partial matches
/// reproducible. When two entries share a key the later one replaces the
/// earlier, keeping the earlier one's position.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex<'a> {
    slots: Vec<&'a RosterEntry>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> RosterIndex<'a> {
    /// Index a roster in the order given.
    pub fn build(entries: &'a [RosterEntry]) -> Self {
        let mut index = Self {
            slots: Vec::with_capacity(entries.len()),
            positions: HashMap::with_capacity(entries.len()),
        };

        for entry in entries {
            index.insert(entry);
        }

        index
    }

    fn insert(&mut self, entry: &'a RosterEntry) {
        let key = entry.normalized_number.as_str();
        match self.positions.get(key) {
            Some(&position) => self.slots[position] = entry,
            None => {
                self.positions.insert(key, self.slots.len());
                self.slots.push(entry);
            }
        }
    }

    /// Entry whose key is exactly `normalized`.
    pub fn get(&self, normalized: &str) -> Option<&'a RosterEntry> {
        self.positions
            .get(normalized)
            .map(|&position| self.slots[position])
    }

    /// First entry, in insertion order, whose non-empty key ends with `suffix`.
    pub fn find_by_suffix(&self, suffix: &str) -> Option<&'a RosterEntry> {
        self.slots
            .iter()
            .copied()
            .find(|entry| {
                !entry.normalized_number.is_empty() && entry.normalized_number.ends_with(suffix)
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a RosterEntry> + '_ {
        self.slots.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(normalized: &str, name: &str) -> RosterEntry {
        let mut entry = RosterEntry::new(normalized);
        entry.name = Some(name.to_string());
        entry
    }

    #[test]
    fn test_preserves_insertion_order() {
        let roster = vec![
            entry("+14155550132", "a"),
            entry("+919876543210", "b"),
            entry("+442079460958", "c"),
        ];
        let index = RosterIndex::build(&roster);

        let names: Vec<&str> = index.iter().filter_map(|e| e.name.as_deref()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_duplicate_key_last_write_wins_in_first_position() {
        let roster = vec![
            entry("+14155550132", "first"),
            entry("+919876543210", "other"),
            entry("+14155550132", "second"),
        ];
        let index = RosterIndex::build(&roster);

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("+14155550132").and_then(|e| e.name.as_deref()),
            Some("second")
        );
        let names: Vec<&str> = index.iter().filter_map(|e| e.name.as_deref()).collect();
        assert_eq!(names, vec!["second", "other"]);
    }

    #[test]
    fn test_find_by_suffix_returns_first_hit() {
        let roster = vec![
            entry("+914155550132", "india"),
            entry("+14155550132", "us"),
        ];
        let index = RosterIndex::build(&roster);

        let hit = index.find_by_suffix("4155550132").unwrap();
        assert_eq!(hit.name.as_deref(), Some("india"));
        assert!(index.find_by_suffix("0000000000").is_none());
    }

    #[test]
    fn test_find_by_suffix_skips_empty_keys() {
        let roster = vec![entry("", "blank")];
        let index = RosterIndex::build(&roster);
        assert!(index.find_by_suffix("").is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = RosterIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.get("+14155550132").is_none());
    }
}
