//! Chip selection for multi-value lookups.

use core_types::normalize;
use indexmap::IndexMap;

/// Insertion-ordered set of selected values keyed by their normalized form.
///
/// The first casing added for a normalized key is the one kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: IndexMap<String, String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless it is blank or already present (ignoring case).
    ///
    /// Returns the normalized key when something was inserted.
    pub fn insert(&mut self, value: &str) -> Option<String> {
        let norm = normalize(value);
        if norm.is_empty() || self.entries.contains_key(&norm) {
            return None;
        }
        self.entries.insert(norm.clone(), value.to_string());
        Some(norm)
    }

    /// Remove by normalized key, keeping the order of the rest.
    pub fn remove(&mut self, norm: &str) -> Option<String> {
        self.entries.shift_remove(norm)
    }

    /// Remove the most recently inserted value.
    pub fn pop_last(&mut self) -> Option<(String, String)> {
        self.entries.pop()
    }

    pub fn contains_norm(&self, norm: &str) -> bool {
        self.entries.contains_key(norm)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.contains_norm(&normalize(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(normalized, display)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Comma-joined display values, the hidden field's wire format.
    pub fn serialized(&self) -> String {
        self.values().collect::<Vec<_>>().join(",")
    }
}
