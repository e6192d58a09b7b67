use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use core_types::{LookupKey, normalize};

use crate::{FetchError, LookupSource, MatchMode};

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    norm: String,
    frequency: u32,
}

/// In-process value store with the service's ranking rules.
///
/// Values are unique per key after normalization; re-adding an existing
/// value bumps its frequency instead of inserting. Suggestions rank by
/// frequency (descending), then normalized value (ascending).
#[derive(Debug, Default)]
pub struct MemoryLookupSource {
    sets: Mutex<HashMap<LookupKey, Vec<Entry>>>,
}

impl MemoryLookupSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, S>(key: &LookupKey, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let source = Self::new();
        for value in values {
            source.upsert(key, value.as_ref());
        }
        source
    }

    fn upsert(&self, key: &LookupKey, value: &str) {
        let norm = normalize(value);
        if norm.is_empty() {
            return;
        }
        let mut sets = self.sets.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = sets.entry(key.clone()).or_default();
        match entries.iter_mut().find(|e| e.norm == norm) {
            Some(existing) => existing.frequency = existing.frequency.saturating_add(1),
            None => entries.push(Entry {
                value: value.to_string(),
                norm,
                frequency: 1,
            }),
        }
    }

    /// Stored values for `key`, in insertion order.
    pub fn values(&self, key: &LookupKey) -> Vec<String> {
        let sets = self.sets.lock().unwrap_or_else(PoisonError::into_inner);
        sets.get(key)
            .map(|entries| entries.iter().map(|e| e.value.clone()).collect())
            .unwrap_or_default()
    }
}

impl LookupSource for MemoryLookupSource {
    fn suggest(
        &self,
        key: &LookupKey,
        query: &str,
        limit: usize,
        mode: MatchMode,
    ) -> Result<Vec<String>, FetchError> {
        let needle = normalize(query);
        let sets = self.sets.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = sets.get(key) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<&Entry> = entries
            .iter()
            .filter(|e| match mode {
                MatchMode::Contains => e.norm.contains(&needle),
                MatchMode::Prefix => e.norm.starts_with(&needle),
            })
            .collect();
        hits.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.norm.cmp(&b.norm)));

        Ok(hits
            .into_iter()
            .take(limit.max(1))
            .map(|e| e.value.clone())
            .collect())
    }

    fn create(&self, key: &LookupKey, value: &str) -> Result<(), FetchError> {
        self.upsert(key, value);
        Ok(())
    }

    fn delete(&self, key: &LookupKey, value: &str) -> Result<(), FetchError> {
        let norm = normalize(value);
        let mut sets = self.sets.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = sets.get_mut(key) {
            entries.retain(|e| e.norm != norm);
        }
        Ok(())
    }
}
