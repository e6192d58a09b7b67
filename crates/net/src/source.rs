use core_types::{LookupKey, same_value};

use crate::FetchError;

/// How the service matches `q` against stored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Substring match (`contains=true`), used by open search.
    Contains,
    /// Prefix match, used by strict validation.
    Prefix,
}

/// A backend value-set store, partitioned by [`LookupKey`].
pub trait LookupSource: Send + Sync {
    fn suggest(
        &self,
        key: &LookupKey,
        query: &str,
        limit: usize,
        mode: MatchMode,
    ) -> Result<Vec<String>, FetchError>;

    fn create(&self, key: &LookupKey, value: &str) -> Result<(), FetchError>;

    fn delete(&self, key: &LookupKey, value: &str) -> Result<(), FetchError>;

    /// Open search. Result order is the backend's.
    fn search(&self, key: &LookupKey, query: &str, limit: usize) -> Result<Vec<String>, FetchError> {
        self.suggest(key, query, limit, MatchMode::Contains)
    }

    /// `true` when `value` case-insensitively equals one of the prefix candidates.
    fn validate(&self, key: &LookupKey, value: &str, limit: usize) -> Result<bool, FetchError> {
        let items = self.suggest(key, value, limit, MatchMode::Prefix)?;
        Ok(items.iter().any(|item| same_value(item, value)))
    }
}
