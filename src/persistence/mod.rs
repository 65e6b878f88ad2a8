//! Storage side channel for filter state and query results
//!
//! Persistence is a UX enhancement, not a correctness requirement: every
//! failure in this module degrades to a logged no-op, and a corrupted entry
//! is treated identically to an absent one.

pub mod filter_cache;
pub mod query_cache;

use std::sync::RwLock;

use anyhow::{Result, anyhow};
use indexmap::IndexMap;

pub use filter_cache::FilterCache;
pub use query_cache::QueryCache;

/// Key-value storage seam for filter persistence
///
/// Injected explicitly instead of reaching for an ambient global store, so
/// hosts can plug in whatever session-scoped storage they have and tests can
/// substitute doubles. Values are opaque strings; serialization is the
/// caller's concern.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`, if any
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory session-scoped storage
///
/// The default adapter for native hosts and tests. Keys keep insertion
/// order, matching how browser storage enumerates entries.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: RwLock<IndexMap<String, String>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceAdapter for SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {}", e))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {}", e))?;

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {}", e))?;

        entries.shift_remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let store = SessionStore::new();
        store.set("warehouse-filters", "{}").unwrap();

        assert_eq!(
            store.get("warehouse-filters").unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_key() {
        let store = SessionStore::new();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let store = SessionStore::new();
        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        store.set("k", "a").unwrap();
        store.remove("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());

        // Removing an absent key is not an error
        store.remove("k").unwrap();
    }
}
