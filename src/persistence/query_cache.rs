//! Short-lived cache of list query results
//!
//! Keyed by the serialized wire filter object, so two requests hit the same
//! entry exactly when their filters are structurally identical. Entries stay
//! valid for a few minutes; the point is to skip a network round-trip when a
//! user navigates back to a list they just saw, not to be a data store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::core::query::Paginated;

/// Default freshness window for cached pages
pub const DEFAULT_QUERY_CACHE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

struct CachedPage<T> {
    page: Paginated<T>,
    stored_at_ms: i64,
}

/// In-memory page cache for one entity's list query
pub struct QueryCache<T> {
    entries: RwLock<HashMap<String, CachedPage<T>>>,
    max_age: Duration,
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_CACHE_MAX_AGE)
    }
}

impl<T: Clone> QueryCache<T> {
    /// Create a cache with the given freshness window
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_age,
        }
    }

    /// Cache key for a wire filter object
    ///
    /// `None` when the filters cannot be serialized, in which case the
    /// caller simply skips the cache.
    pub fn key_for<F: Serialize>(filters: &F) -> Option<String> {
        serde_json::to_string(filters).ok()
    }

    /// Fresh cached page for `key`, if any
    ///
    /// A stale entry is removed on the way out and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Paginated<T>> {
        let now_ms = Utc::now().timestamp_millis();

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            let cached = entries.get(key)?;
            let age_ms = now_ms - cached.stored_at_ms;
            if age_ms >= 0 && age_ms as u128 <= self.max_age.as_millis() {
                return Some(cached.page.clone());
            }
        }

        tracing::debug!(key, "evicting stale cached page");
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        None
    }

    /// Store a page under `key`, replacing any previous entry
    pub fn put(&self, key: String, page: Paginated<T>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CachedPage {
                page,
                stored_at_ms: Utc::now().timestamp_millis(),
            },
        );
    }

    /// Drop the entry under `key`, if any
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}
