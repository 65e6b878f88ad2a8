//! Versioned filter snapshots with a freshness window
//!
//! Lets a list view restore its filter state after same-tab navigation
//! without a backend round-trip. Snapshots carry a version tag so stale
//! layouts from older builds are discarded instead of deserialized.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceAdapter;

/// Default freshness window for persisted filter snapshots
pub const DEFAULT_FILTER_CACHE_MAX_AGE: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<F> {
    version: String,
    filters: F,
    timestamp: i64,
}

/// Persisted filter snapshot store for one list view
///
/// `save` stamps the snapshot with the current epoch milliseconds; `load`
/// yields it back only while it is fresh and version-matching, deleting the
/// entry otherwise. Storage failures never propagate: they are logged and
/// the operation degrades to a no-op.
pub struct FilterCache<F> {
    adapter: Arc<dyn PersistenceAdapter>,
    key: String,
    version: String,
    max_age: Duration,
    _marker: PhantomData<fn() -> F>,
}

impl<F> FilterCache<F> {
    /// Create a cache under a fixed storage key with a version tag
    pub fn new(
        adapter: Arc<dyn PersistenceAdapter>,
        key: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            key: key.into(),
            version: version.into(),
            max_age: DEFAULT_FILTER_CACHE_MAX_AGE,
            _marker: PhantomData,
        }
    }

    /// Override the freshness window
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Write a timestamped, versioned snapshot of `filters`
    pub fn save(&self, filters: &F)
    where
        F: Serialize,
    {
        let snapshot = Snapshot {
            version: self.version.clone(),
            filters,
            timestamp: Utc::now().timestamp_millis(),
        };

        let serialized = match serde_json::to_string(&snapshot) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to serialize filter snapshot");
                return;
            }
        };

        if let Err(error) = self.adapter.set(&self.key, &serialized) {
            tracing::warn!(key = %self.key, %error, "failed to persist filter snapshot");
        }
    }

    /// Read back the stored filters
    ///
    /// Returns `None` when the entry is absent, unreadable, from another
    /// version, or older than the freshness window; everything but plain
    /// absence also deletes the entry.
    pub fn load(&self) -> Option<F>
    where
        F: DeserializeOwned,
    {
        let raw = match self.adapter.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to read filter snapshot");
                return None;
            }
        };

        let snapshot: Snapshot<F> = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                // A corrupted entry is treated identically to an absent one
                tracing::warn!(key = %self.key, %error, "discarding unreadable filter snapshot");
                self.clear();
                return None;
            }
        };

        if snapshot.version != self.version {
            tracing::debug!(
                key = %self.key,
                stored = %snapshot.version,
                current = %self.version,
                "discarding filter snapshot from another version"
            );
            self.clear();
            return None;
        }

        let age_ms = Utc::now().timestamp_millis() - snapshot.timestamp;
        if age_ms < 0 || age_ms as u128 > self.max_age.as_millis() {
            tracing::debug!(key = %self.key, age_ms, "discarding expired filter snapshot");
            self.clear();
            return None;
        }

        Some(snapshot.filters)
    }

    /// Remove the entry unconditionally
    pub fn clear(&self) {
        if let Err(error) = self.adapter.remove(&self.key) {
            tracing::warn!(key = %self.key, %error, "failed to clear filter snapshot");
        }
    }
}
