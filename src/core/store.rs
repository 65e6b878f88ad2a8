//! Filter state store
//!
//! Owns the UI-facing filter state for one list view: immediate field
//! updates, search normalization and debouncing, derived activity flags, and
//! the memoized projection into wire filters. Optionally mirrors state into
//! a persistence cache so same-tab navigation can restore it.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::core::debounce::Debounced;
use crate::core::filter::{FilterSet, normalize_search};
use crate::persistence::FilterCache;

/// State store for one entity list view
///
/// Exclusively owned by the view that created it; the persistence cache is a
/// side channel for same-tab navigation continuity, not a source of truth.
///
/// All update operations are pure with respect to fields they don't name.
pub struct FilterStore<F: FilterSet> {
    state: RwLock<F>,
    debounced_search: Debounced<Option<String>>,
    projection: RwLock<Option<(String, Arc<F::Backend>)>>,
    cache: Option<FilterCache<F>>,
    version: watch::Sender<u64>,
}

impl<F: FilterSet> FilterStore<F> {
    /// Create a store with default filter state
    pub fn new(debounce: Duration) -> Self {
        Self::build(F::default(), debounce, None)
    }

    /// Create a store seeded with the given state
    pub fn with_initial(initial: F, debounce: Duration) -> Self {
        Self::build(initial, debounce, None)
    }

    /// Create a store backed by a persistence cache
    ///
    /// A fresh, version-matching snapshot pre-seeds the state; afterwards
    /// every state change is mirrored back into the cache.
    pub fn with_persistence(cache: FilterCache<F>, debounce: Duration) -> Self
    where
        F: DeserializeOwned,
    {
        let initial = cache.load().unwrap_or_default();
        Self::build(initial, debounce, Some(cache))
    }

    fn build(initial: F, debounce: Duration, cache: Option<FilterCache<F>>) -> Self {
        // A seeded search term starts out already settled, so the first
        // projection reflects it without waiting out the debounce interval
        let seeded_search = initial.search().map(str::to_string);
        let (version, _) = watch::channel(0);

        Self {
            state: RwLock::new(initial),
            debounced_search: Debounced::new(seeded_search, debounce),
            projection: RwLock::new(None),
            cache,
            version,
        }
    }

    fn mutate(&self, op: impl FnOnce(&mut F)) {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            op(&mut state);
            if let Some(cache) = &self.cache {
                cache.save(&state);
            }
        }
        self.version.send_modify(|v| *v += 1);
    }

    /// Snapshot of the current UI filter state
    pub fn filters(&self) -> F {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Set exactly one field, leaving all others untouched
    pub fn apply(&self, update: F::Update) {
        self.mutate(|state| state.apply(update));
    }

    /// Update the search term from raw input
    ///
    /// The term is trimmed; empty input clears the search entirely. The
    /// immediate state updates synchronously while the debounced copy feeds
    /// the backend projection.
    pub fn update_search(&self, term: &str) {
        let normalized = normalize_search(term);
        self.mutate(|state| state.set_search(normalized.clone()));
        self.debounced_search.push(normalized);
    }

    /// Reset every field except `search` to its default
    pub fn clear_filters(&self) {
        self.mutate(|state| state.reset_facets());
    }

    /// Clear the search term, leaving all other fields untouched
    pub fn clear_search(&self) {
        self.mutate(|state| state.set_search(None));
        self.debounced_search.push(None);
    }

    /// Reset the entire state, including `search`, to defaults
    pub fn clear_all(&self) {
        self.mutate(|state| *state = F::default());
        self.debounced_search.push(None);
    }

    /// True iff any non-search field differs from its default
    pub fn has_active_filters(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_active_facets()
    }

    /// True iff a search term is set
    pub fn has_active_search(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .search()
            .is_some()
    }

    /// The settled (debounced) search term
    pub fn debounced_search(&self) -> Option<String> {
        self.debounced_search.current()
    }

    /// Subscribe to settled search terms
    pub fn subscribe_search(&self) -> watch::Receiver<Option<String>> {
        self.debounced_search.subscribe()
    }

    /// Subscribe to state-change notifications (a bumped version number)
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Project the current state into wire filters
    ///
    /// Uses the debounced search term, never the raw one. The projection is
    /// memoized on the structural key of its inputs: while neither the state
    /// nor the settled search has changed, callers get clones of the same
    /// `Arc`, so reference comparison stays meaningful downstream.
    pub fn backend_filters(&self) -> Arc<F::Backend> {
        let state = self.filters();
        let debounced = self.debounced_search.current();

        let Ok(key) = serde_json::to_string(&(&state, &debounced)) else {
            // Unkeyable state: fall back to an unmemoized projection
            return Arc::new(state.project(debounced.as_deref()));
        };

        {
            let memo = self.projection.read().unwrap_or_else(|e| e.into_inner());
            if let Some((cached_key, cached)) = memo.as_ref() {
                if *cached_key == key {
                    return cached.clone();
                }
            }
        }

        let projected = Arc::new(state.project(debounced.as_deref()));
        let mut memo = self.projection.write().unwrap_or_else(|e| e.into_inner());
        *memo = Some((key, projected.clone()));
        projected
    }

    /// Drop any persisted snapshot for this store
    pub fn clear_persisted(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}
