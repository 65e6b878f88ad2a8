//! # Lista
//!
//! Headless filter/cache state machinery for paginated entity list views.
//!
//! ## Features
//!
//! - **Filter State Stores**: per-view filter state with typed single-field
//!   updates, search normalization, and derived activity flags
//! - **Trailing-Edge Debounce**: keystroke churn never reaches the backend
//! - **Backend Filter Projection**: minimal wire filter objects, defaults
//!   omitted, memoized per structural key
//! - **List Query Bindings**: loading/error/pagination state, appending
//!   page loads, abort + generation-guarded cancellation
//! - **Persistence Side Channel**: versioned filter snapshots and a
//!   short-lived query-result cache behind an injected adapter
//! - **Soft Delete Visibility**: independent `withDeleted`/`onlyDeleted`
//!   flags resolved through a single documented policy
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lista::prelude::*;
//!
//! // A store owns the UI filter state for one list view
//! let config = ClientConfig::default();
//! let store: FilterStore<WarehouseFilterState> = FilterStore::new(config.debounce());
//!
//! // A binding runs the paginated query against any ListBackend
//! let backend = Arc::new(InMemoryBackend::with_rows(rows));
//! let query = ListQuery::with_limit(backend, config.default_limit);
//!
//! store.update_search("  norte ");
//! query.mount((*store.backend_filters()).clone());
//!
//! // After the debounce settles, push the new projection
//! query.sync_filters(&store.backend_filters());
//! let snapshot = query.settled().await;
//! assert!(!snapshot.is_empty());
//! ```

pub mod binding;
pub mod config;
pub mod core;
pub mod entities;
pub mod persistence;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        backend::{ListBackend, ListFilters},
        debounce::Debounced,
        error::{ConfigError, ListError, PersistenceError, QueryError},
        filter::{DeletedVisibility, FilterSet, SortOrder, normalize_search},
        query::{PageInfo, PageMeta, Paginated},
        store::FilterStore,
    };

    // === Binding ===
    pub use crate::binding::{ListQuery, ListSnapshot, QueryPhase};

    // === Entities ===
    pub use crate::entities::{
        Container, ContainerFilterState, ContainerFilterUpdate, ContainerFilters,
        ContainerSortField, ContainerStatus, InventoryItem, Item, ItemCategory, ItemFilterState,
        ItemFilterUpdate, ItemFilters, ItemSortField, Warehouse, WarehouseFilterState,
        WarehouseFilterUpdate, WarehouseFilters, WarehouseLocation, WarehouseSortField,
        WarehouseType,
    };

    // === Persistence ===
    pub use crate::persistence::{FilterCache, PersistenceAdapter, QueryCache, SessionStore};

    // === Storage ===
    pub use crate::storage::{InMemoryBackend, Queryable};

    // === Config ===
    pub use crate::config::ClientConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
