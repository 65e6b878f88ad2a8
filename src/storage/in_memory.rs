//! In-memory implementation of the backend query capability
//!
//! Useful for testing and development: the full list semantics (search,
//! facets, deleted visibility, sort, pagination) over an in-process
//! collection, plus latency and failure injection for exercising bindings.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::backend::{ListBackend, ListFilters};
use crate::core::error::QueryError;
use crate::core::filter::SortOrder;
use crate::core::query::{DEFAULT_PAGE_LIMIT, PageMeta, Paginated, clamp_limit, clamp_page};
use crate::entities::container::{Container, ContainerFilters};
use crate::entities::item::{Item, ItemFilters};
use crate::entities::warehouse::{Warehouse, WarehouseFilters};

/// Case-insensitive substring match
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Row type an [`InMemoryBackend`] can serve for the filter type `F`
pub trait Queryable<F>: Clone + Send + Sync + 'static {
    /// Whether this row passes the search term and facets in `filters`
    /// (deleted visibility is applied separately by the backend)
    fn matches(&self, filters: &F) -> bool;

    /// Whether this row is soft-deleted
    fn is_deleted(&self) -> bool;

    /// Ascending comparison on the sort field `filters` selects
    fn sort_cmp(&self, other: &Self, filters: &F) -> Ordering;
}

/// In-memory list backend
///
/// Thread-safe behind `RwLock`; rows are cloned out on every query.
pub struct InMemoryBackend<T, F> {
    rows: RwLock<Vec<T>>,
    latency: RwLock<Option<Duration>>,
    fail_with: RwLock<Option<QueryError>>,
    _marker: PhantomData<fn(F)>,
}

impl<T, F> Default for InMemoryBackend<T, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> InMemoryBackend<T, F> {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            latency: RwLock::new(None),
            fail_with: RwLock::new(None),
            _marker: PhantomData,
        }
    }

    /// Create a backend pre-loaded with rows
    pub fn with_rows(rows: Vec<T>) -> Self {
        let backend = Self::new();
        *backend.rows.write().unwrap_or_else(|e| e.into_inner()) = rows;
        backend
    }

    /// Append a row
    pub fn insert(&self, row: T) {
        self.rows
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(row);
    }

    /// Replace all rows
    pub fn set_rows(&self, rows: Vec<T>) {
        *self.rows.write().unwrap_or_else(|e| e.into_inner()) = rows;
    }

    /// Delay every query by `latency` (simulates a slow transport)
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    /// Make every query fail with `error` until cleared with `None`
    pub fn fail_with(&self, error: Option<QueryError>) {
        *self.fail_with.write().unwrap_or_else(|e| e.into_inner()) = error;
    }
}

#[async_trait]
impl<T, F> ListBackend<F> for InMemoryBackend<T, F>
where
    T: Queryable<F>,
    F: ListFilters,
{
    type Item = T;

    async fn list(&self, filters: &F) -> Result<Paginated<T>, QueryError> {
        let latency = *self.latency.read().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .fail_with
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let visibility = filters.deleted_visibility();
        let mut hits: Vec<T> = self
            .rows
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|row| visibility.admits(row.is_deleted()) && row.matches(filters))
            .cloned()
            .collect();

        hits.sort_by(|a, b| {
            let ordering = a.sort_cmp(b, filters);
            match filters.sort_order() {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let page = clamp_page(filters.page().unwrap_or(1));
        let limit = clamp_limit(filters.limit().unwrap_or(DEFAULT_PAGE_LIMIT));
        let total = hits.len() as u64;

        let start = ((page - 1) * limit) as usize;
        let items: Vec<T> = hits
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        let item_count = items.len() as u32;

        Ok(Paginated {
            meta: PageMeta::new(page, limit, total, item_count),
            items,
        })
    }
}

impl Queryable<WarehouseFilters> for Warehouse {
    fn matches(&self, filters: &WarehouseFilters) -> bool {
        if let Some(search) = &filters.search {
            let hit = contains_ci(&self.name, search)
                || contains_ci(&self.location, search)
                || self
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, search));
            if !hit {
                return false;
            }
        }

        if let Some(kind) = filters.warehouse_type {
            if self.warehouse_type != kind {
                return false;
            }
        }

        true
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn sort_cmp(&self, other: &Self, filters: &WarehouseFilters) -> Ordering {
        use crate::entities::warehouse::WarehouseSortField::*;

        match filters.sort_by.unwrap_or_default() {
            CreatedAt => self.created_at.cmp(&other.created_at),
            UpdatedAt => self.updated_at.cmp(&other.updated_at),
            Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            Type => self
                .warehouse_type
                .as_str()
                .cmp(other.warehouse_type.as_str()),
        }
    }
}

impl Queryable<ContainerFilters> for Container {
    fn matches(&self, filters: &ContainerFilters) -> bool {
        if let Some(search) = &filters.search {
            let hit = contains_ci(&self.code, search)
                || contains_ci(&self.name, search)
                || self
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, search));
            if !hit {
                return false;
            }
        }

        if let Some(status) = filters.status {
            if self.status != status {
                return false;
            }
        }

        true
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn sort_cmp(&self, other: &Self, filters: &ContainerFilters) -> Ordering {
        use crate::entities::container::ContainerSortField::*;

        match filters.sort_by.unwrap_or_default() {
            CreatedAt => self.created_at.cmp(&other.created_at),
            UpdatedAt => self.updated_at.cmp(&other.updated_at),
            Code => self.code.to_lowercase().cmp(&other.code.to_lowercase()),
            Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            Status => self.status.as_str().cmp(other.status.as_str()),
        }
    }
}

impl Queryable<ItemFilters> for Item {
    fn matches(&self, filters: &ItemFilters) -> bool {
        if let Some(search) = &filters.search {
            let hit = contains_ci(&self.code, search)
                || contains_ci(&self.name, search)
                || self.brand.as_deref().is_some_and(|b| contains_ci(b, search))
                || self
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, search));
            if !hit {
                return false;
            }
        }

        if let Some(min_price) = filters.min_price {
            if self.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = filters.max_price {
            if self.price > max_price {
                return false;
            }
        }
        if let Some(category_id) = filters.item_category_id {
            if self.item_category.as_ref().map(|c| c.id) != Some(category_id) {
                return false;
            }
        }

        true
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn sort_cmp(&self, other: &Self, filters: &ItemFilters) -> Ordering {
        use crate::entities::item::ItemSortField::*;

        match filters.sort_by.unwrap_or_default() {
            CreatedAt => self.created_at.cmp(&other.created_at),
            UpdatedAt => self.updated_at.cmp(&other.updated_at),
            Code => self.code.to_lowercase().cmp(&other.code.to_lowercase()),
            Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            Brand => self
                .brand
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .cmp(&other.brand.as_deref().unwrap_or("").to_lowercase()),
            Price => self.price.total_cmp(&other.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::entities::warehouse::{WarehouseSortField, WarehouseType};

    fn warehouse(id: i64, name: &str, kind: WarehouseType, deleted: bool) -> Warehouse {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(id);

        Warehouse {
            id,
            name: name.to_string(),
            description: None,
            location: format!("Zona {id}"),
            warehouse_type: kind,
            is_active: !deleted,
            warehouse_locations: None,
            created_at: created,
            updated_at: created,
            deleted_at: deleted.then(|| created + chrono::Duration::days(1)),
            created_by_id: 1,
            updated_by_id: 1,
            deleted_by_id: deleted.then_some(1),
            restored_by_id: None,
        }
    }

    fn seeded() -> InMemoryBackend<Warehouse, WarehouseFilters> {
        InMemoryBackend::with_rows(vec![
            warehouse(1, "Central", WarehouseType::Main, false),
            warehouse(2, "Anexo norte", WarehouseType::Auxiliary, false),
            warehouse(3, "Obra sur", WarehouseType::Site, false),
            warehouse(4, "Anexo viejo", WarehouseType::Auxiliary, true),
        ])
    }

    #[tokio::test]
    async fn test_default_filters_hide_deleted() {
        let backend = seeded();
        let page = backend.list(&WarehouseFilters::default()).await.unwrap();

        assert_eq!(page.meta.total_items, 3);
        assert!(page.items.iter().all(|w| !w.is_deleted()));
        // Default sort: createdAt DESC
        assert_eq!(page.items[0].id, 3);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let backend = seeded();
        let filters = WarehouseFilters {
            search: Some("ANEXO".to_string()),
            ..Default::default()
        };

        let page = backend.list(&filters).await.unwrap();
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.items[0].name, "Anexo norte");
    }

    #[tokio::test]
    async fn test_type_facet() {
        let backend = seeded();
        let filters = WarehouseFilters {
            warehouse_type: Some(WarehouseType::Auxiliary),
            ..Default::default()
        };

        let page = backend.list(&filters).await.unwrap();
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.items[0].id, 2);
    }

    #[tokio::test]
    async fn test_with_deleted_includes_everything() {
        let backend = seeded();
        let filters = WarehouseFilters {
            with_deleted: Some(true),
            ..Default::default()
        };

        let page = backend.list(&filters).await.unwrap();
        assert_eq!(page.meta.total_items, 4);
    }

    #[tokio::test]
    async fn test_only_deleted_wins_over_with_deleted() {
        let backend = seeded();
        let filters = WarehouseFilters {
            with_deleted: Some(true),
            only_deleted: Some(true),
            ..Default::default()
        };

        let page = backend.list(&filters).await.unwrap();
        assert_eq!(page.meta.total_items, 1);
        assert!(page.items[0].is_deleted());
    }

    #[tokio::test]
    async fn test_sort_by_name_asc() {
        let backend = seeded();
        let filters = WarehouseFilters {
            sort_by: Some(WarehouseSortField::Name),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        };

        let page = backend.list(&filters).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Anexo norte", "Central", "Obra sur"]);
    }

    #[tokio::test]
    async fn test_pagination_slices_and_reports_meta() {
        let rows: Vec<Warehouse> = (1..=45)
            .map(|i| warehouse(i, &format!("Almacén {i}"), WarehouseType::Main, false))
            .collect();
        let backend = InMemoryBackend::with_rows(rows);

        let filters = WarehouseFilters::default().with_page(3, 20);
        let page = backend.list(&filters).await.unwrap();

        assert_eq!(page.meta.total_items, 45);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.current_page, 3);
        assert_eq!(page.meta.item_count, 5);
        assert_eq!(page.items.len(), 5);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = seeded();
        backend.fail_with(Some(QueryError::backend(["no disponible"])));

        let result = backend.list(&WarehouseFilters::default()).await;
        assert_eq!(result.unwrap_err().joined_message(), "no disponible");

        backend.fail_with(None);
        assert!(backend.list(&WarehouseFilters::default()).await.is_ok());
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Almacén Central", "central"));
        assert!(contains_ci("Almacén Central", "ALMACÉN"));
        assert!(!contains_ci("Almacén Central", "norte"));
    }
}
