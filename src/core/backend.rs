//! The backend query capability consumed by list bindings
//!
//! This is the only seam between the filter/cache core and the outside
//! world's data layer. GraphQL transport, auth headers and routing live
//! behind implementations of [`ListBackend`]; the core never sees them.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::error::QueryError;
use crate::core::filter::{DeletedVisibility, SortOrder};
use crate::core::query::Paginated;

/// Wire filter object for a paginated list query
///
/// Implemented by each entity's projected filters. Gives backends and
/// bindings uniform access to the fields every entity shares: paging,
/// deleted visibility and sort direction.
pub trait ListFilters: Clone + PartialEq + Serialize + Send + Sync + 'static {
    /// Return a copy of these filters with paging fields set
    fn with_page(self, page: u32, limit: u32) -> Self;

    /// Requested page, if any
    fn page(&self) -> Option<u32>;

    /// Requested page size, if any
    fn limit(&self) -> Option<u32>;

    /// Resolved soft-delete visibility policy
    fn deleted_visibility(&self) -> DeletedVisibility;

    /// Requested sort direction, falling back to the default
    fn sort_order(&self) -> SortOrder;
}

/// A paginated list query against the backend
///
/// Implementations are storage-agnostic from the core's point of view: an
/// in-process collection, a GraphQL client or an HTTP API all look the same
/// through this trait.
#[async_trait]
pub trait ListBackend<F: ListFilters>: Send + Sync + 'static {
    /// The entity type this backend lists
    type Item: Clone + Send + Sync + 'static;

    /// Execute the list query with the given wire filters
    async fn list(&self, filters: &F) -> Result<Paginated<Self::Item>, QueryError>;
}
