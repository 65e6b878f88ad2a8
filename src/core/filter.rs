//! Filter state abstractions shared by every entity list view
//!
//! Each list view owns a UI-facing filter state (search text, facets,
//! deleted-visibility flags, sort) and projects it into the minimal wire
//! object its backend query accepts. The [`FilterSet`] trait captures that
//! contract once so the store and binding stay entity-agnostic.

use serde::{Deserialize, Serialize};

/// Sort direction, `DESC` by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,

    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

/// Normalize a search term: trim whitespace, and treat an empty result as
/// "no search" rather than storing an empty string
pub fn normalize_search(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolved soft-delete visibility for a list query
///
/// `withDeleted` and `onlyDeleted` are independent flags with no enforced
/// mutual exclusion: both may be true at once. The documented resolution is
/// that `onlyDeleted` takes precedence, so backends apply a single policy
/// instead of re-deriving it from raw flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedVisibility {
    /// Only entities that have not been soft-deleted (the default)
    ActiveOnly,

    /// Deleted and non-deleted entities alike
    WithDeleted,

    /// Only soft-deleted entities
    OnlyDeleted,
}

impl DeletedVisibility {
    /// Resolve the two raw flags into one policy. `onlyDeleted` wins when
    /// both flags are set.
    pub fn resolve(with_deleted: bool, only_deleted: bool) -> Self {
        if only_deleted {
            DeletedVisibility::OnlyDeleted
        } else if with_deleted {
            DeletedVisibility::WithDeleted
        } else {
            DeletedVisibility::ActiveOnly
        }
    }

    /// Whether an entity with the given deletion state passes this policy
    pub fn admits(self, is_deleted: bool) -> bool {
        match self {
            DeletedVisibility::ActiveOnly => !is_deleted,
            DeletedVisibility::WithDeleted => true,
            DeletedVisibility::OnlyDeleted => is_deleted,
        }
    }
}

/// UI-facing filter state for one entity list view
///
/// Implementations hold the current search term, entity-specific facets,
/// deleted-visibility flags, and sort selection. `sortBy`/`sortOrder` are
/// always present once the state exists; every other field is absent
/// (`None`/`false`) when inactive.
///
/// Every operation touches exactly the fields it names: applying an update
/// never mutates an unrelated field, and resetting facets never touches the
/// search term.
pub trait FilterSet:
    Clone + Default + PartialEq + Serialize + Send + Sync + 'static
{
    /// The wire filter object the backend query accepts
    type Backend: crate::core::backend::ListFilters;

    /// Typed single-field update, one variant per settable facet
    type Update: Send + 'static;

    /// Current raw search term
    fn search(&self) -> Option<&str>;

    /// Replace the search term (already normalized by the caller)
    fn set_search(&mut self, term: Option<String>);

    /// Set exactly one field, leaving all others untouched
    fn apply(&mut self, update: Self::Update);

    /// Reset every field except `search` to its default
    fn reset_facets(&mut self);

    /// True iff any non-search field differs from its default
    fn has_active_facets(&self) -> bool;

    /// Project this state into the wire filter object, substituting the
    /// debounced search term for the raw one and omitting default-valued
    /// fields. Paging is left unset; the binding fills it per request.
    fn project(&self, debounced_search: Option<&str>) -> Self::Backend;
}
