//! Container entity and filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::backend::ListFilters;
use crate::core::filter::{DeletedVisibility, FilterSet, SortOrder};

/// Container lifecycle status as the backend spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerStatus {
    #[serde(rename = "DISPONIBLE")]
    Available,

    #[serde(rename = "INACTIVO")]
    Inactive,

    #[serde(rename = "EN REVISIÓN")]
    InReview,

    #[serde(rename = "ASIGNADO")]
    Assigned,
}

impl ContainerStatus {
    /// The wire spelling of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Available => "DISPONIBLE",
            ContainerStatus::Inactive => "INACTIVO",
            ContainerStatus::InReview => "EN REVISIÓN",
            ContainerStatus::Assigned => "ASIGNADO",
        }
    }
}

/// Lightweight reference to an item stored inside a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ContainerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_items: Option<Vec<InventoryItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_by_id: i64,
    pub updated_by_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_by_id: Option<i64>,
}

impl Container {
    /// Check if the container has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Sortable container fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContainerSortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,

    #[serde(rename = "updatedAt")]
    UpdatedAt,

    #[serde(rename = "code")]
    Code,

    #[serde(rename = "name")]
    Name,

    #[serde(rename = "status")]
    Status,
}

/// UI-facing container filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerFilterState {
    pub search: Option<String>,
    pub status: Option<ContainerStatus>,
    pub with_deleted: bool,
    pub only_deleted: bool,
    pub sort_by: ContainerSortField,
    pub sort_order: SortOrder,
}

impl Default for ContainerFilterState {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            with_deleted: false,
            only_deleted: false,
            sort_by: ContainerSortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Wire filters for the container list query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContainerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ContainerSortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ListFilters for ContainerFilters {
    fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    fn page(&self) -> Option<u32> {
        self.page
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn deleted_visibility(&self) -> DeletedVisibility {
        DeletedVisibility::resolve(
            self.with_deleted.unwrap_or(false),
            self.only_deleted.unwrap_or(false),
        )
    }

    fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }
}

/// Typed single-field update for [`ContainerFilterState`]
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerFilterUpdate {
    Status(Option<ContainerStatus>),
    WithDeleted(bool),
    OnlyDeleted(bool),
    SortBy(ContainerSortField),
    SortOrder(SortOrder),
}

impl FilterSet for ContainerFilterState {
    type Backend = ContainerFilters;
    type Update = ContainerFilterUpdate;

    fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn set_search(&mut self, term: Option<String>) {
        self.search = term;
    }

    fn apply(&mut self, update: ContainerFilterUpdate) {
        match update {
            ContainerFilterUpdate::Status(value) => self.status = value,
            ContainerFilterUpdate::WithDeleted(value) => self.with_deleted = value,
            ContainerFilterUpdate::OnlyDeleted(value) => self.only_deleted = value,
            ContainerFilterUpdate::SortBy(value) => self.sort_by = value,
            ContainerFilterUpdate::SortOrder(value) => self.sort_order = value,
        }
    }

    fn reset_facets(&mut self) {
        let search = self.search.take();
        *self = Self {
            search,
            ..Self::default()
        };
    }

    fn has_active_facets(&self) -> bool {
        self.status.is_some()
            || self.with_deleted
            || self.only_deleted
            || self.sort_by != ContainerSortField::CreatedAt
            || self.sort_order != SortOrder::Desc
    }

    fn project(&self, debounced_search: Option<&str>) -> ContainerFilters {
        ContainerFilters {
            search: debounced_search.map(str::to_string),
            status: self.status,
            with_deleted: self.with_deleted.then_some(true),
            only_deleted: self.only_deleted.then_some(true),
            page: None,
            limit: None,
            sort_by: (self.sort_by != ContainerSortField::CreatedAt).then_some(self.sort_by),
            sort_order: (self.sort_order != SortOrder::Desc).then_some(self.sort_order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_spelling() {
        assert_eq!(
            serde_json::to_value(ContainerStatus::InReview).unwrap(),
            serde_json::json!("EN REVISIÓN")
        );
        assert_eq!(
            serde_json::to_value(ContainerStatus::Available).unwrap(),
            serde_json::json!("DISPONIBLE")
        );
    }

    #[test]
    fn test_projection_omits_defaults() {
        let projected = ContainerFilterState::default().project(None);
        assert_eq!(
            serde_json::to_value(&projected).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn test_status_facet_projects() {
        let mut state = ContainerFilterState::default();
        state.apply(ContainerFilterUpdate::Status(Some(
            ContainerStatus::Assigned,
        )));

        assert!(state.has_active_facets());
        let projected = state.project(None);
        assert_eq!(projected.status, Some(ContainerStatus::Assigned));
    }

    #[test]
    fn test_sort_only_projects_when_non_default() {
        let mut state = ContainerFilterState::default();
        state.apply(ContainerFilterUpdate::SortBy(ContainerSortField::Code));

        let projected = state.project(None);
        assert_eq!(projected.sort_by, Some(ContainerSortField::Code));
        assert_eq!(projected.sort_order, None);
    }
}
