//! Warehouse entity and filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::backend::ListFilters;
use crate::core::filter::{DeletedVisibility, FilterSet, SortOrder};

/// Warehouse kind as the backend spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarehouseType {
    #[serde(rename = "MAIN")]
    Main,

    #[serde(rename = "AUXILIAR")]
    Auxiliary,

    #[serde(rename = "SITE")]
    Site,
}

impl WarehouseType {
    /// The wire spelling of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseType::Main => "MAIN",
            WarehouseType::Auxiliary => "AUXILIAR",
            WarehouseType::Site => "SITE",
        }
    }
}

/// A storage location inside a warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseLocation {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub warehouse_type: WarehouseType,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_locations: Option<Vec<WarehouseLocation>>,
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

impl Warehouse {
    /// Check if the warehouse has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Sortable warehouse fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WarehouseSortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,

    #[serde(rename = "updatedAt")]
    UpdatedAt,

    #[serde(rename = "name")]
    Name,

    #[serde(rename = "type")]
    Type,
}

/// UI-facing warehouse filter state
///
/// `sort_by`/`sort_order` are always present; every other field is absent
/// when inactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseFilterState {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub warehouse_type: Option<WarehouseType>,
    pub with_deleted: bool,
    pub only_deleted: bool,
    pub sort_by: WarehouseSortField,
    pub sort_order: SortOrder,
}

impl Default for WarehouseFilterState {
    fn default() -> Self {
        Self {
            search: None,
            warehouse_type: None,
            with_deleted: false,
            only_deleted: false,
            sort_by: WarehouseSortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Wire filters for the warehouse list query
///
/// Only fields that differ from their defaults are present; paging is set by
/// the binding per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub warehouse_type: Option<WarehouseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<WarehouseSortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ListFilters for WarehouseFilters {
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

/// Typed single-field update for [`WarehouseFilterState`]
#[derive(Debug, Clone, PartialEq)]
pub enum WarehouseFilterUpdate {
    Type(Option<WarehouseType>),
    WithDeleted(bool),
    OnlyDeleted(bool),
    SortBy(WarehouseSortField),
    SortOrder(SortOrder),
}

impl FilterSet for WarehouseFilterState {
    type Backend = WarehouseFilters;
    type Update = WarehouseFilterUpdate;

    fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn set_search(&mut self, term: Option<String>) {
        self.search = term;
    }

    fn apply(&mut self, update: WarehouseFilterUpdate) {
        match update {
            WarehouseFilterUpdate::Type(value) => self.warehouse_type = value,
            WarehouseFilterUpdate::WithDeleted(value) => self.with_deleted = value,
            WarehouseFilterUpdate::OnlyDeleted(value) => self.only_deleted = value,
            WarehouseFilterUpdate::SortBy(value) => self.sort_by = value,
            WarehouseFilterUpdate::SortOrder(value) => self.sort_order = value,
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
        self.warehouse_type.is_some()
            || self.with_deleted
            || self.only_deleted
            || self.sort_by != WarehouseSortField::CreatedAt
            || self.sort_order != SortOrder::Desc
    }

    fn project(&self, debounced_search: Option<&str>) -> WarehouseFilters {
        WarehouseFilters {
            search: debounced_search.map(str::to_string),
            warehouse_type: self.warehouse_type,
            with_deleted: self.with_deleted.then_some(true),
            only_deleted: self.only_deleted.then_some(true),
            page: None,
            limit: None,
            sort_by: (self.sort_by != WarehouseSortField::CreatedAt).then_some(self.sort_by),
            sort_order: (self.sort_order != SortOrder::Desc).then_some(self.sort_order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_omits_defaults() {
        let state = WarehouseFilterState::default();
        let projected = state.project(None);

        assert_eq!(projected, WarehouseFilters::default());
        let json = serde_json::to_value(&projected).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_projection_uses_debounced_search() {
        let state = WarehouseFilterState {
            search: Some("raw keystrokes".to_string()),
            ..Default::default()
        };

        let projected = state.project(Some("battery"));
        assert_eq!(projected.search.as_deref(), Some("battery"));
    }

    #[test]
    fn test_projection_carries_non_default_fields() {
        let state = WarehouseFilterState {
            warehouse_type: Some(WarehouseType::Main),
            with_deleted: true,
            sort_by: WarehouseSortField::Name,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };

        let projected = state.project(None);
        assert_eq!(projected.warehouse_type, Some(WarehouseType::Main));
        assert_eq!(projected.with_deleted, Some(true));
        assert_eq!(projected.only_deleted, None);
        assert_eq!(projected.sort_by, Some(WarehouseSortField::Name));
        assert_eq!(projected.sort_order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_apply_touches_exactly_one_field() {
        let mut state = WarehouseFilterState {
            search: Some("dock".to_string()),
            ..Default::default()
        };

        state.apply(WarehouseFilterUpdate::WithDeleted(true));
        assert!(state.with_deleted);
        assert!(!state.only_deleted);
        assert_eq!(state.search.as_deref(), Some("dock"));
        assert_eq!(state.warehouse_type, None);

        // Setting onlyDeleted does not clear withDeleted
        state.apply(WarehouseFilterUpdate::OnlyDeleted(true));
        assert!(state.with_deleted);
        assert!(state.only_deleted);
    }

    #[test]
    fn test_reset_facets_preserves_search() {
        let mut state = WarehouseFilterState {
            search: Some("dock".to_string()),
            warehouse_type: Some(WarehouseType::Site),
            only_deleted: true,
            sort_by: WarehouseSortField::Name,
            sort_order: SortOrder::Asc,
            with_deleted: true,
        };

        state.reset_facets();
        assert_eq!(state.search.as_deref(), Some("dock"));
        assert!(!state.has_active_facets());
    }

    #[test]
    fn test_wire_spelling() {
        let json = serde_json::to_value(WarehouseType::Auxiliary).unwrap();
        assert_eq!(json, serde_json::json!("AUXILIAR"));

        let filters = WarehouseFilterState::default().project(Some("a"));
        let json = serde_json::to_value(filters.with_page(2, 20)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"search": "a", "page": 2, "limit": 20})
        );
    }

    #[test]
    fn test_deleted_visibility_precedence() {
        let filters = WarehouseFilters {
            with_deleted: Some(true),
            only_deleted: Some(true),
            ..Default::default()
        };
        assert_eq!(filters.deleted_visibility(), DeletedVisibility::OnlyDeleted);
    }
}
