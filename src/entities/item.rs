//! Inventory item entity and filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::backend::ListFilters;
use crate::core::filter::{DeletedVisibility, FilterSet, SortOrder};

/// Category an item belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategory {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: f64,
    pub tax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category: Option<ItemCategory>,
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

impl Item {
    /// Check if the item has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Sortable item fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemSortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,

    #[serde(rename = "updatedAt")]
    UpdatedAt,

    #[serde(rename = "code")]
    Code,

    #[serde(rename = "name")]
    Name,

    #[serde(rename = "brand")]
    Brand,

    #[serde(rename = "price")]
    Price,
}

/// UI-facing item filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilterState {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub item_category_id: Option<i64>,
    pub with_deleted: bool,
    pub only_deleted: bool,
    pub sort_by: ItemSortField,
    pub sort_order: SortOrder,
}

impl Default for ItemFilterState {
    fn default() -> Self {
        Self {
            search: None,
            min_price: None,
            max_price: None,
            item_category_id: None,
            with_deleted: false,
            only_deleted: false,
            sort_by: ItemSortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Wire filters for the item list query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ItemSortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ListFilters for ItemFilters {
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

/// Typed single-field update for [`ItemFilterState`]
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFilterUpdate {
    MinPrice(Option<f64>),
    MaxPrice(Option<f64>),
    Category(Option<i64>),
    WithDeleted(bool),
    OnlyDeleted(bool),
    SortBy(ItemSortField),
    SortOrder(SortOrder),
}

impl FilterSet for ItemFilterState {
    type Backend = ItemFilters;
    type Update = ItemFilterUpdate;

    fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn set_search(&mut self, term: Option<String>) {
        self.search = term;
    }

    fn apply(&mut self, update: ItemFilterUpdate) {
        match update {
            ItemFilterUpdate::MinPrice(value) => self.min_price = value,
            ItemFilterUpdate::MaxPrice(value) => self.max_price = value,
            ItemFilterUpdate::Category(value) => self.item_category_id = value,
            ItemFilterUpdate::WithDeleted(value) => self.with_deleted = value,
            ItemFilterUpdate::OnlyDeleted(value) => self.only_deleted = value,
            ItemFilterUpdate::SortBy(value) => self.sort_by = value,
            ItemFilterUpdate::SortOrder(value) => self.sort_order = value,
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
        self.min_price.is_some()
            || self.max_price.is_some()
            || self.item_category_id.is_some()
            || self.with_deleted
            || self.only_deleted
            || self.sort_by != ItemSortField::CreatedAt
            || self.sort_order != SortOrder::Desc
    }

    fn project(&self, debounced_search: Option<&str>) -> ItemFilters {
        ItemFilters {
            search: debounced_search.map(str::to_string),
            min_price: self.min_price,
            max_price: self.max_price,
            item_category_id: self.item_category_id,
            with_deleted: self.with_deleted.then_some(true),
            only_deleted: self.only_deleted.then_some(true),
            page: None,
            limit: None,
            sort_by: (self.sort_by != ItemSortField::CreatedAt).then_some(self.sort_by),
            sort_order: (self.sort_order != SortOrder::Desc).then_some(self.sort_order),
        }
    }
}
