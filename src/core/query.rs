//! Pagination types shared by backends and bindings

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Maximum number of items per page a backend will accept
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Get page number, ensuring minimum of 1
pub fn clamp_page(page: u32) -> u32 {
    page.max(1)
}

/// Get limit, ensuring it doesn't exceed the maximum
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

/// Pagination metadata as the backend reports it
///
/// Field names follow the wire contract of the list queries
/// (`totalItems`, `itemCount`, `itemsPerPage`, `totalPages`, `currentPage`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    /// Total number of items (after filters)
    pub total_items: u64,

    /// Number of items in the returned page
    pub item_count: u32,

    /// Number of items per page
    pub items_per_page: u32,

    /// Total number of pages
    pub total_pages: u32,

    /// Current page number (starts at 1)
    pub current_page: u32,
}

impl PageMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: u32, limit: u32, total: u64, item_count: u32) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(limit as u64) as u32
        };

        Self {
            total_items: total,
            item_count,
            items_per_page: limit,
            total_pages,
            current_page: clamp_page(page),
        }
    }
}

/// A page of items together with its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The items of the current page
    pub items: Vec<T>,

    /// Pagination metadata
    pub meta: PageMeta,
}

/// UI-facing pagination state derived from [`PageMeta`]
///
/// The binding exposes this instead of raw meta so the rendering layer gets
/// stable values even before the first response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    /// Total number of items (after filters)
    pub total: u64,

    /// Current page number (starts at 1)
    pub page: u32,

    /// Total number of pages
    pub total_pages: u32,

    /// Number of items per page
    pub limit: u32,

    /// Number of items in the current page
    pub item_count: u32,
}

impl PageInfo {
    /// Pagination state before any response has landed
    pub fn initial(page: u32, limit: u32) -> Self {
        Self {
            total: 0,
            page: clamp_page(page),
            total_pages: 0,
            limit: clamp_limit(limit),
            item_count: 0,
        }
    }

    /// Derive UI pagination state from backend metadata
    pub fn from_meta(meta: &PageMeta) -> Self {
        Self {
            total: meta.total_items,
            page: meta.current_page,
            total_pages: meta.total_pages,
            limit: meta.items_per_page,
            item_count: meta.item_count,
        }
    }

    /// Whether there is a next page
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether there is a previous page
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(7), 7);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(20), 20);
        assert_eq!(clamp_limit(500), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_page_meta() {
        let meta = PageMeta::new(1, 20, 145, 20);
        assert_eq!(meta.total_items, 145);
        assert_eq!(meta.total_pages, 8);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = PageMeta::new(1, 20, 0, 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.item_count, 0);
    }

    #[test]
    fn test_page_info_navigation() {
        let info = PageInfo::from_meta(&PageMeta::new(1, 20, 145, 20));
        assert!(info.has_next_page());
        assert!(!info.has_previous_page());

        let last = PageInfo::from_meta(&PageMeta::new(8, 20, 145, 5));
        assert!(!last.has_next_page());
        assert!(last.has_previous_page());
    }

    #[test]
    fn test_page_meta_wire_names() {
        let meta = PageMeta::new(2, 10, 35, 10);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalItems"], 35);
        assert_eq!(json["itemsPerPage"], 10);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 4);
    }
}
