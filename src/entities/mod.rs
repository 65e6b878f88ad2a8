//! Concrete entity types and their filter states
//!
//! The three list views share one structural shape (search + facets +
//! deleted flags + sort) with entity-specific field sets.

pub mod container;
pub mod item;
pub mod warehouse;

pub use container::{
    Container, ContainerFilterState, ContainerFilterUpdate, ContainerFilters, ContainerSortField,
    ContainerStatus, InventoryItem,
};
pub use item::{
    Item, ItemCategory, ItemFilterState, ItemFilterUpdate, ItemFilters, ItemSortField,
};
pub use warehouse::{
    Warehouse, WarehouseFilterState, WarehouseFilterUpdate, WarehouseFilters, WarehouseLocation,
    WarehouseSortField, WarehouseType,
};
