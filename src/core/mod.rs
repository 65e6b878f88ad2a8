//! Core module containing fundamental traits and types for the filter/cache machinery

pub mod backend;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod query;
pub mod store;

pub use backend::{ListBackend, ListFilters};
pub use debounce::Debounced;
pub use error::{ConfigError, ListError, PersistenceError, QueryError};
pub use filter::{DeletedVisibility, FilterSet, SortOrder, normalize_search};
pub use query::{PageInfo, PageMeta, Paginated};
pub use store::FilterStore;
