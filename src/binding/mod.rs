//! List query binding
//!
//! Binds one list view to its backend query: issues requests with the
//! current wire filters, tracks loading/error/pagination state, appends
//! pages on demand, and guarantees that only the most recently issued
//! request ever commits its result.
//!
//! Cancellation is two-layered. An abort handle stops the in-flight future
//! where possible, but the transport is not trusted to honor it: every
//! request also captures a generation number at issue time, and a completion
//! whose generation is stale is discarded instead of committed. A late
//! response can therefore never clobber newer state, however the abort
//! races the network.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{AbortHandle, Abortable, Aborted};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::core::backend::{ListBackend, ListFilters};
use crate::core::error::QueryError;
use crate::core::query::{DEFAULT_PAGE_LIMIT, PageInfo, clamp_limit, clamp_page};
use crate::persistence::QueryCache;

/// Lifecycle of a list query
///
/// `Ready` and `Error` re-enter `Loading` on refetch or filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// No request has been issued yet
    Idle,

    /// A request is in flight
    Loading,

    /// The last request succeeded
    Ready,

    /// The last request failed
    Error,
}

/// Everything the rendering layer needs to draw a list view
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub phase: QueryPhase,
    pub items: Vec<T>,
    pub page_info: PageInfo,
    pub error: Option<QueryError>,

    /// The current items came from the query cache, not the network
    pub is_cache_hit: bool,

    /// The in-flight request replaces data that was already on screen
    pub is_refetching: bool,
}

impl<T> ListSnapshot<T> {
    fn initial(page: u32, limit: u32) -> Self {
        Self {
            phase: QueryPhase::Idle,
            items: Vec::new(),
            page_info: PageInfo::initial(page, limit),
            error: None,
            is_cache_hit: false,
            is_refetching: false,
        }
    }

    /// Whether a request is in flight
    pub fn loading(&self) -> bool {
        self.phase == QueryPhase::Loading
    }

    /// True iff not loading, no error, and zero items
    pub fn is_empty(&self) -> bool {
        !self.loading() && self.error.is_none() && self.items.is_empty()
    }

    /// Human-readable error message, with backend messages joined
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(QueryError::joined_message)
    }

    /// Whether there is a next page
    pub fn has_next_page(&self) -> bool {
        self.page_info.has_next_page()
    }

    /// Whether there is a previous page
    pub fn has_previous_page(&self) -> bool {
        self.page_info.has_previous_page()
    }
}

#[derive(Debug, Clone, Copy)]
enum FetchMode {
    Replace,
    Append,
}

struct Inner<T, F> {
    phase: QueryPhase,
    items: Vec<T>,
    page_info: PageInfo,
    error: Option<QueryError>,
    is_cache_hit: bool,
    is_refetching: bool,

    /// Bumped on every issued request; completions with an older value are
    /// stale and must not commit
    generation: u64,
    in_flight: Option<AbortHandle>,

    /// Filters of the most recently issued request, reused by `load_more`
    /// and `refetch`
    current_filters: Option<F>,

    /// Structural key of `current_filters`, for change detection
    issued_key: Option<String>,
}

/// Query binding for one entity list view
///
/// Driving methods (`mount`, `sync_filters`, `load_more`, `refetch`) never
/// return errors: failures land in the snapshot as an [`QueryError`] with a
/// derived message, and retry is a manual `refetch` call.
///
/// Must be used inside a tokio runtime; requests run as spawned tasks.
pub struct ListQuery<B, F>
where
    B: ListBackend<F>,
    F: ListFilters,
{
    backend: Arc<B>,
    limit: u32,
    inner: Arc<Mutex<Inner<B::Item, F>>>,
    snapshot: watch::Sender<ListSnapshot<B::Item>>,
    cache: Option<Arc<QueryCache<B::Item>>>,
}

impl<B, F> ListQuery<B, F>
where
    B: ListBackend<F>,
    F: ListFilters,
{
    /// Create a binding with the default page size
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_limit(backend, DEFAULT_PAGE_LIMIT)
    }

    /// Create a binding with a specific page size
    pub fn with_limit(backend: Arc<B>, limit: u32) -> Self {
        let limit = clamp_limit(limit);
        let (snapshot, _) = watch::channel(ListSnapshot::initial(1, limit));

        Self {
            backend,
            limit,
            inner: Arc::new(Mutex::new(Inner {
                phase: QueryPhase::Idle,
                items: Vec::new(),
                page_info: PageInfo::initial(1, limit),
                error: None,
                is_cache_hit: false,
                is_refetching: false,
                generation: 0,
                in_flight: None,
                current_filters: None,
                issued_key: None,
            })),
            snapshot,
            cache: None,
        }
    }

    /// Attach a query cache, enabling cache-aware mounts
    pub fn with_query_cache(mut self, cache: Arc<QueryCache<B::Item>>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner<B::Item, F>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot_of(inner: &Inner<B::Item, F>) -> ListSnapshot<B::Item> {
        ListSnapshot {
            phase: inner.phase,
            items: inner.items.clone(),
            page_info: inner.page_info,
            error: inner.error.clone(),
            is_cache_hit: inner.is_cache_hit,
            is_refetching: inner.is_refetching,
        }
    }

    fn publish(&self) {
        let snap = Self::snapshot_of(&self.lock());
        self.snapshot.send_replace(snap);
    }

    /// Current snapshot
    pub fn snapshot(&self) -> ListSnapshot<B::Item> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<B::Item>> {
        self.snapshot.subscribe()
    }

    /// Snapshot updates as a stream
    pub fn stream(&self) -> WatchStream<ListSnapshot<B::Item>> {
        WatchStream::new(self.snapshot.subscribe())
    }

    /// Wait until no request is in flight and return the settled snapshot
    pub async fn settled(&self) -> ListSnapshot<B::Item> {
        let mut rx = self.snapshot.subscribe();
        loop {
            let snap = rx.borrow_and_update().clone();
            if !snap.loading() {
                return snap;
            }
            if rx.changed().await.is_err() {
                return snap;
            }
        }
    }

    /// Issue the initial query for this view
    ///
    /// When a query cache is attached and holds a fresh page for
    /// structurally identical filters, that page is committed immediately
    /// with `is_cache_hit` set and no request goes out.
    pub fn mount(&self, filters: F) {
        if let Some(cache) = &self.cache {
            let wire = filters.clone().with_page(1, self.limit);
            if let Some(wire_key) = QueryCache::<B::Item>::key_for(&wire) {
                if let Some(page) = cache.get(&wire_key) {
                    tracing::debug!("mounting list from cached page");
                    let key = filter_key(&filters);
                    {
                        let mut inner = self.lock();
                        inner.generation += 1;
                        if let Some(handle) = inner.in_flight.take() {
                            handle.abort();
                        }
                        inner.phase = QueryPhase::Ready;
                        inner.items = page.items;
                        inner.page_info = PageInfo::from_meta(&page.meta);
                        inner.error = None;
                        inner.is_cache_hit = true;
                        inner.is_refetching = false;
                        inner.current_filters = Some(filters);
                        inner.issued_key = key;
                    }
                    self.publish();
                    return;
                }
            }
        }

        self.issue(filters, 1, FetchMode::Replace);
    }

    /// Re-issue the query iff `filters` differ structurally from the
    /// previously issued ones
    ///
    /// A change aborts any in-flight request and resets to page 1.
    pub fn sync_filters(&self, filters: &F) {
        let key = filter_key(filters);
        {
            let inner = self.lock();
            if inner.current_filters.is_some() && inner.issued_key == key {
                return;
            }
        }

        self.issue(filters.clone(), 1, FetchMode::Replace);
    }

    /// Fetch `page` with the current filters and append its items
    ///
    /// Pagination metadata is replaced by the fetched page's; the item list
    /// is only ever extended.
    pub fn load_more(&self, page: u32) {
        let filters = self.lock().current_filters.clone();
        let Some(filters) = filters else {
            tracing::warn!("load_more called before any query was issued");
            return;
        };

        self.issue(filters, clamp_page(page), FetchMode::Append);
    }

    /// Manually re-issue the last request (the retry affordance)
    pub fn refetch(&self) {
        let (filters, page) = {
            let inner = self.lock();
            (inner.current_filters.clone(), inner.page_info.page)
        };
        let Some(filters) = filters else {
            tracing::warn!("refetch called before any query was issued");
            return;
        };

        self.issue(filters, page, FetchMode::Replace);
    }

    fn issue(&self, filters: F, page: u32, mode: FetchMode) {
        let key = filter_key(&filters);
        let wire = filters
            .clone()
            .with_page(clamp_page(page), clamp_limit(self.limit));

        let generation;
        let registration;
        {
            let mut inner = self.lock();
            inner.generation += 1;
            generation = inner.generation;

            if let Some(handle) = inner.in_flight.take() {
                handle.abort();
            }
            let (handle, reg) = AbortHandle::new_pair();
            inner.in_flight = Some(handle);
            registration = reg;

            inner.is_refetching = inner.phase != QueryPhase::Idle;
            inner.phase = QueryPhase::Loading;
            inner.error = None;
            inner.is_cache_hit = false;
            inner.current_filters = Some(filters);
            inner.issued_key = key;
        }
        self.publish();

        let backend = Arc::clone(&self.backend);
        let inner = Arc::clone(&self.inner);
        let snapshot = self.snapshot.clone();
        let cache = self.cache.clone();
        let wire_key = cache
            .as_ref()
            .and_then(|_| QueryCache::<B::Item>::key_for(&wire));

        tokio::spawn(async move {
            let request = Abortable::new(async move { backend.list(&wire).await }, registration);
            let result = request.await;

            let mut guard = inner.lock().unwrap_or_else(|e| e.into_inner());
            if guard.generation != generation {
                tracing::debug!(generation, "discarding stale list response");
                return;
            }

            guard.in_flight = None;
            guard.is_refetching = false;

            match result {
                Ok(Ok(page_result)) => {
                    if let (Some(cache), Some(wire_key)) = (&cache, wire_key) {
                        cache.put(wire_key, page_result.clone());
                    }

                    guard.page_info = PageInfo::from_meta(&page_result.meta);
                    match mode {
                        FetchMode::Replace => guard.items = page_result.items,
                        FetchMode::Append => guard.items.extend(page_result.items),
                    }
                    guard.phase = QueryPhase::Ready;
                    guard.error = None;
                }
                Ok(Err(error)) => {
                    tracing::debug!(%error, "list query failed");
                    guard.phase = QueryPhase::Error;
                    guard.error = Some(error);
                }
                Err(Aborted) => {
                    // Superseded; the replacing request owns the state now
                    return;
                }
            }

            let snap = Self::snapshot_of(&guard);
            drop(guard);
            snapshot.send_replace(snap);
        });
    }
}

impl<B, F> Drop for ListQuery<B, F>
where
    B: ListBackend<F>,
    F: ListFilters,
{
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Any completion still in flight becomes stale
        inner.generation += 1;
        if let Some(handle) = inner.in_flight.take() {
            handle.abort();
        }
    }
}

fn filter_key<F: ListFilters>(filters: &F) -> Option<String> {
    serde_json::to_string(filters).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::core::query::{PageMeta, Paginated};
    use crate::entities::warehouse::WarehouseFilters;

    /// Serves `limit`-sized slices of a fixed row set, echoing the search
    /// term into the rows so tests can tell which filters were served
    struct FakeBackend {
        total: u64,
        delay: Option<Duration>,
        fail: Option<QueryError>,
        calls: AtomicU32,
    }

    impl FakeBackend {
        fn with_rows(total: u64) -> Self {
            Self {
                total,
                delay: None,
                fail: None,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ListBackend<WarehouseFilters> for FakeBackend {
        type Item = String;

        async fn list(&self, filters: &WarehouseFilters) -> Result<Paginated<String>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(error) = &self.fail {
                return Err(error.clone());
            }

            let page = filters.page.unwrap_or(1);
            let limit = filters.limit.unwrap_or(20) as u64;
            let prefix = filters.search.clone().unwrap_or_else(|| "row".to_string());

            let start = (page as u64 - 1) * limit;
            let end = (start + limit).min(self.total);
            let items: Vec<String> = (start..end).map(|i| format!("{prefix}-{i}")).collect();
            let count = items.len() as u32;

            Ok(Paginated {
                meta: PageMeta::new(page, limit as u32, self.total, count),
                items,
            })
        }
    }

    #[tokio::test]
    async fn test_mount_reaches_ready() {
        let backend = Arc::new(FakeBackend::with_rows(45));
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        let snap = query.settled().await;

        assert_eq!(snap.phase, QueryPhase::Ready);
        assert_eq!(snap.items.len(), 20);
        assert_eq!(snap.page_info.total, 45);
        assert_eq!(snap.page_info.total_pages, 3);
        assert!(snap.has_next_page());
        assert!(!snap.has_previous_page());
        assert!(!snap.is_empty());
    }

    #[tokio::test]
    async fn test_load_more_appends_and_replaces_meta() {
        let backend = Arc::new(FakeBackend::with_rows(45));
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        query.settled().await;

        query.load_more(2);
        let snap = query.settled().await;

        assert_eq!(snap.items.len(), 40);
        assert_eq!(snap.items[0], "row-0");
        assert_eq!(snap.items[39], "row-39");
        assert_eq!(snap.page_info.page, 2);

        query.load_more(3);
        let snap = query.settled().await;
        assert_eq!(snap.items.len(), 45);
        assert!(!snap.has_next_page());
        assert!(snap.has_previous_page());
    }

    #[tokio::test]
    async fn test_sync_filters_skips_identical_filters() {
        let backend = Arc::new(FakeBackend::with_rows(5));
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        query.settled().await;
        assert_eq!(backend.calls(), 1);

        // Structurally identical filters: a fresh object, same content
        query.sync_filters(&WarehouseFilters::default());
        query.settled().await;
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_sync_filters_reissues_on_change() {
        let backend = Arc::new(FakeBackend::with_rows(45));
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        query.settled().await;
        query.load_more(2);
        query.settled().await;

        let filtered = WarehouseFilters {
            search: Some("forklift".to_string()),
            ..Default::default()
        };
        query.sync_filters(&filtered);
        let snap = query.settled().await;

        assert_eq!(backend.calls(), 3);
        // Back to page 1, list replaced rather than appended to
        assert_eq!(snap.page_info.page, 1);
        assert_eq!(snap.items.len(), 20);
        assert_eq!(snap.items[0], "forklift-0");
    }

    #[tokio::test]
    async fn test_rapid_filter_changes_only_last_commits() {
        let backend = Arc::new(FakeBackend {
            delay: Some(Duration::from_millis(10)),
            ..FakeBackend::with_rows(30)
        });
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        for term in ["a", "ab", "abc"] {
            query.sync_filters(&WarehouseFilters {
                search: Some(term.to_string()),
                ..Default::default()
            });
        }

        let snap = query.settled().await;
        assert_eq!(snap.phase, QueryPhase::Ready);
        assert_eq!(snap.items[0], "abc-0");
    }

    #[tokio::test]
    async fn test_error_is_captured_and_retryable() {
        let backend = Arc::new(FakeBackend {
            fail: Some(QueryError::backend(["almacén no disponible"])),
            ..FakeBackend::with_rows(5)
        });
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        let snap = query.settled().await;

        assert_eq!(snap.phase, QueryPhase::Error);
        assert_eq!(
            snap.error_message().as_deref(),
            Some("almacén no disponible")
        );
        assert!(!snap.is_empty());

        // Retry re-invokes the same request path
        query.refetch();
        query.settled().await;
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let cache = Arc::new(QueryCache::default());
        let backend = Arc::new(FakeBackend::with_rows(5));

        {
            let query =
                ListQuery::with_limit(backend.clone(), 20).with_query_cache(cache.clone());
            query.mount(WarehouseFilters::default());
            let snap = query.settled().await;
            assert!(!snap.is_cache_hit);
        }
        assert_eq!(backend.calls(), 1);

        // A second view over the same filters mounts straight from cache
        let query = ListQuery::with_limit(backend.clone(), 20).with_query_cache(cache.clone());
        query.mount(WarehouseFilters::default());
        let snap = query.settled().await;

        assert_eq!(backend.calls(), 1);
        assert!(snap.is_cache_hit);
        assert_eq!(snap.items.len(), 5);

        // A network refetch clears the cache-hit flag
        query.refetch();
        let snap = query.settled().await;
        assert!(!snap.is_cache_hit);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_is_empty_requires_settled_no_error() {
        let backend = Arc::new(FakeBackend::with_rows(0));
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        let snap = query.settled().await;

        assert_eq!(snap.phase, QueryPhase::Ready);
        assert!(snap.is_empty());
        assert_eq!(snap.page_info.total_pages, 0);
    }

    #[tokio::test]
    async fn test_refetching_flag_set_on_reissue() {
        let backend = Arc::new(FakeBackend {
            delay: Some(Duration::from_millis(10)),
            ..FakeBackend::with_rows(5)
        });
        let query = ListQuery::with_limit(backend.clone(), 20);

        query.mount(WarehouseFilters::default());
        assert!(!query.snapshot().is_refetching);
        query.settled().await;

        query.refetch();
        assert!(query.snapshot().is_refetching);
        let snap = query.settled().await;
        assert!(!snap.is_refetching);
    }
}
