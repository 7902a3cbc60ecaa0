//! The shared query cache.
//!
//! Entries live in one map behind a std mutex that is never held across an
//! await. Fetches run on spawned tasks and are exposed to requesters as a
//! [`Shared`] future, so every concurrent requester of a key awaits the same
//! single call and receives the same `Arc`.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::error::QueryError;
use super::key::QueryKey;
use super::observer::QueryObserver;
use super::options::{QueryClientConfig, QueryOptions, ResolvedOptions};
use super::state::{QueryState, QueryStatus};
use crate::error::FetchError;

/// Shortest period accepted by [`QueryClient::spawn_gc_sweeper`].
pub const MIN_GC_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

pub(crate) type QueryData = Arc<dyn Any + Send + Sync>;
type FetchResult = Result<QueryData, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;
/// Identity of one entry's lifetime; a key removed and recreated gets a new id.
pub(crate) type EntryId = u64;
pub(crate) type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;

struct InFlight {
    generation: u64,
    future: SharedFetch,
}

struct QueryEntry {
    id: EntryId,
    data: Option<QueryData>,
    data_updated_at: Option<Instant>,
    error: Option<FetchError>,
    in_flight: Option<InFlight>,
    /// Most recently registered fetcher; `None` for entries seeded by
    /// [`QueryClient::set_query_data`].
    fetcher: Option<Fetcher>,
    options: ResolvedOptions,
    invalidated: bool,
    observers: usize,
    gc_deadline: Option<Instant>,
    generation: u64,
    version: watch::Sender<u64>,
}

impl QueryEntry {
    fn new(id: EntryId, options: ResolvedOptions) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            id,
            data: None,
            data_updated_at: None,
            error: None,
            in_flight: None,
            fetcher: None,
            options,
            invalidated: false,
            observers: 0,
            gc_deadline: None,
            generation: 0,
            version,
        }
    }

    fn is_stale(&self, now: Instant) -> bool {
        self.invalidated
            || self
                .data_updated_at
                .map_or(true, |at| now.saturating_duration_since(at) >= self.options.stale_time)
    }

    /// Fresh data that can be served without fetching.
    fn fresh_data(&self, now: Instant) -> Option<QueryData> {
        if self.is_stale(now) {
            None
        } else {
            self.data.clone()
        }
    }

    /// The stored error, unless the entry has been invalidated since.
    fn sticky_error(&self) -> Option<FetchError> {
        if self.invalidated {
            None
        } else {
            self.error.clone()
        }
    }

    fn status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Pending
        }
    }

    fn is_evictable(&self, now: Instant) -> bool {
        self.observers == 0
            && self.in_flight.is_none()
            && self.gc_deadline.map_or(false, |deadline| deadline <= now)
    }

    /// Start the gc countdown if nothing is keeping the entry alive.
    fn schedule_gc(&mut self, now: Instant) {
        if self.observers == 0 && self.in_flight.is_none() {
            self.gc_deadline = Some(now + self.options.gc_time);
        }
    }

    fn notify(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

struct CacheInner {
    entries: HashMap<QueryKey, QueryEntry>,
    defaults: QueryOptions,
    next_id: EntryId,
}

impl CacheInner {
    fn evict_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let evict = entry.is_evictable(now);
            if evict {
                trace!(key = %key, "Evicting unobserved query");
            }
            !evict
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "Query cache garbage collected");
        }
        evicted
    }

    /// The entry for `key`, created if missing, with `options` applied.
    fn entry(&mut self, key: &QueryKey, options: &QueryOptions) -> &mut QueryEntry {
        let resolved = options.resolve(&self.defaults);
        let entry = self.entry_or_default(key);
        entry.options = resolved;
        entry
    }

    /// The entry for `key`; a new entry takes the client defaults and an
    /// existing one keeps its own options.
    fn entry_or_default(&mut self, key: &QueryKey) -> &mut QueryEntry {
        let resolved = QueryOptions::default().resolve(&self.defaults);
        let next_id = &mut self.next_id;
        self.entries.entry(key.clone()).or_insert_with(|| {
            *next_id += 1;
            QueryEntry::new(*next_id, resolved)
        })
    }
}

/// Process-wide cache of server-derived data keyed by [`QueryKey`].
///
/// Cloning is cheap; clones share the same entries.
///
/// # Example
///
/// ```ignore
/// use green_plate::query::{QueryClient, QueryKey, QueryOptions};
///
/// let client = QueryClient::new();
/// let listings = client
///     .fetch_query(QueryKey::from("listings"), QueryOptions::new(), move || {
///         let api = api.clone();
///         async move { api.listings(&[]).await }
///     })
///     .await?;
/// ```
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Mutex<CacheInner>>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.len())
            .finish()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&QueryClientConfig::default())
    }

    /// Create a client whose queries inherit `config.default_options`.
    ///
    /// The background sweep is not started here; see
    /// [`spawn_gc_sweeper`](Self::spawn_gc_sweeper).
    pub fn with_config(config: &QueryClientConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                entries: HashMap::new(),
                defaults: config.default_options,
                next_id: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        lock_cache(&self.inner)
    }

    /// Register `fetcher` under `key` and return its data.
    ///
    /// - fresh cached data is returned without calling `fetcher`
    /// - a fetch already running for `key` is joined, not duplicated
    /// - a stored error is returned until the key is invalidated or refetched
    /// - otherwise `fetcher` runs once on a spawned task
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let fetcher = erase(fetcher);
        let future = {
            let mut inner = self.lock();
            let now = Instant::now();
            inner.evict_expired(now);
            let entry = inner.entry(&key, &options);
            entry.fetcher = Some(Arc::clone(&fetcher));

            if let Some(in_flight) = &entry.in_flight {
                trace!(key = %key, "Joining in-flight fetch");
                in_flight.future.clone()
            } else if let Some(err) = entry.sticky_error() {
                return Err(QueryError::Fetch(err));
            } else if let Some(data) = entry.fresh_data(now) {
                trace!(key = %key, "Serving fresh cached data");
                return downcast(&key, data);
            } else {
                start_fetch(&self.inner, &key, entry, fetcher)
            }
        };

        let data = future.await?;
        downcast(&key, data)
    }

    /// Rerun the fetcher registered for `key`, ignoring freshness and any
    /// stored error. Joins a fetch that is already running.
    pub async fn refetch_query<T>(&self, key: &QueryKey) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
    {
        let future = {
            let mut inner = self.lock();
            let entry = inner.entries.get_mut(key).ok_or_else(|| QueryError::NotFound {
                key: key.to_string(),
            })?;
            if let Some(in_flight) = &entry.in_flight {
                in_flight.future.clone()
            } else {
                let fetcher = entry.fetcher.clone().ok_or_else(|| QueryError::NotFound {
                    key: key.to_string(),
                })?;
                start_fetch(&self.inner, key, entry, fetcher)
            }
        };

        let data = future.await?;
        downcast(key, data)
    }

    /// Watch `key`, serving cached data immediately and fetching in the
    /// background when the entry is missing or stale. The entry cannot be
    /// garbage collected while the observer is alive.
    ///
    /// Must be called inside a tokio runtime.
    pub fn observe<T, F, Fut>(&self, key: QueryKey, options: QueryOptions, fetcher: F) -> QueryObserver<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let fetcher = erase(fetcher);
        let (entry_id, version) = {
            let mut inner = self.lock();
            let now = Instant::now();
            inner.evict_expired(now);
            let entry = inner.entry(&key, &options);
            entry.fetcher = Some(Arc::clone(&fetcher));
            entry.observers += 1;
            entry.gc_deadline = None;

            let needs_fetch = entry.in_flight.is_none()
                && entry.sticky_error().is_none()
                && entry.fresh_data(now).is_none();
            if needs_fetch {
                debug!(key = %key, "Observer mounted on missing or stale query; fetching");
                start_fetch(&self.inner, &key, entry, Arc::clone(&fetcher));
            }
            (entry.id, entry.version.subscribe())
        };

        QueryObserver::new(self.clone(), key, options, fetcher, entry_id, version)
    }

    /// Used by observers: fetch (or join) for `key`. When the observed entry
    /// was removed meanwhile, the observer is counted on the entry that now
    /// holds `key`, created if needed.
    pub(crate) fn observer_refetch(
        &self,
        key: &QueryKey,
        options: &QueryOptions,
        fetcher: &Fetcher,
        entry_id: EntryId,
    ) -> (BoxFuture<'static, FetchResult>, EntryId, watch::Receiver<u64>) {
        let mut inner = self.lock();
        let entry = inner.entry(key, options);
        if entry.id != entry_id {
            entry.observers += 1;
            entry.gc_deadline = None;
        }
        entry.fetcher = Some(Arc::clone(fetcher));

        let future = match &entry.in_flight {
            Some(in_flight) => in_flight.future.clone(),
            None => start_fetch(&self.inner, key, entry, Arc::clone(fetcher)),
        };
        (future.boxed(), entry.id, entry.version.subscribe())
    }

    /// Drop one observation of entry `entry_id` under `key` and start its gc
    /// countdown when it was the last one. A no-op once that entry is gone,
    /// even if `key` has been recreated since.
    pub(crate) fn release(&self, key: &QueryKey, entry_id: EntryId) {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(key).filter(|e| e.id == entry_id) {
            entry.observers = entry.observers.saturating_sub(1);
            entry.schedule_gc(Instant::now());
        }
    }

    /// Cached data for `key`, fresh or stale, without fetching.
    pub fn get_query_data<T>(&self, key: &QueryKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let mut inner = self.lock();
        inner.evict_expired(Instant::now());
        let data = inner.entries.get(key)?.data.clone()?;
        match data.downcast::<T>() {
            Ok(data) => Some(data),
            Err(_) => {
                warn!(key = %key, "Cached data requested with the wrong type");
                None
            }
        }
    }

    /// Snapshot of the entry for `key`, or `None` if there is no entry.
    pub fn get_query_state<T>(&self, key: &QueryKey) -> Option<QueryState<T>>
    where
        T: Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let now = Instant::now();
        inner.evict_expired(now);
        let entry = inner.entries.get(key)?;
        let data = entry.data.clone().and_then(|d| d.downcast::<T>().ok());
        Some(QueryState {
            status: entry.status(),
            data,
            error: entry.error.clone(),
            is_fetching: entry.in_flight.is_some(),
            is_stale: entry.is_stale(now),
            data_updated_at: entry.data_updated_at,
            observers: entry.observers,
        })
    }

    /// Seed or overwrite the data for `key`, marking it fresh.
    pub fn set_query_data<T>(&self, key: QueryKey, value: T) -> Arc<T>
    where
        T: Send + Sync + 'static,
    {
        let value = Arc::new(value);
        let mut inner = self.lock();
        let now = Instant::now();
        let entry = inner.entry_or_default(&key);
        entry.data = Some(Arc::clone(&value) as QueryData);
        entry.data_updated_at = Some(now);
        entry.error = None;
        entry.invalidated = false;
        entry.schedule_gc(now);
        entry.notify();
        debug!(key = %key, "Query data set");
        value
    }

    /// Mark every entry under `prefix` stale. Observed entries refetch right
    /// away; the rest refetch on their next lookup. Returns the number of
    /// entries matched.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let mut inner = self.lock();
        let now = Instant::now();
        let mut matched = 0;
        for (key, entry) in inner
            .entries
            .iter_mut()
            .filter(|(key, _)| key.starts_with(prefix))
        {
            matched += 1;
            entry.invalidated = true;
            // A fetch that started before the invalidation may carry old data.
            entry.in_flight = None;

            match entry.fetcher.clone() {
                Some(fetcher) if entry.observers > 0 => {
                    start_fetch(&self.inner, key, entry, fetcher);
                }
                _ => {
                    entry.schedule_gc(now);
                    entry.notify();
                }
            }
        }
        debug!(prefix = %prefix, matched, "Invalidated queries");
        matched
    }

    /// Remove every entry under `prefix`. Running fetches finish but their
    /// results are discarded.
    pub fn remove_queries(&self, prefix: &QueryKey) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        before - inner.entries.len()
    }

    /// Evict entries whose gc deadline has passed. Returns how many went.
    pub fn collect_garbage(&self) -> usize {
        self.lock().evict_expired(Instant::now())
    }

    /// Periodically run [`collect_garbage`](Self::collect_garbage) until
    /// every clone of this client is dropped or the handle is aborted.
    ///
    /// Intervals shorter than [`MIN_GC_SWEEP_INTERVAL`] are raised to it.
    pub fn spawn_gc_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let interval = interval.max(MIN_GC_SWEEP_INTERVAL);
        let weak: Weak<Mutex<CacheInner>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    debug!("Query client dropped; stopping gc sweeper");
                    break;
                };
                lock_cache(&inner).evict_expired(Instant::now());
            }
        })
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_cache(inner: &Mutex<CacheInner>) -> MutexGuard<'_, CacheInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn erase<T, F, Fut>(fetcher: F) -> Fetcher
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetcher();
        async move { fut.await.map(|value| Arc::new(value) as QueryData) }.boxed()
    })
}

pub(super) fn downcast<T>(key: &QueryKey, data: QueryData) -> Result<Arc<T>, QueryError>
where
    T: Send + Sync + 'static,
{
    data.downcast::<T>().map_err(|_| QueryError::TypeMismatch {
        key: key.to_string(),
    })
}

/// Spawn a fetch for `entry` and record it as the entry's in-flight fetch.
fn start_fetch(
    cache: &Arc<Mutex<CacheInner>>,
    key: &QueryKey,
    entry: &mut QueryEntry,
    fetcher: Fetcher,
) -> SharedFetch {
    entry.generation += 1;
    let generation = entry.generation;
    let options = entry.options;
    let weak = Arc::downgrade(cache);
    let task_weak = Weak::clone(&weak);
    let task_key = key.clone();
    let join_key = key.clone();
    debug!(key = %key, generation, "Starting fetch");

    let handle = tokio::spawn(async move {
        let result = AssertUnwindSafe(run_with_retry(&task_key, &fetcher, &options))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let reason = panic_reason(panic.as_ref());
                warn!(key = %task_key, reason = %reason, "Fetcher panicked");
                Err(FetchError::Aborted(format!("fetcher panicked: {}", reason)))
            });
        if let Some(cache) = task_weak.upgrade() {
            settle(&cache, &task_key, generation, &result);
        }
        result
    });

    let future = async move {
        match handle.await {
            Ok(result) => result,
            Err(join_error) => {
                // The task never reached settle; release the entry here.
                let result = Err(FetchError::Aborted(join_error.to_string()));
                if let Some(cache) = weak.upgrade() {
                    settle(&cache, &join_key, generation, &result);
                }
                result
            }
        }
    }
    .boxed()
    .shared();

    entry.in_flight = Some(InFlight {
        generation,
        future: future.clone(),
    });
    entry.gc_deadline = None;
    entry.notify();
    future
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

async fn run_with_retry(key: &QueryKey, fetcher: &Fetcher, options: &ResolvedOptions) -> FetchResult {
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(data) => return Ok(data),
            Err(err) if attempt < options.retry => {
                attempt += 1;
                let delay = options.delay_before(attempt);
                debug!(key = %key, attempt, ?delay, error = %err, "Fetch failed; retrying");
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Fetch failed");
                return Err(err);
            }
        }
    }
}

/// Store the outcome of fetch `generation` unless a newer fetch or an
/// invalidation superseded it.
fn settle(cache: &Mutex<CacheInner>, key: &QueryKey, generation: u64, result: &FetchResult) {
    let mut inner = lock_cache(cache);
    let Some(entry) = inner.entries.get_mut(key) else {
        trace!(key = %key, "Fetch finished for a removed query");
        return;
    };
    if entry.in_flight.as_ref().map(|f| f.generation) != Some(generation) {
        trace!(key = %key, generation, "Discarding superseded fetch result");
        return;
    }

    let now = Instant::now();
    entry.in_flight = None;
    match result {
        Ok(data) => {
            entry.data = Some(Arc::clone(data));
            entry.data_updated_at = Some(now);
            entry.error = None;
        }
        Err(err) => {
            entry.error = Some(err.clone());
        }
    }
    entry.invalidated = false;
    entry.schedule_gc(now);
    entry.notify();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::HttpError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        calls: Arc<AtomicUsize>,
        value: &'static str,
    ) -> impl Fn() -> BoxFuture<'static, Result<String, FetchError>> + Send + Sync + 'static {
        move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(value.to_string())
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_fetch_query_caches_fresh_data() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::new().with_stale_time(Duration::from_secs(60));

        let first = client
            .fetch_query(QueryKey::from("listings"), options, counting_fetcher(calls.clone(), "a"))
            .await
            .unwrap();
        let second = client
            .fetch_query(QueryKey::from("listings"), options, counting_fetcher(calls.clone(), "b"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, "a");
    }

    #[tokio::test]
    async fn test_zero_stale_time_refetches_sequential_requests() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            client
                .fetch_query(QueryKey::from("listings"), QueryOptions::new(), counting_fetcher(calls.clone(), "a"))
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_type_mismatch() {
        let client = QueryClient::new();
        client.set_query_data(QueryKey::from("count"), 3u32);
        let options = QueryOptions::new().with_stale_time(Duration::from_secs(60));

        let result = client
            .fetch_query(QueryKey::from("count"), options, || async { Ok::<_, FetchError>("x".to_string()) })
            .await;
        assert!(matches!(result, Err(QueryError::TypeMismatch { .. })));
        assert!(client.get_query_data::<String>(&QueryKey::from("count")).is_none());
        assert_eq!(*client.get_query_data::<u32>(&QueryKey::from("count")).unwrap(), 3);
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let options = QueryOptions::new()
            .with_retry(2)
            .with_retry_delay(Duration::from_millis(1));

        let value = client
            .fetch_query(QueryKey::from("flaky"), options, move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(FetchError::Http(HttpError::Timeout("slow".to_string())))
                    } else {
                        Ok(7u8)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(*value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_refetch_unknown_key() {
        let client = QueryClient::new();
        let result = client.refetch_query::<String>(&QueryKey::from("nope")).await;
        assert!(matches!(result, Err(QueryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_refetch_seeded_entry_without_fetcher() {
        let client = QueryClient::new();
        client.set_query_data(QueryKey::from("seeded"), 1u8);
        let result = client.refetch_query::<u8>(&QueryKey::from("seeded")).await;
        assert!(matches!(result, Err(QueryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_queries_by_prefix() {
        let client = QueryClient::new();
        client.set_query_data(QueryKey::new(["listing", "1"]), 1u8);
        client.set_query_data(QueryKey::new(["listing", "2"]), 2u8);
        client.set_query_data(QueryKey::new(["reservation", "1"]), 3u8);

        assert_eq!(client.remove_queries(&QueryKey::from("listing")), 2);
        assert_eq!(client.len(), 1);

        client.clear();
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_fetcher_settles_entry() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let key = QueryKey::from("explodes-once");
        let options = QueryOptions::new().with_gc_time(Duration::ZERO);

        let first = client
            .fetch_query(key.clone(), options, move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        panic!("boom");
                    }
                    Ok::<_, FetchError>(9u8)
                }
            })
            .await;
        assert!(matches!(first, Err(QueryError::Fetch(FetchError::Aborted(_)))));

        let state = client.get_query_state::<u8>(&key).unwrap();
        assert!(!state.is_fetching);
        assert_eq!(state.status, QueryStatus::Error);

        let value = client.refetch_query::<u8>(&key).await.unwrap();
        assert_eq!(*value, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.collect_garbage(), 1);
    }

    #[tokio::test]
    async fn test_set_query_data_keeps_entry_options() {
        let client = QueryClient::new();
        let key = QueryKey::from("short-lived");
        let options = QueryOptions::new().with_gc_time(Duration::ZERO);
        client
            .fetch_query(key.clone(), options, || async { Ok::<_, FetchError>(1u8) })
            .await
            .unwrap();

        client.set_query_data(key.clone(), 2u8);
        assert_eq!(client.collect_garbage(), 1);
    }

    #[tokio::test]
    async fn test_gc_sweeper_accepts_zero_interval() {
        let client = QueryClient::new();
        let options = QueryOptions::new().with_gc_time(Duration::ZERO);
        client
            .fetch_query(QueryKey::from("gone"), options, || async { Ok::<_, FetchError>(1u8) })
            .await
            .unwrap();

        let sweeper = client.spawn_gc_sweeper(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(20)).await;
        sweeper.abort();
        assert!(client.is_empty());
    }
}
