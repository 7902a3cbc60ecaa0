//! Long-lived subscriptions to a cache entry.

use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;

use super::client::{downcast, EntryId, Fetcher, QueryClient};
use super::error::QueryError;
use super::key::QueryKey;
use super::options::QueryOptions;
use super::state::QueryState;

/// Keeps one cache entry alive and reports its changes.
///
/// Created by [`QueryClient::observe`]. While at least one observer exists
/// the entry is never garbage collected and invalidation refetches it
/// immediately. Dropping the observer starts the entry's gc countdown.
pub struct QueryObserver<T> {
    client: QueryClient,
    key: QueryKey,
    options: QueryOptions,
    fetcher: Fetcher,
    entry_id: EntryId,
    version: watch::Receiver<u64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for QueryObserver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryObserver")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish()
    }
}

impl<T> QueryObserver<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(
        client: QueryClient,
        key: QueryKey,
        options: QueryOptions,
        fetcher: Fetcher,
        entry_id: EntryId,
        version: watch::Receiver<u64>,
    ) -> Self {
        Self {
            client,
            key,
            options,
            fetcher,
            entry_id,
            version,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current state of the observed entry.
    pub fn state(&self) -> QueryState<T> {
        self.client
            .get_query_state(&self.key)
            .unwrap_or_else(QueryState::empty)
    }

    /// Current data, fresh or stale.
    pub fn data(&self) -> Option<Arc<T>> {
        self.client.get_query_data(&self.key)
    }

    /// Wait for the entry to change. Returns `false` once the entry has been
    /// removed from the cache; call [`refetch`](Self::refetch) to recreate it.
    pub async fn changed(&mut self) -> bool {
        self.version.changed().await.is_ok()
    }

    /// Wait until no fetch is running and return the resulting state.
    pub async fn settled(&mut self) -> QueryState<T> {
        loop {
            let state = self.state();
            if !state.is_fetching || !self.changed().await {
                return state;
            }
        }
    }

    /// Fetch now, ignoring freshness and any stored error.
    pub async fn refetch(&mut self) -> Result<Arc<T>, QueryError> {
        let (future, entry_id, version) =
            self.client
                .observer_refetch(&self.key, &self.options, &self.fetcher, self.entry_id);
        self.entry_id = entry_id;
        self.version = version;
        let data = future.await?;
        downcast(&self.key, data)
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.client.release(&self.key, self.entry_id);
    }
}
