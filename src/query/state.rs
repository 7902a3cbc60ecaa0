//! Read-only view of a cache entry.

use std::sync::Arc;
use std::time::Instant;

use crate::error::FetchError;

/// Coarse lifecycle of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// No data and no error yet.
    Pending,
    /// The latest fetch succeeded.
    Success,
    /// The latest fetch failed.
    Error,
}

/// Snapshot of one entry, typed for the consumer.
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    /// Last successfully fetched value, kept even after a later failure.
    pub data: Option<Arc<T>>,
    pub error: Option<FetchError>,
    /// A fetch for this key is running.
    pub is_fetching: bool,
    /// The data is past its staleness window or was invalidated.
    pub is_stale: bool,
    pub data_updated_at: Option<Instant>,
    pub observers: usize,
}

impl<T> QueryState<T> {
    /// State of a key that has no entry.
    pub fn empty() -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            is_fetching: false,
            is_stale: true,
            data_updated_at: None,
            observers: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Nothing to show yet and a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.is_fetching
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            is_stale: self.is_stale,
            data_updated_at: self.data_updated_at,
            observers: self.observers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state: QueryState<String> = QueryState::empty();
        assert_eq!(state.status, QueryStatus::Pending);
        assert!(!state.is_loading());
        assert!(state.is_stale);
    }

    #[test]
    fn test_loading_requires_fetch_without_data() {
        let mut state: QueryState<u32> = QueryState::empty();
        state.is_fetching = true;
        assert!(state.is_loading());
        state.data = Some(Arc::new(1));
        assert!(!state.is_loading());
    }
}
