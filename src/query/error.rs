//! Query cache errors.

use thiserror::Error;

use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The fetch for this key failed (now, or earlier and not yet retried)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The cached value was stored with a different type than requested
    #[error("Cached value for '{key}' has a different type than requested")]
    TypeMismatch { key: String },

    /// No entry or no registered fetcher for this key
    #[error("No query registered for '{key}'")]
    NotFound { key: String },
}
