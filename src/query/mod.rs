//! Shared data-fetch cache.
//!
//! [`QueryClient`] de-duplicates and caches the results of server reads so
//! every consumer of the same logical data shares one round trip and one
//! retained value until it goes stale or is evicted.

mod client;
mod duration;
mod error;
mod key;
mod observer;
mod options;
mod state;

pub use client::{QueryClient, MIN_GC_SWEEP_INTERVAL};
pub use duration::CacheDuration;
pub use error::QueryError;
pub use key::QueryKey;
pub use observer::QueryObserver;
pub use options::{
    QueryClientConfig, QueryOptions, DEFAULT_GC_TIME, DEFAULT_RETRY, DEFAULT_STALE_TIME,
};
pub use state::{QueryState, QueryStatus};
