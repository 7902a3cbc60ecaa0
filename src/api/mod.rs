//! Backend access: the REST client and the cache keys its reads live under.

mod client;
pub mod keys;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
