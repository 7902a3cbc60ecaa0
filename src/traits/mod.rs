//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`KeyValueStorage`] - Durable record storage behind the session store
//! - [`HttpClient`] - HTTP transport used by query fetchers

pub mod http;
pub mod storage;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use storage::{KeyValueStorage, StorageError};
