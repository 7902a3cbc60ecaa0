//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`InMemoryStorage`] - In-memory durable storage

pub mod http;
pub mod storage;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use storage::InMemoryStorage;
