//! Error handling for the Green Plate client core.
//!
//! - **Per-concern errors**: [`StorageError`](crate::traits::StorageError),
//!   [`HttpError`](crate::traits::HttpError), [`FetchError`],
//!   [`QueryError`](crate::query::QueryError), [`ConfigError`]
//! - **Unified error**: [`GreenPlateError`] with categorization, retry
//!   classification and user-facing messages
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout | Yes |
//! | Server | Error status, bad body | Yes |
//! | Storage | Durable read/write | No |
//! | Client | Programming errors | No |
//! | Configuration | Invalid settings | No |

mod category;
mod config;
mod fetch;
mod green_plate_error;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use fetch::FetchError;
pub use green_plate_error::GreenPlateError;

/// Type alias for results using [`GreenPlateError`].
pub type GreenPlateResult<T> = Result<T, GreenPlateError>;
