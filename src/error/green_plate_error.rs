//! Unified error type for the Green Plate client core.

use std::fmt;

use super::category::ErrorCategory;
use super::config::ConfigError;
use super::fetch::FetchError;
use crate::query::QueryError;
use crate::traits::{HttpError, StorageError};

/// Unified error type.
///
/// Session persistence failures never reach callers (they are logged by the
/// store), so `Storage` only shows up from explicit storage calls such as
/// building a context.
#[derive(Debug)]
pub enum GreenPlateError {
    /// Durable storage errors.
    Storage(StorageError),

    /// Remote read/write errors.
    Fetch(FetchError),

    /// Query cache errors.
    Query(QueryError),

    /// Configuration errors.
    Config(ConfigError),
}

impl GreenPlateError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GreenPlateError::Storage(_) => ErrorCategory::Storage,
            GreenPlateError::Fetch(err) => fetch_category(err),
            GreenPlateError::Query(QueryError::Fetch(err)) => fetch_category(err),
            GreenPlateError::Query(_) => ErrorCategory::Client,
            GreenPlateError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            GreenPlateError::Fetch(err) | GreenPlateError::Query(QueryError::Fetch(err)) => {
                err.is_transient()
            }
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            GreenPlateError::Storage(_) => {
                "Your session could not be saved on this device.".to_string()
            }
            GreenPlateError::Fetch(FetchError::Http(HttpError::ServerError { status: 404, .. }))
            | GreenPlateError::Query(QueryError::Fetch(FetchError::Http(
                HttpError::ServerError { status: 404, .. },
            ))) => "We couldn't find what you were looking for.".to_string(),
            GreenPlateError::Fetch(_) | GreenPlateError::Query(QueryError::Fetch(_)) => format!(
                "Something went wrong loading data. {}.",
                self.category().recovery_hint()
            ),
            GreenPlateError::Query(err) => format!("Unexpected data error: {}", err),
            GreenPlateError::Config(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GreenPlateError::Storage(_) => "STORAGE",
            GreenPlateError::Fetch(err) | GreenPlateError::Query(QueryError::Fetch(err)) => {
                match err {
                    FetchError::Http(HttpError::ServerError { .. }) => "FETCH_STATUS",
                    FetchError::Http(HttpError::Timeout(_)) => "FETCH_TIMEOUT",
                    FetchError::Http(_) => "FETCH_NETWORK",
                    FetchError::Decode { .. } => "FETCH_DECODE",
                    FetchError::Aborted(_) => "FETCH_ABORTED",
                }
            }
            GreenPlateError::Query(QueryError::TypeMismatch { .. }) => "QUERY_TYPE_MISMATCH",
            GreenPlateError::Query(QueryError::NotFound { .. }) => "QUERY_NOT_FOUND",
            GreenPlateError::Config(_) => "CONFIG",
        }
    }
}

fn fetch_category(err: &FetchError) -> ErrorCategory {
    match err {
        FetchError::Http(HttpError::ServerError { .. }) | FetchError::Decode { .. } => {
            ErrorCategory::Server
        }
        FetchError::Http(HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
        FetchError::Http(_) | FetchError::Aborted(_) => ErrorCategory::Network,
    }
}

impl fmt::Display for GreenPlateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GreenPlateError::Storage(err) => write!(f, "{}", err),
            GreenPlateError::Fetch(err) => write!(f, "{}", err),
            GreenPlateError::Query(err) => write!(f, "{}", err),
            GreenPlateError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GreenPlateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GreenPlateError::Storage(err) => Some(err),
            GreenPlateError::Fetch(err) => Some(err),
            GreenPlateError::Query(err) => Some(err),
            GreenPlateError::Config(err) => Some(err),
        }
    }
}

impl From<StorageError> for GreenPlateError {
    fn from(err: StorageError) -> Self {
        GreenPlateError::Storage(err)
    }
}

impl From<FetchError> for GreenPlateError {
    fn from(err: FetchError) -> Self {
        GreenPlateError::Fetch(err)
    }
}

impl From<HttpError> for GreenPlateError {
    fn from(err: HttpError) -> Self {
        GreenPlateError::Fetch(err.into())
    }
}

impl From<QueryError> for GreenPlateError {
    fn from(err: QueryError) -> Self {
        GreenPlateError::Query(err)
    }
}

impl From<ConfigError> for GreenPlateError {
    fn from(err: ConfigError) -> Self {
        GreenPlateError::Config(err)
    }
}
