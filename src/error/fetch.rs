//! Errors produced by query fetchers.

use thiserror::Error;

use crate::traits::HttpError;

/// Failure of a single remote read or write.
///
/// `Clone` because one failed fetch is handed to every requester that was
/// waiting on it, and is kept on the cache entry afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport or status failure
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Response body did not match the expected shape
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The fetch task ended without producing a result
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_transient(),
            FetchError::Decode { .. } => false,
            FetchError::Aborted(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err: FetchError = HttpError::Timeout("30s".to_string()).into();
        assert_eq!(err.to_string(), "Request timeout: 30s");

        let err = FetchError::Decode {
            url: "/listings".to_string(),
            message: "expected array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode response from /listings: expected array"
        );
    }

    #[test]
    fn test_fetch_error_is_transient() {
        assert!(FetchError::Http(HttpError::ConnectionFailed("x".to_string())).is_transient());
        assert!(!FetchError::Decode {
            url: String::new(),
            message: String::new()
        }
        .is_transient());
    }
}
