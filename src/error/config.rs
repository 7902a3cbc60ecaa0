//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        variable: String,
        value: String,
        reason: String,
    },

    /// No platform data directory and no explicit override
    #[error("Could not determine a data directory")]
    NoDataDirectory,
}
