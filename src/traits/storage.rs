//! Durable key-value storage trait abstraction.
//!
//! The session store mirrors its state into a single record through this
//! trait. Production uses [`FileStorage`](crate::adapters::FileStorage);
//! tests use [`InMemoryStorage`](crate::adapters::InMemoryStorage).

use async_trait::async_trait;

/// Durable storage operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Failed to read a record
    ReadFailed(String),
    /// Failed to write a record
    WriteFailed(String),
    /// Failed to remove a record
    RemoveFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ReadFailed(msg) => write!(f, "Failed to read record: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Failed to write record: {}", msg),
            StorageError::RemoveFailed(msg) => write!(f, "Failed to remove record: {}", msg),
            StorageError::Io(msg) => write!(f, "IO error: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Asynchronous string key-value storage.
///
/// # Returns
/// - `get_item`: `Ok(None)` when nothing is stored under the key
/// - `remove_item`: `Ok(())` when the key was already absent
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the raw value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::ReadFailed("locked".to_string()).to_string(),
            "Failed to read record: locked"
        );
        assert_eq!(
            StorageError::WriteFailed("disk full".to_string()).to_string(),
            "Failed to write record: disk full"
        );
        assert_eq!(
            StorageError::RemoveFailed("denied".to_string()).to_string(),
            "Failed to remove record: denied"
        );
        assert_eq!(
            StorageError::Io("broken pipe".to_string()).to_string(),
            "IO error: broken pipe"
        );
        assert_eq!(
            StorageError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
        assert_eq!(
            StorageError::Other("unknown".to_string()).to_string(),
            "Storage error: unknown"
        );
    }

    #[test]
    fn test_storage_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(msg) if msg.contains("nope")));
    }

    #[test]
    fn test_storage_error_implements_error_trait() {
        let err = StorageError::Other("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
