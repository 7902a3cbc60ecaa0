//! File-based key-value storage adapter.
//!
//! Each key maps to one JSON file inside a data directory. The key is
//! percent-encoded into the file name so keys like `@clean_plate:auth`
//! stay valid on every platform.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::traits::{KeyValueStorage, StorageError};

/// Extension appended to every record file.
const RECORD_EXTENSION: &str = "json";

/// File-backed [`KeyValueStorage`].
///
/// # Example
///
/// ```ignore
/// use green_plate::adapters::FileStorage;
/// use green_plate::traits::KeyValueStorage;
///
/// let storage = FileStorage::new("/tmp/green-plate");
/// storage.set_item("@clean_plate:auth", r#"{"user":null}"#).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created lazily
    /// on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let encoded = urlencoding::encode(key);
        self.root.join(format!("{}.{}", encoded, RECORD_EXTENSION))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("{}: {}", path.display(), e))),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", self.root.display(), e)))?;

        // Write to a sibling temp file first so a crash never leaves half a record.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!(key, path = %path.display(), "Stored record");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Removed record");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFailed(format!("{}: {}", path.display(), e))),
        }
    }
}
