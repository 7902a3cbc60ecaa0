//! In-memory key-value storage for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{KeyValueStorage, StorageError};

/// In-memory storage for testing.
///
/// Clones share the same records, so a test can hand one clone to a
/// session store, drop the store, and open a new one on the other clone to
/// simulate a process restart.
///
/// # Example
///
/// ```ignore
/// use green_plate::adapters::InMemoryStorage;
/// use green_plate::traits::KeyValueStorage;
///
/// let storage = InMemoryStorage::new();
/// storage.set_item("key", "value").await?;
/// assert_eq!(storage.get_item("key").await?, Some("value".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    /// Stored records
    records: Arc<Mutex<HashMap<String, String>>>,
    /// Whether reads should fail
    read_should_fail: Arc<Mutex<bool>>,
    /// Whether writes should fail
    write_should_fail: Arc<Mutex<bool>>,
    /// Whether removals should fail
    remove_should_fail: Arc<Mutex<bool>>,
    /// Number of successful writes
    writes: Arc<Mutex<usize>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one record.
    pub fn with_record(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.set_raw(key, Some(value));
        storage
    }

    /// Configure whether reads should fail.
    pub fn set_read_should_fail(&self, should_fail: bool) {
        *self.read_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether writes should fail.
    pub fn set_write_should_fail(&self, should_fail: bool) {
        *self.write_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether removals should fail.
    pub fn set_remove_should_fail(&self, should_fail: bool) {
        *self.remove_should_fail.lock().unwrap() = should_fail;
    }

    /// Read a record synchronously (for assertions).
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.lock().unwrap().get(key).cloned()
    }

    /// Set or delete a record synchronously (for test setup).
    pub fn set_raw(&self, key: &str, value: Option<&str>) {
        let mut records = self.records.lock().unwrap();
        match value {
            Some(value) => {
                records.insert(key.to_string(), value.to_string());
            }
            None => {
                records.remove(key);
            }
        }
    }

    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if *self.read_should_fail.lock().unwrap() {
            return Err(StorageError::ReadFailed("Mock read failure".to_string()));
        }
        Ok(self.raw(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.write_should_fail.lock().unwrap() {
            return Err(StorageError::WriteFailed("Mock write failure".to_string()));
        }
        self.set_raw(key, Some(value));
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if *self.remove_should_fail.lock().unwrap() {
            return Err(StorageError::RemoveFailed("Mock remove failure".to_string()));
        }
        self.set_raw(key, None);
        Ok(())
    }
}
