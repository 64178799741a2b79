use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{SessionStorage, StorageError};

/// In-memory slot storage.
///
/// Used in tests and as the fallback when durable storage cannot be opened
/// (the session then lasts only as long as the process).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value exceeds `bytes`, like a browser storage quota.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    fn poisoned() -> StorageError {
        StorageError::Backend("memory storage lock poisoned".to_string())
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.read().map_err(|_| Self::poisoned())?;
        Ok(slots.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota.filter(|quota| value.len() > *quota) {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                quota,
            });
        }
        let mut slots = self.slots.write().map_err(|_| Self::poisoned())?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| Self::poisoned())?;
        slots.remove(key);
        Ok(())
    }
}
