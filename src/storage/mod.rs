//! Key-value blob storage
//!
//! The tracker only needs string values under string keys, which is exactly
//! what the browser's LocalStorage offers. Native builds and tests use
//! [`MemoryStore`] instead.

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

/// Storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage backend is reachable (no window, storage disabled)
    #[error("storage is unavailable")]
    Unavailable,
    /// The backend rejected the operation (quota, security error)
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A value could not be encoded as JSON
    #[error("failed to serialize value: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Stored value under `key` is not valid JSON for the expected type
    #[error("corrupt value under key {key:?}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Opaque string store keyed by name
pub trait BlobStore {
    /// Read a value; an absent key is `Ok(None)`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key (absent keys are ignored)
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key in the store
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same map, like tabs sharing one
/// LocalStorage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Stored keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}
