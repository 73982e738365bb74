//! Item persistence
//!
//! Mirrors the item collection as a JSON array under a single key, with the
//! id counter stored under a sibling key. Every write replaces the whole
//! collection.
//!
//! Reads fail closed: a malformed stored value is logged and treated as an
//! empty collection.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::item::{Item, ItemId};
use crate::storage::{BlobStore, StorageError};

/// Persistence adapter for the item collection
#[derive(Debug, Clone)]
pub struct ItemStorage<S> {
    store: S,
    items_key: String,
    next_id_key: String,
}

impl<S: BlobStore> ItemStorage<S> {
    /// Adapter using the default key names
    pub fn new(store: S) -> Self {
        Self::with_config(store, &TrackerConfig::default())
    }

    pub fn with_config(store: S, config: &TrackerConfig) -> Self {
        Self {
            store,
            items_key: config.items_key.clone(),
            next_id_key: config.next_id_key.clone(),
        }
    }

    /// Underlying blob store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn items_key(&self) -> &str {
        &self.items_key
    }

    /// Load the stored collection, surfacing corrupt data as an error
    pub fn try_load(&self) -> Result<Vec<Item>, StorageError> {
        match self.store.get(&self.items_key)? {
            Some(json) => serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
                key: self.items_key.clone(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Load the stored collection; absent or unreadable data is empty
    pub fn load(&self) -> Vec<Item> {
        match self.try_load() {
            Ok(items) => items,
            Err(e) => {
                log::warn!(
                    "Stored items under {:?} are unreadable and were discarded; \
                     the next save overwrites them: {}",
                    self.items_key,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection
    pub fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        self.write_json(&self.items_key, items)?;
        log::debug!("Items saved ({} entries)", items.len());
        Ok(())
    }

    /// Append an item and raise the stored counter past its id
    pub fn insert(&self, item: &Item) -> Result<(), StorageError> {
        let mut items = self.load();
        items.push(item.clone());
        self.save(&items)?;

        let next_id = u64::from(item.id) + 1;
        if self.load_next_id().is_none_or(|stored| stored < next_id) {
            self.save_next_id(next_id)?;
        }
        Ok(())
    }

    /// Replace the first stored item with the same id, keeping its position.
    ///
    /// The collection is re-saved even when nothing matches.
    pub fn replace(&self, item: &Item) -> Result<(), StorageError> {
        let mut items = self.load();
        if let Some(slot) = items.iter_mut().find(|i| i.id == item.id) {
            *slot = item.clone();
        }
        self.save(&items)
    }

    /// Remove the first stored item with `id`, if any
    pub fn remove(&self, id: ItemId) -> Result<(), StorageError> {
        let mut items = self.load();
        if let Some(pos) = items.iter().position(|i| i.id == id) {
            items.remove(pos);
        }
        self.save(&items)
    }

    /// Drop the collection and counter keys. Other keys are left alone.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.items_key)?;
        self.store.remove(&self.next_id_key)?;
        log::info!("Stored items cleared");
        Ok(())
    }

    /// Stored next id, `None` when absent or unreadable
    pub fn load_next_id(&self) -> Option<u64> {
        let json = match self.store.get(&self.next_id_key) {
            Ok(json) => json?,
            Err(e) => {
                log::warn!("Could not read item counter: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Discarding malformed item counter: {}", e);
                None
            }
        }
    }

    pub fn save_next_id(&self, next_id: u64) -> Result<(), StorageError> {
        self.write_json(&self.next_id_key, &next_id)
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(StorageError::Serialize)?;
        self.store.set(key, &json)
    }
}
