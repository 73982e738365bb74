//! Tracker configuration
//!
//! Persisted next to the item data under its own key. Missing or unreadable
//! config falls back to defaults.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::storage::{BlobStore, StorageError};

/// Storage key names and logging level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Key holding the serialized item collection
    pub items_key: String,
    /// Key holding the next item id
    pub next_id_key: String,
    /// Log level name ("error", "warn", "info", "debug", "trace", "off")
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            items_key: Self::DEFAULT_ITEMS_KEY.to_string(),
            next_id_key: Self::DEFAULT_NEXT_ID_KEY.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl TrackerConfig {
    pub const DEFAULT_ITEMS_KEY: &'static str = "items";
    pub const DEFAULT_NEXT_ID_KEY: &'static str = "items_next_id";

    /// Storage key for the config itself
    pub const STORAGE_KEY: &'static str = "calorie_tracker_config";

    /// Parsed log level, `Info` when unrecognized
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Load config from a blob store
    pub fn load(store: &impl BlobStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded tracker config");
                    return config;
                }
                Err(e) => log::warn!("Ignoring malformed tracker config: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read tracker config: {}", e),
        }

        log::info!("Using default tracker config");
        Self::default()
    }

    /// Save config to a blob store
    pub fn save(&self, store: &impl BlobStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(StorageError::Serialize)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Tracker config saved");
        Ok(())
    }
}
