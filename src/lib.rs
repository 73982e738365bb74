//! Calorie Tracker - a browser calorie list with LocalStorage persistence
//!
//! Core modules:
//! - `item`: Item type and form input validation
//! - `store`: In-memory item collection, id counter, totals
//! - `storage`: Key-value blob stores (LocalStorage on web, in-memory natively)
//! - `persistence`: Mirrors the collection into a blob store
//! - `controller`: Applies user intents and drives a view
//! - `ui`: Markup helpers for the DOM view
//! - `config`: Persisted key names and log level

pub mod config;
pub mod controller;
pub mod item;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod ui;

pub use config::TrackerConfig;
pub use controller::{App, AppError, Intent, View};
pub use item::{InputError, Item, ItemId, ItemInput};
pub use persistence::ItemStorage;
pub use storage::{BlobStore, MemoryStore, StorageError};
pub use store::{ItemStore, Mode};
