//! In-memory item collection
//!
//! The store is the authoritative copy of the list. Ids come from a
//! monotonic counter, so ids freed by deletion are never handed out again
//! until the whole list is cleared.
//!
//! The counter is wider than [`ItemId`] so that every stored id has a
//! successor; an add past the last representable id is rejected.

use crate::item::{InputError, Item, ItemId, ItemInput};
use crate::persistence::ItemStorage;
use crate::storage::BlobStore;

/// Whether the form is adding a new item or editing an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit(ItemId),
}

/// Item collection with the item currently being edited
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    current: Option<Item>,
    next_id: u64,
}

impl ItemStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing items. The counter is raised past every id
    /// already present.
    pub fn from_items(items: Vec<Item>, next_id: u64) -> Self {
        let floor = items
            .iter()
            .map(|i| u64::from(i.id) + 1)
            .max()
            .unwrap_or(0);
        Self {
            items,
            current: None,
            next_id: next_id.max(floor),
        }
    }

    /// Load the initial collection from persistence
    pub fn init<S: BlobStore>(storage: &ItemStorage<S>) -> Self {
        let items = storage.load();
        let next_id = storage.load_next_id().unwrap_or(0);
        let store = Self::from_items(items, next_id);
        log::info!(
            "Loaded {} items (next id {})",
            store.items.len(),
            store.next_id
        );
        store
    }

    /// All items in insertion order
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next added item will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Validate input and append a new item
    pub fn add(&mut self, input: &ItemInput) -> Result<Item, InputError> {
        let (name, calories) = input.parse()?;
        let id = ItemId::try_from(self.next_id).map_err(|_| InputError::IdsExhausted)?;
        let item = Item::new(id, name, calories);
        self.next_id += 1;
        self.items.push(item.clone());
        Ok(item)
    }

    /// Overwrite the current item's name and calories in place.
    ///
    /// Returns `Ok(None)` when nothing is being edited or the current item
    /// is no longer in the collection.
    pub fn update(&mut self, input: &ItemInput) -> Result<Option<Item>, InputError> {
        let (name, calories) = input.parse()?;
        let Some(current_id) = self.current.as_ref().map(|c| c.id) else {
            return Ok(None);
        };
        let Some(item) = self.items.iter_mut().find(|i| i.id == current_id) else {
            return Ok(None);
        };
        item.name = name;
        item.calories = calories;
        Ok(Some(item.clone()))
    }

    /// Remove the item with `id`, returning it if it was present
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Drop every item and start ids from 0 again
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
        self.next_id = 0;
    }

    /// Sum of calories over all items
    pub fn total_calories(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.calories)).sum()
    }

    pub fn by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current.as_ref()
    }

    /// Set or unset the item being edited. Not checked against the collection.
    pub fn set_current_item(&mut self, item: Option<Item>) {
        self.current = item;
    }

    pub fn mode(&self) -> Mode {
        match &self.current {
            Some(item) => Mode::Edit(item.id),
            None => Mode::Add,
        }
    }
}
