//! Application controller
//!
//! Applies user intents to the item store, mirrors every mutation to
//! persistence, and pushes the resulting list to a [`View`].
//!
//! Persistence is written synchronously inside [`App::dispatch`], so the
//! stored collection equals the in-memory one whenever `dispatch` returns.

use thiserror::Error;

use crate::item::{InputError, Item, ItemId, ItemInput};
use crate::persistence::ItemStorage;
use crate::storage::{BlobStore, StorageError};
use crate::store::{ItemStore, Mode};
use crate::ui::MISSING_INPUT_PROMPT;

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Submit the form in add-mode
    Add(ItemInput),
    /// Start editing an item from the list
    Edit(ItemId),
    /// Submit the form in edit-mode
    Update(ItemInput),
    /// Delete the item being edited
    Delete,
    /// Leave edit-mode without changes
    Cancel,
    /// Remove every item
    ClearAll,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Presentation sink driven by the controller
pub trait View {
    /// Show the full list and the running total
    fn render(&mut self, items: &[Item], total: u64);

    /// Fill the form with `item` and switch the buttons to edit-mode
    fn show_edit_state(&mut self, item: &Item);

    /// Clear the form and switch the buttons back to add-mode
    fn clear_edit_state(&mut self);

    /// Show a message to the user
    fn notify(&mut self, message: &str);
}

/// The running application: store, persistence and view
pub struct App<S, V> {
    store: ItemStore,
    storage: ItemStorage<S>,
    view: V,
}

impl<S: BlobStore, V: View> App<S, V> {
    /// Load persisted items and draw the initial screen
    pub fn new(storage: ItemStorage<S>, view: V) -> Self {
        let store = ItemStore::init(&storage);
        let mut app = Self {
            store,
            storage,
            view,
        };
        app.view.clear_edit_state();
        app.refresh();
        app
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn storage(&self) -> &ItemStorage<S> {
        &self.storage
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn mode(&self) -> Mode {
        self.store.mode()
    }

    /// Handle one intent to completion
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), AppError> {
        log::debug!("Dispatching {:?}", intent);
        match intent {
            Intent::Add(input) => self.add(&input),
            Intent::Edit(id) => {
                self.edit(id);
                Ok(())
            }
            Intent::Update(input) => self.update(&input),
            Intent::Delete => self.delete(),
            Intent::Cancel => {
                self.leave_edit_mode();
                Ok(())
            }
            Intent::ClearAll => self.clear_all(),
        }
    }

    fn add(&mut self, input: &ItemInput) -> Result<(), AppError> {
        self.require_filled(input)?;

        let item = match self.store.add(input) {
            Ok(item) => item,
            Err(e) => return Err(self.reject(e)),
        };
        log::info!("Added item {} ({} kcal)", item.id, item.calories);

        self.storage.insert(&item)?;
        self.refresh();
        self.view.clear_edit_state();
        Ok(())
    }

    fn edit(&mut self, id: ItemId) {
        let Some(item) = self.store.by_id(id).cloned() else {
            log::debug!("Ignoring edit of unknown item {}", id);
            return;
        };
        self.view.show_edit_state(&item);
        self.store.set_current_item(Some(item));
    }

    fn update(&mut self, input: &ItemInput) -> Result<(), AppError> {
        self.require_filled(input)?;

        let updated = match self.store.update(input) {
            Ok(updated) => updated,
            Err(e) => return Err(self.reject(e)),
        };

        match updated {
            Some(item) => {
                log::info!("Updated item {} ({} kcal)", item.id, item.calories);
                self.storage.replace(&item)?;
            }
            None => log::debug!("Update with no matching current item"),
        }

        self.refresh();
        self.leave_edit_mode();
        Ok(())
    }

    fn delete(&mut self) -> Result<(), AppError> {
        let Some(id) = self.store.current_item().map(|item| item.id) else {
            log::debug!("Delete with no current item");
            self.leave_edit_mode();
            return Ok(());
        };

        if self.store.remove(id).is_some() {
            log::info!("Deleted item {}", id);
            self.storage.remove(id)?;
        }

        self.refresh();
        self.leave_edit_mode();
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), AppError> {
        self.store.clear();
        self.storage.clear()?;
        log::info!("Cleared all items");

        self.refresh();
        self.view.clear_edit_state();
        Ok(())
    }

    fn leave_edit_mode(&mut self) {
        self.store.set_current_item(None);
        self.view.clear_edit_state();
    }

    /// Both form fields must be filled before the store sees the input
    fn require_filled(&mut self, input: &ItemInput) -> Result<(), AppError> {
        if !input.is_blank() {
            return Ok(());
        }
        self.view.notify(MISSING_INPUT_PROMPT);
        let err = if input.name.trim().is_empty() {
            InputError::MissingName
        } else {
            InputError::MissingCalories
        };
        Err(err.into())
    }

    fn reject(&mut self, err: InputError) -> AppError {
        log::warn!("Rejected input: {}", err);
        self.view.notify(&err.to_string());
        err.into()
    }

    fn refresh(&mut self) {
        let total = self.store.total_calories();
        self.view.render(self.store.all(), total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Render(Vec<Item>, u64),
        ShowEdit(Item),
        ClearEdit,
        Notify(String),
    }

    #[derive(Debug, Default)]
    struct RecordingView {
        events: Vec<Event>,
    }

    impl RecordingView {
        fn last_render(&self) -> Option<(&[Item], u64)> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Render(items, total) => Some((items.as_slice(), *total)),
                _ => None,
            })
        }

        fn notifications(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Notify(msg) => Some(msg.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl View for RecordingView {
        fn render(&mut self, items: &[Item], total: u64) {
            self.events.push(Event::Render(items.to_vec(), total));
        }

        fn show_edit_state(&mut self, item: &Item) {
            self.events.push(Event::ShowEdit(item.clone()));
        }

        fn clear_edit_state(&mut self) {
            self.events.push(Event::ClearEdit);
        }

        fn notify(&mut self, message: &str) {
            self.events.push(Event::Notify(message.to_string()));
        }
    }

    fn app_with(blobs: MemoryStore) -> App<MemoryStore, RecordingView> {
        App::new(ItemStorage::new(blobs), RecordingView::default())
    }

    fn add(name: &str, calories: &str) -> Intent {
        Intent::Add(ItemInput::new(name, calories))
    }

    fn assert_mirrored(app: &App<MemoryStore, RecordingView>) {
        assert_eq!(app.storage().try_load().unwrap(), app.store().all());
    }

    #[test]
    fn test_initial_render_of_empty_list() {
        let app = app_with(MemoryStore::new());
        assert_eq!(app.view().last_render(), Some((&[][..], 0)));
        assert_eq!(app.mode(), Mode::Add);
    }

    #[test]
    fn test_breakfast_session_stays_mirrored() {
        let mut app = app_with(MemoryStore::new());

        app.dispatch(add("Eggs", "300")).unwrap();
        assert_mirrored(&app);
        app.dispatch(add("Toast", "150")).unwrap();
        assert_mirrored(&app);
        assert_eq!(app.view().last_render().unwrap().1, 450);

        app.dispatch(Intent::Edit(0)).unwrap();
        assert_eq!(app.mode(), Mode::Edit(0));
        assert!(app.view().events.contains(&Event::ShowEdit(Item::new(0, "Eggs", 300))));

        app.dispatch(Intent::Update(ItemInput::new("Eggs", "320"))).unwrap();
        assert_mirrored(&app);
        assert_eq!(app.mode(), Mode::Add);
        assert_eq!(app.view().last_render().unwrap().1, 470);

        app.dispatch(Intent::Edit(1)).unwrap();
        app.dispatch(Intent::Delete).unwrap();
        assert_mirrored(&app);
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.view().last_render().unwrap().1, 320);

        app.dispatch(Intent::ClearAll).unwrap();
        assert_mirrored(&app);
        assert_eq!(app.view().last_render(), Some((&[][..], 0)));
    }

    #[test]
    fn test_blank_input_prompts_without_mutating() {
        let blobs = MemoryStore::new();
        let mut app = app_with(blobs.clone());

        let err = app.dispatch(add("", "100")).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingName)));
        let err = app.dispatch(add("Soup", "  ")).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingCalories)));

        assert_eq!(
            app.view().notifications(),
            vec![MISSING_INPUT_PROMPT, MISSING_INPUT_PROMPT]
        );
        assert!(app.store().is_empty());
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_invalid_calories_rejected() {
        let mut app = app_with(MemoryStore::new());
        let err = app.dispatch(add("Cake", "a lot")).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::InvalidCalories(_))));
        assert_eq!(app.view().notifications().len(), 1);
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_invalid_update_stays_in_edit_mode() {
        let mut app = app_with(MemoryStore::new());
        app.dispatch(add("Eggs", "300")).unwrap();
        app.dispatch(Intent::Edit(0)).unwrap();

        assert!(app.dispatch(Intent::Update(ItemInput::new("Eggs", "-1"))).is_err());
        assert_eq!(app.mode(), Mode::Edit(0));
        assert_eq!(app.store().by_id(0).unwrap().calories, 300);
        assert_mirrored(&app);
    }

    #[test]
    fn test_blank_update_prompts_like_add() {
        let mut app = app_with(MemoryStore::new());
        app.dispatch(add("Eggs", "300")).unwrap();
        app.dispatch(Intent::Edit(0)).unwrap();

        let err = app
            .dispatch(Intent::Update(ItemInput::new(" ", "320")))
            .unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingName)));
        let err = app
            .dispatch(Intent::Update(ItemInput::new("Eggs", "")))
            .unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingCalories)));

        assert_eq!(
            app.view().notifications(),
            vec![MISSING_INPUT_PROMPT, MISSING_INPUT_PROMPT]
        );
        assert_eq!(app.mode(), Mode::Edit(0));
        assert_eq!(app.store().by_id(0), Some(&Item::new(0, "Eggs", 300)));
    }

    #[test]
    fn test_add_rejected_when_ids_run_out() {
        let blobs = MemoryStore::new();
        ItemStorage::new(blobs.clone())
            .save(&[Item::new(ItemId::MAX, "Last", 1)])
            .unwrap();
        let mut app = app_with(blobs);

        let err = app.dispatch(add("New", "2")).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::IdsExhausted)));
        assert_eq!(app.store().len(), 1);
        assert_mirrored(&app);

        app.dispatch(Intent::ClearAll).unwrap();
        app.dispatch(add("New", "2")).unwrap();
        assert_eq!(app.store().all(), &[Item::new(0, "New", 2)]);
    }

    #[test]
    fn test_cancel_returns_to_add_mode() {
        let mut app = app_with(MemoryStore::new());
        app.dispatch(add("Eggs", "300")).unwrap();
        app.dispatch(Intent::Edit(0)).unwrap();
        app.dispatch(Intent::Cancel).unwrap();

        assert_eq!(app.mode(), Mode::Add);
        assert_eq!(app.view().events.last(), Some(&Event::ClearEdit));
        assert_eq!(app.store().by_id(0).unwrap().calories, 300);
    }

    #[test]
    fn test_edit_unknown_id_is_ignored() {
        let mut app = app_with(MemoryStore::new());
        app.dispatch(Intent::Edit(9)).unwrap();
        assert_eq!(app.mode(), Mode::Add);
    }

    #[test]
    fn test_update_and_delete_without_edit_are_no_ops() {
        let mut app = app_with(MemoryStore::new());
        app.dispatch(add("Eggs", "300")).unwrap();

        app.dispatch(Intent::Update(ItemInput::new("Eggs", "1"))).unwrap();
        app.dispatch(Intent::Delete).unwrap();
        assert_eq!(app.store().all(), &[Item::new(0, "Eggs", 300)]);
        assert_mirrored(&app);
    }

    #[test]
    fn test_reload_restores_items_and_counter() {
        let blobs = MemoryStore::new();
        {
            let mut app = app_with(blobs.clone());
            app.dispatch(add("Eggs", "300")).unwrap();
            app.dispatch(add("Toast", "150")).unwrap();
            app.dispatch(Intent::Edit(1)).unwrap();
            app.dispatch(Intent::Delete).unwrap();
        }

        let mut app = app_with(blobs);
        assert_eq!(app.store().all(), &[Item::new(0, "Eggs", 300)]);
        assert_eq!(app.view().last_render().unwrap().1, 300);

        app.dispatch(add("Jam", "50")).unwrap();
        assert_eq!(app.store().by_id(2).map(|i| i.name.as_str()), Some("Jam"));
        assert_mirrored(&app);
    }

    #[test]
    fn test_clear_all_keeps_unrelated_keys() {
        let blobs = MemoryStore::new();
        blobs.set("theme", "dark").unwrap();
        let mut app = app_with(blobs.clone());
        app.dispatch(add("Eggs", "300")).unwrap();

        app.dispatch(Intent::ClearAll).unwrap();
        assert_eq!(blobs.keys(), vec!["theme".to_string()]);
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let blobs = MemoryStore::new();
        blobs.set("items", "not json").unwrap();
        let mut app = app_with(blobs);
        assert!(app.store().is_empty());

        app.dispatch(add("Eggs", "300")).unwrap();
        assert_mirrored(&app);
    }

    #[test]
    fn test_last_writer_wins_across_tabs() {
        let blobs = MemoryStore::new();
        let mut tab_a = app_with(blobs.clone());
        let mut tab_b = app_with(blobs.clone());

        tab_a.dispatch(add("Eggs", "300")).unwrap();
        tab_b.dispatch(Intent::ClearAll).unwrap();

        assert_eq!(tab_a.store().len(), 1);
        assert!(ItemStorage::new(blobs).load().is_empty());
    }

    fn arb_input() -> impl Strategy<Value = ItemInput> {
        let calories = prop_oneof![
            6 => (0u32..2000).prop_map(|c| c.to_string()),
            1 => Just(String::new()),
            1 => Just("lots".to_string()),
        ];
        ("[a-z]{0,6}", calories).prop_map(|(name, calories)| ItemInput::new(name, calories))
    }

    fn arb_intent() -> impl Strategy<Value = Intent> {
        prop_oneof![
            4 => arb_input().prop_map(Intent::Add),
            2 => (0u32..12).prop_map(Intent::Edit),
            2 => arb_input().prop_map(Intent::Update),
            2 => Just(Intent::Delete),
            1 => Just(Intent::Cancel),
            1 => Just(Intent::ClearAll),
        ]
    }

    proptest! {
        #[test]
        fn prop_storage_mirrors_store_after_every_intent(
            intents in prop::collection::vec(arb_intent(), 0..40)
        ) {
            let blobs = MemoryStore::new();
            let mut app = app_with(blobs.clone());
            for intent in intents {
                let _ = app.dispatch(intent);
                prop_assert_eq!(app.storage().try_load().unwrap(), app.store().all());

                let reloaded = ItemStore::init(&ItemStorage::new(blobs.clone()));
                prop_assert_eq!(reloaded.all(), app.store().all());
                prop_assert_eq!(reloaded.next_id(), app.store().next_id());
            }
        }
    }
}
