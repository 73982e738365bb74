//! Calorie Tracker entry point
//!
//! On the web this wires the DOM form to the controller. Natively it runs a
//! short scripted session against an in-memory store and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use calorie_tracker::storage::LocalStorage;
    use calorie_tracker::ui::{
        EDIT_ICON_CLASS, list_display, parse_item_element_id, render_item_list_html,
    };
    use calorie_tracker::{App, AppError, Intent, Item, ItemInput, ItemStorage, TrackerConfig, View};

    const ITEM_LIST: &str = "#item-list";
    const NAME_INPUT: &str = "#item-name";
    const CALORIES_INPUT: &str = "#item-calories";
    const TOTAL_CALORIES: &str = ".total-calories";
    const ADD_BTN: &str = ".add-btn";
    const UPDATE_BTN: &str = ".update-btn";
    const DELETE_BTN: &str = ".delete-btn";
    const BACK_BTN: &str = ".back-btn";
    const CLEAR_BTN: &str = ".clear-btn";

    /// Renders into the page's form and list
    struct DomView {
        document: Document,
    }

    impl DomView {
        fn query(&self, selector: &str) -> Option<Element> {
            self.document.query_selector(selector).ok().flatten()
        }

        fn input(&self, selector: &str) -> Option<HtmlInputElement> {
            self.query(selector)?.dyn_into().ok()
        }

        fn set_display(&self, selector: &str, display: &str) {
            if let Some(el) = self
                .query(selector)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = el.style().set_property("display", display);
            }
        }

        fn set_form(&self, name: &str, calories: &str) {
            if let Some(el) = self.input(NAME_INPUT) {
                el.set_value(name);
            }
            if let Some(el) = self.input(CALORIES_INPUT) {
                el.set_value(calories);
            }
        }

        /// Current form values
        fn read_form(&self) -> ItemInput {
            ItemInput::new(
                self.input(NAME_INPUT).map(|el| el.value()).unwrap_or_default(),
                self.input(CALORIES_INPUT).map(|el| el.value()).unwrap_or_default(),
            )
        }
    }

    impl View for DomView {
        fn render(&mut self, items: &[Item], total: u64) {
            if let Some(list) = self.query(ITEM_LIST) {
                list.set_inner_html(&render_item_list_html(items));
            }
            self.set_display(ITEM_LIST, list_display(items));
            if let Some(el) = self.query(TOTAL_CALORIES) {
                el.set_text_content(Some(&total.to_string()));
            }
        }

        fn show_edit_state(&mut self, item: &Item) {
            self.set_form(&item.name, &item.calories.to_string());
            self.set_display(UPDATE_BTN, "inline");
            self.set_display(DELETE_BTN, "inline");
            self.set_display(BACK_BTN, "inline");
            self.set_display(ADD_BTN, "none");
        }

        fn clear_edit_state(&mut self) {
            self.set_form("", "");
            self.set_display(UPDATE_BTN, "none");
            self.set_display(DELETE_BTN, "none");
            self.set_display(BACK_BTN, "none");
            self.set_display(ADD_BTN, "inline");
        }

        fn notify(&mut self, message: &str) {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }
    }

    type SharedApp = Rc<RefCell<App<LocalStorage, DomView>>>;

    fn dispatch(app: &SharedApp, intent: Intent) {
        match app.borrow_mut().dispatch(intent) {
            Ok(()) => {}
            Err(AppError::Input(e)) => log::debug!("Input rejected: {}", e),
            Err(e) => log::error!("Intent failed: {}", e),
        }
    }

    /// Attach a click handler to the first element matching `selector`
    fn on_click(
        document: &Document,
        selector: &str,
        app: SharedApp,
        handler: impl Fn(&SharedApp, &MouseEvent) + 'static,
    ) {
        let Some(el) = document.query_selector(selector).ok().flatten() else {
            log::warn!("Missing element {}", selector);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.prevent_default();
            handler(&app, &event);
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Id of the list entry whose edit icon was clicked
    fn clicked_item_id(event: &MouseEvent) -> Option<calorie_tracker::ItemId> {
        let target: Element = event.target()?.dyn_into().ok()?;
        if !target.class_list().contains(EDIT_ICON_CLASS) {
            return None;
        }
        let entry = target.closest("li").ok()??;
        parse_item_element_id(&entry.id())
    }

    fn setup_handlers(document: &Document, app: &SharedApp) {
        on_click(document, ADD_BTN, app.clone(), |app, _| {
            let input = app.borrow().view().read_form();
            dispatch(app, Intent::Add(input));
        });

        on_click(document, ITEM_LIST, app.clone(), |app, event| {
            if let Some(id) = clicked_item_id(event) {
                dispatch(app, Intent::Edit(id));
            }
        });

        on_click(document, UPDATE_BTN, app.clone(), |app, _| {
            let input = app.borrow().view().read_form();
            dispatch(app, Intent::Update(input));
        });

        on_click(document, DELETE_BTN, app.clone(), |app, _| {
            dispatch(app, Intent::Delete);
        });

        on_click(document, BACK_BTN, app.clone(), |app, _| {
            dispatch(app, Intent::Cancel);
        });

        on_click(document, CLEAR_BTN, app.clone(), |app, _| {
            dispatch(app, Intent::ClearAll);
        });

        // Enter in the form must not submit it
        if let Some(form) = document.query_selector("form").ok().flatten() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    event.prevent_default();
                }
            });
            let _ = form.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Trace).expect("Failed to init logger");
        log::set_max_level(log::LevelFilter::Info);

        log::info!("Calorie Tracker starting...");

        let storage = match LocalStorage::open() {
            Ok(storage) => storage,
            Err(e) => {
                log::error!("LocalStorage unavailable: {}", e);
                return;
            }
        };
        let config = TrackerConfig::load(&storage);
        log::set_max_level(config.log_level());

        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        let view = DomView {
            document: document.clone(),
        };
        let app = Rc::new(RefCell::new(App::new(
            ItemStorage::with_config(storage, &config),
            view,
        )));

        setup_handlers(&document, &app);

        log::info!("Calorie Tracker running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use calorie_tracker::ui::item_label;
    use calorie_tracker::{Item, View};

    /// Writes everything the page would show to the log
    pub struct LogView;

    impl View for LogView {
        fn render(&mut self, items: &[Item], total: u64) {
            for item in items {
                log::info!("  {}", item_label(item));
            }
            log::info!("Total calories: {}", total);
        }

        fn show_edit_state(&mut self, item: &Item) {
            log::info!("Editing {}", item_label(item));
        }

        fn clear_edit_state(&mut self) {
            log::debug!("Back to add mode");
        }

        fn notify(&mut self, message: &str) {
            log::warn!("{}", message);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use calorie_tracker::{App, Intent, ItemInput, ItemStorage, MemoryStore};

    env_logger::init();
    log::info!("Calorie Tracker (native) starting...");
    log::info!("The browser build is the real app - run with `trunk serve`");

    let storage = ItemStorage::new(MemoryStore::new());
    let mut app = App::new(storage, native::LogView);

    let session = [
        Intent::Add(ItemInput::new("Eggs", "300")),
        Intent::Add(ItemInput::new("Toast", "150")),
        Intent::Edit(0),
        Intent::Update(ItemInput::new("Eggs", "320")),
        Intent::Add(ItemInput::new("Cake", "lots")),
        Intent::Edit(1),
        Intent::Delete,
        Intent::ClearAll,
    ];
    for intent in session {
        if let Err(e) = app.dispatch(intent) {
            log::warn!("{}", e);
        }
    }

    println!(
        "Session finished with {} items ({} calories)",
        app.store().len(),
        app.store().total_calories()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
