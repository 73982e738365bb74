//! List markup and element-id helpers for the DOM view
//!
//! Pure string functions, so they are usable and testable off the browser.

use crate::item::{Item, ItemId};

/// Prefix of each list entry's element id (`item-3`)
pub const ITEM_ELEMENT_PREFIX: &str = "item-";

/// Class carried by the edit icon inside each list entry
pub const EDIT_ICON_CLASS: &str = "edit-item";

/// Prompt shown when the form is submitted with an empty field
pub const MISSING_INPUT_PROMPT: &str = "Please fill in the input";

pub fn item_element_id(id: ItemId) -> String {
    format!("{}{}", ITEM_ELEMENT_PREFIX, id)
}

/// Inverse of [`item_element_id`]
pub fn parse_item_element_id(element_id: &str) -> Option<ItemId> {
    element_id.strip_prefix(ITEM_ELEMENT_PREFIX)?.parse().ok()
}

/// "Eggs: 300 Calories"
pub fn item_label(item: &Item) -> String {
    format!("{}: {} Calories", item.name, item.calories)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inner markup of one list entry
pub fn render_item_html(item: &Item) -> String {
    format!(
        "<strong>{}: <em>{} Calories</em></strong>\
         <a href=\"#\" class=\"secondary-content\"><i class=\"{} bi bi-pencil\"></i></a>",
        escape_html(&item.name),
        item.calories,
        EDIT_ICON_CLASS
    )
}

/// Markup for the whole list
pub fn render_item_list_html(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "<li class=\"collection-item\" id=\"{}\">{}</li>",
                item_element_id(item.id),
                render_item_html(item)
            )
        })
        .collect()
}

/// CSS display value for the list: hidden when there is nothing to show
pub fn list_display(items: &[Item]) -> &'static str {
    if items.is_empty() { "none" } else { "block" }
}
