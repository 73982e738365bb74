//! Tracked food items and raw form input

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by the item store
pub type ItemId = u32;

/// A single food entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub calories: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, calories: u32) -> Self {
        Self {
            id,
            name: name.into(),
            calories,
        }
    }
}

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("item name is required")]
    MissingName,
    #[error("calorie count is required")]
    MissingCalories,
    #[error("invalid calorie count: {0:?}")]
    InvalidCalories(String),
    /// Every item id has been handed out; clear the list to start over
    #[error("no item ids left, clear the list to continue")]
    IdsExhausted,
}

/// Form values as typed by the user, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub calories: String,
}

impl ItemInput {
    pub fn new(name: impl Into<String>, calories: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calories: calories.into(),
        }
    }

    /// True when either field is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() || self.calories.trim().is_empty()
    }

    /// Validate into a trimmed name and a calorie count
    pub fn parse(&self) -> Result<(String, u32), InputError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InputError::MissingName);
        }
        let calories = parse_calories(&self.calories)?;
        Ok((name.to_string(), calories))
    }
}

/// Parse a calorie count: a non-negative integer, surrounding whitespace allowed.
///
/// Anything else (fractions, signs, trailing text, overflow) is rejected
/// rather than coerced.
pub fn parse_calories(raw: &str) -> Result<u32, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingCalories);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidCalories(raw.to_string()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| InputError::InvalidCalories(raw.to_string()))
}
