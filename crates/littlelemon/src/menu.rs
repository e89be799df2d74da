//! Core menu types for littlelemon.
//!
//! This module defines the menu item record shared by the remote feed and the
//! local store, the fixed category set, and the filter selection used by the
//! menu browser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A menu category.
///
/// The set is fixed and ordered; [`Category::ALL`] gives the display order
/// that filter selections are aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Starters.
    Starters,
    /// Main courses.
    Mains,
    /// Desserts.
    Desserts,
    /// Drinks.
    Drinks,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Starters,
        Category::Mains,
        Category::Desserts,
        Category::Drinks,
    ];

    /// The lowercase name used in the feed and in storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starters => "starters",
            Self::Mains => "mains",
            Self::Desserts => "desserts",
            Self::Drinks => "drinks",
        }
    }

    /// The capitalized label shown on filter buttons.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Starters => "Starters",
            Self::Mains => "Mains",
            Self::Desserts => "Desserts",
            Self::Drinks => "Drinks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown menu category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A single dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Dish name.
    pub name: String,
    /// Price in dollars.
    pub price: f64,
    /// Short description.
    pub description: String,
    /// Image file name, resolved against the image base URL at render time.
    pub image: String,
    /// Menu section.
    pub category: Category,
}

impl MenuItem {
    /// Price rendered with two decimals, e.g. `12.99`.
    #[must_use]
    pub fn formatted_price(&self) -> String {
        format!("{:.2}", self.price)
    }

    /// Full URL of the item's image under `base`.
    #[must_use]
    pub fn image_url(&self, base: &str) -> String {
        format!("{}/{}?raw=true", base.trim_end_matches('/'), self.image)
    }
}

/// Which category filters are switched on.
///
/// Always holds exactly one flag per entry of [`Category::ALL`]. No flag set
/// means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    flags: [bool; Category::ALL.len()],
}

impl FilterSelection {
    /// A selection with every flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection with the given categories switched on.
    #[must_use]
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut selection = Self::new();
        for category in categories {
            selection.set(*category, true);
        }
        selection
    }

    /// Flip the flag at `index`. Returns `false` if the index is out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    /// Set the flag for a category.
    pub fn set(&mut self, category: Category, on: bool) {
        if let Some(index) = Category::ALL.iter().position(|c| *c == category) {
            self.flags[index] = on;
        }
    }

    /// Whether the flag at `index` is on.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// The raw flags, aligned with [`Category::ALL`].
    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Whether no flag is on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.iter().all(|flag| !flag)
    }

    /// Categories a listing should be restricted to.
    ///
    /// With no flag on this is every category; otherwise exactly the flagged
    /// ones, in display order.
    #[must_use]
    pub fn active_categories(&self) -> Vec<Category> {
        if self.is_empty() {
            return Category::ALL.to_vec();
        }
        Category::ALL
            .into_iter()
            .zip(self.flags)
            .filter_map(|(category, on)| on.then_some(category))
            .collect()
    }
}
