use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, ImageUrl, SubcategoryName};

/// Taxonomy entry. Listings reference categories by name only, so nothing
/// prevents a listing from pointing at a deleted category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub subcategories: Vec<SubcategoryName>,
    pub icon_url: Option<ImageUrl>,
    pub created_at: NaiveDateTime,
}

impl Category {
    /// Copies the saved values onto this category.
    pub fn apply_update(&mut self, update: &CategoryUpdate) {
        self.name = update.name.clone();
        self.subcategories = update.subcategories.clone();
        self.icon_url = update.icon_url.clone();
    }
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub subcategories: Vec<SubcategoryName>,
    pub icon_url: Option<ImageUrl>,
    pub created_at: NaiveDateTime,
}

/// Values written when an existing category is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryUpdate {
    pub name: CategoryName,
    pub subcategories: Vec<SubcategoryName>,
    pub icon_url: Option<ImageUrl>,
}
