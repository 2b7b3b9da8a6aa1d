use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::types::{CategoryId, CategoryName, ImageUrl, SubcategoryName, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub icon_url: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

/// Diesel model representing the `category_subcategories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::category_subcategories)]
pub struct Subcategory {
    pub id: i32,
    pub category_id: String,
    pub position: i32,
    pub name: String,
}

/// Insertable form of [`Subcategory`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::category_subcategories)]
pub struct NewSubcategory<'a> {
    pub category_id: &'a str,
    pub position: i32,
    pub name: &'a str,
}

impl Category {
    /// Builds the domain category from the row and its ordered subcategories.
    pub fn into_domain(
        self,
        subcategories: Vec<Subcategory>,
    ) -> Result<DomainCategory, TypeConstraintError> {
        let icon_url = match self.icon_url {
            Some(url) if !url.trim().is_empty() => match ImageUrl::new(url) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("Ignoring icon of category {}: {e}", self.id);
                    None
                }
            },
            _ => None,
        };

        Ok(DomainCategory {
            id: CategoryId::new(self.id)?,
            name: CategoryName::new(self.name)?,
            subcategories: subcategories
                .into_iter()
                .map(|s| SubcategoryName::new(s.name))
                .collect::<Result<Vec<_>, _>>()?,
            icon_url,
            created_at: self.created_at,
        })
    }
}
