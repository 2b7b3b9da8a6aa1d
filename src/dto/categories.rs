use serde::Serialize;

use crate::domain::category::Category;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<String>,
    pub icon_url: Option<String>,
}

impl From<&Category> for CategoryDto {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id.as_str().to_string(),
            name: value.name.as_str().to_string(),
            subcategories: value
                .subcategories
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            icon_url: value.icon_url.as_ref().map(|u| u.as_str().to_string()),
        }
    }
}
