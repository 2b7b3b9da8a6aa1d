use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::asset_host::ImageUpload;
use crate::domain::category::{CategoryUpdate, NewCategory};
use crate::domain::types::{
    CategoryId, CategoryName, ImageUrl, SubcategoryName, TypeConstraintError,
};
use crate::forms::{ConfirmForm, ImageFileError, read_image};

/// Category editor as posted by the browser. Each subcategory input is sent
/// under the same `subcategories` name.
#[derive(MultipartForm)]
pub struct CategoryMultipartForm {
    pub name: Text<String>,
    pub subcategories: Vec<Text<String>>,
    #[multipart(limit = "5MB")]
    pub icon: Option<TempFile>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl CategoryMultipartForm {
    pub fn into_parts(self) -> (CategoryForm, Option<TempFile>) {
        let form = CategoryForm {
            name: self.name.0,
            subcategories: self.subcategories.into_iter().map(|text| text.0).collect(),
        };
        (form, self.icon)
    }

    /// Validated fields plus the icon to upload, if one was chosen.
    pub fn into_payload(
        self,
    ) -> Result<(CategoryFormPayload, Option<ImageUpload>), CategoryFormError> {
        let (form, icon) = self.into_parts();
        let payload = CategoryFormPayload::try_from(form)?;
        let icon = match icon {
            Some(file) => read_image(file)?,
            None => None,
        };
        Ok((payload, icon))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
    pub subcategories: Vec<SubcategoryName>,
}

impl CategoryFormPayload {
    pub fn into_new_category(
        self,
        icon_url: Option<ImageUrl>,
        created_at: NaiveDateTime,
    ) -> NewCategory {
        NewCategory {
            name: self.name,
            subcategories: self.subcategories,
            icon_url,
            created_at,
        }
    }

    pub fn into_update(self, icon_url: Option<ImageUrl>) -> CategoryUpdate {
        CategoryUpdate {
            name: self.name,
            subcategories: self.subcategories,
            icon_url,
        }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Category icon rejected: {0}")]
    Icon(#[from] ImageFileError),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let subcategories = value
            .subcategories
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(SubcategoryName::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: CategoryName::new(value.name)?,
            subcategories,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryFormPayload {
    pub category_id: CategoryId,
    pub confirmed: bool,
}

#[derive(Debug, Error)]
pub enum DeleteCategoryFormError {
    #[error("Delete category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for DeleteCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl DeleteCategoryFormPayload {
    pub fn from_form(
        category_id: String,
        form: &ConfirmForm,
    ) -> Result<Self, DeleteCategoryFormError> {
        Ok(Self {
            category_id: CategoryId::new(category_id)?,
            confirmed: form.is_confirmed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_subcategories_are_dropped() {
        let form = CategoryForm {
            name: " Hogar ".into(),
            subcategories: vec!["Plomería".into(), "   ".into(), "".into(), " Pintura ".into()],
        };

        let payload: CategoryFormPayload = form.try_into().unwrap();

        assert_eq!(payload.name.as_str(), "Hogar");
        let subs: Vec<&str> = payload.subcategories.iter().map(|s| s.as_str()).collect();
        assert_eq!(subs, vec!["Plomería", "Pintura"]);
    }

    #[test]
    fn name_is_required() {
        let empty = CategoryForm {
            name: String::new(),
            subcategories: vec![],
        };
        assert!(CategoryFormPayload::try_from(empty).is_err());

        let blank = CategoryForm {
            name: "   ".into(),
            subcategories: vec![],
        };
        assert!(CategoryFormPayload::try_from(blank).is_err());
    }
}
