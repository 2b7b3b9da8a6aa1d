use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::asset_host::ImageUpload;
use crate::domain::listing::{ListingDetails, ListingUpdate, NewListing};
use crate::domain::types::{ImageUrl, ListingId, TypeConstraintError, optional_text};
use crate::forms::{ConfirmForm, ImageFileError, read_image};

/// Generates the multipart binding, its plain counterpart and the mapping
/// onto [`ListingDetails`] for the same list of text fields.
macro_rules! listing_form {
    ($($field:ident),* $(,)?) => {
        /// Create and edit form as posted by the browser.
        #[derive(MultipartForm)]
        pub struct ListingMultipartForm {
            $(pub $field: Option<Text<String>>,)*
            pub status: Option<Text<String>>,
            #[multipart(limit = "10MB")]
            pub image: Option<TempFile>,
        }

        /// Text part of [`ListingMultipartForm`].
        #[derive(Debug, Default, Deserialize)]
        pub struct ListingForm {
            $(pub $field: Option<String>,)*
            pub status: Option<String>,
        }

        impl ListingMultipartForm {
            /// Splits the text fields from the optional image file.
            pub fn into_parts(self) -> (ListingForm, Option<TempFile>) {
                let form = ListingForm {
                    $($field: self.$field.map(|text| text.0),)*
                    status: self.status.map(|text| text.0),
                };
                (form, self.image)
            }
        }

        fn details_from(form: &ListingForm) -> ListingDetails {
            ListingDetails {
                $($field: optional_text(form.$field.as_deref()),)*
            }
        }
    };
}

listing_form!(
    full_name,
    post_title,
    description,
    phone,
    email,
    location,
    dni,
    professional_license,
    address,
    company_name,
    contact_number,
    short_description,
    long_description,
    facebook_page,
    website,
    category,
    subcategory,
    qualification,
);

/// Maps the status selector: `active`, `inactive`, or blank for "not set".
fn parse_status(value: Option<&str>) -> Result<Option<bool>, TypeConstraintError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some("active") => Ok(Some(true)),
        Some("inactive") => Ok(Some(false)),
        Some(other) => Err(TypeConstraintError::InvalidValue(format!(
            "unknown status '{other}'"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingFormPayload {
    pub details: ListingDetails,
    pub status: Option<bool>,
}

impl ListingFormPayload {
    /// New listings are inactive unless a status was chosen.
    pub fn into_new_listing(self, created_at: NaiveDateTime) -> NewListing {
        NewListing {
            details: self.details,
            status: Some(self.status.unwrap_or(false)),
            image_url: None,
            created_at,
        }
    }

    /// Full set of values to persist, carrying over the image URL currently
    /// held by the form.
    pub fn into_update(self, image_url: Option<ImageUrl>) -> ListingUpdate {
        ListingUpdate {
            details: self.details,
            status: self.status,
            image_url,
        }
    }
}

#[derive(Debug, Error)]
pub enum ListingFormError {
    #[error("Listing form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Listing image rejected: {0}")]
    Image(#[from] ImageFileError),
}

impl From<TypeConstraintError> for ListingFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ListingForm> for ListingFormPayload {
    type Error = ListingFormError;

    fn try_from(value: ListingForm) -> Result<Self, Self::Error> {
        Ok(Self {
            details: details_from(&value),
            status: parse_status(value.status.as_deref())?,
        })
    }
}

impl ListingMultipartForm {
    /// Validated text fields plus the image to upload, if one was chosen.
    pub fn into_payload(
        self,
    ) -> Result<(ListingFormPayload, Option<ImageUpload>), ListingFormError> {
        let (form, image) = self.into_parts();
        let payload = ListingFormPayload::try_from(form)?;
        let image = match image {
            Some(file) => read_image(file)?,
            None => None,
        };
        Ok((payload, image))
    }
}

#[derive(MultipartForm)]
pub struct GalleryUploadForm {
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryUploadFormPayload {
    pub images: Vec<ImageUpload>,
}

#[derive(Debug, Error)]
pub enum GalleryUploadFormError {
    #[error("Selecciona al menos una imagen.")]
    Empty,
    #[error("Gallery image rejected: {0}")]
    Image(#[from] ImageFileError),
}

impl TryFrom<GalleryUploadForm> for GalleryUploadFormPayload {
    type Error = GalleryUploadFormError;

    fn try_from(value: GalleryUploadForm) -> Result<Self, Self::Error> {
        let mut images = Vec::with_capacity(value.images.len());
        for file in value.images {
            if let Some(image) = read_image(file)? {
                images.push(image);
            }
        }
        if images.is_empty() {
            return Err(GalleryUploadFormError::Empty);
        }
        Ok(Self { images })
    }
}

#[derive(Deserialize, Validate)]
pub struct RemoveGalleryImageForm {
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveGalleryImageFormPayload {
    pub listing_id: ListingId,
    pub url: ImageUrl,
}

#[derive(Debug, Error)]
pub enum RemoveGalleryImageFormError {
    #[error("Remove image form validation failed: {0}")]
    Validation(String),
    #[error("Remove image form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RemoveGalleryImageFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RemoveGalleryImageFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl RemoveGalleryImageFormPayload {
    pub fn from_form(
        listing_id: String,
        form: RemoveGalleryImageForm,
    ) -> Result<Self, RemoveGalleryImageFormError> {
        form.validate()?;
        Ok(Self {
            listing_id: ListingId::new(listing_id)?,
            url: ImageUrl::new(form.url)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteListingFormPayload {
    pub listing_id: ListingId,
    pub confirmed: bool,
}

#[derive(Debug, Error)]
pub enum DeleteListingFormError {
    #[error("Delete listing form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for DeleteListingFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl DeleteListingFormPayload {
    pub fn from_form(listing_id: String, form: &ConfirmForm) -> Result<Self, DeleteListingFormError> {
        Ok(Self {
            listing_id: ListingId::new(listing_id)?,
            confirmed: form.is_confirmed(),
        })
    }
}
