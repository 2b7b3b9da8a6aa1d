//! Conversions from form-level errors into [`ServiceError`].
//!
//! Form errors stay in `forms`, service errors in `services`; the glue lives
//! here so neither module has to know about the other.

use crate::domain::types::TypeConstraintError;
use crate::forms::ImageFileError;
use crate::forms::auth::LoginFormError;
use crate::forms::categories::{CategoryFormError, DeleteCategoryFormError};
use crate::forms::listings::{
    DeleteListingFormError, GalleryUploadFormError, ListingFormError,
    RemoveGalleryImageFormError,
};
use crate::forms::ratings::DeleteRatingFormError;
use crate::services::ServiceError;

macro_rules! into_form_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for ServiceError {
                fn from(val: $error) -> Self {
                    ServiceError::Form(val.to_string())
                }
            }
        )*
    };
}

into_form_error!(
    TypeConstraintError,
    ImageFileError,
    LoginFormError,
    CategoryFormError,
    DeleteCategoryFormError,
    ListingFormError,
    DeleteListingFormError,
    GalleryUploadFormError,
    RemoveGalleryImageFormError,
    DeleteRatingFormError,
);
