use thiserror::Error;

use crate::domain::types::{ListingId, RatingId, TypeConstraintError};
use crate::forms::ConfirmForm;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRatingFormPayload {
    pub listing_id: ListingId,
    pub rating_id: RatingId,
    pub confirmed: bool,
}

#[derive(Debug, Error)]
pub enum DeleteRatingFormError {
    #[error("Delete rating form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for DeleteRatingFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl DeleteRatingFormPayload {
    pub fn from_form(
        listing_id: String,
        rating_id: String,
        form: &ConfirmForm,
    ) -> Result<Self, DeleteRatingFormError> {
        Ok(Self {
            listing_id: ListingId::new(listing_id)?,
            rating_id: RatingId::new(rating_id)?,
            confirmed: form.is_confirmed(),
        })
    }
}
