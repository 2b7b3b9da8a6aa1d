use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::rating::Rating as DomainRating;
use crate::domain::types::{ListingId, RatingId, RatingScore, TypeConstraintError};

/// Diesel model representing the `ratings` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::ratings)]
pub struct Rating {
    pub id: String,
    pub listing_id: String,
    pub score: f64,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

impl TryFrom<Rating> for DomainRating {
    type Error = TypeConstraintError;

    fn try_from(rating: Rating) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RatingId::new(rating.id)?,
            listing_id: ListingId::new(rating.listing_id)?,
            score: RatingScore::new(rating.score)?,
            text: rating.text,
            timestamp: rating.timestamp,
        })
    }
}
