use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ListingId, RatingId, RatingScore};

/// Customer rating left on a listing. The dashboard only reads and deletes
/// ratings; they are created elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: RatingId,
    pub listing_id: ListingId,
    pub score: RatingScore,
    pub text: String,
    pub timestamp: NaiveDateTime,
}
