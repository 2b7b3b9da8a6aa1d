use serde::Serialize;

use crate::domain::rating::Rating;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingDto {
    pub id: String,
    pub score: f64,
    pub text: String,
    pub timestamp: String,
}

impl From<Rating> for RatingDto {
    fn from(value: Rating) -> Self {
        Self {
            id: value.id.into_inner(),
            score: value.score.get(),
            text: value.text,
            timestamp: value.timestamp.format("%d/%m/%Y %H:%M").to_string(),
        }
    }
}
