use diesel::prelude::*;

use crate::domain::rating::Rating;
use crate::domain::types::{ListingId, RatingId};
use crate::models::rating::Rating as DbRating;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, RatingReader, RatingWriter};

impl RatingReader for DieselRepository {
    fn list_ratings(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Rating>> {
        use crate::schema::ratings;

        let mut conn = self.conn()?;

        let results = ratings::table
            .filter(ratings::listing_id.eq(listing_id.as_str()))
            .order((ratings::timestamp.desc(), ratings::id.asc()))
            .load::<DbRating>(&mut conn)?;

        // One malformed row must not hide the rest of the listing's ratings.
        let results = results
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match Rating::try_from(row) {
                    Ok(rating) => Some(rating),
                    Err(e) => {
                        log::warn!("Skipping rating {id} of listing {listing_id}: {e}");
                        None
                    }
                }
            })
            .collect();
        Ok(results)
    }
}

impl RatingWriter for DieselRepository {
    fn delete_rating(&self, listing_id: &ListingId, id: &RatingId) -> RepositoryResult<usize> {
        use crate::schema::ratings;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            ratings::table
                .filter(ratings::id.eq(id.as_str()))
                .filter(ratings::listing_id.eq(listing_id.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
