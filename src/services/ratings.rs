use crate::domain::types::ListingId;
use crate::dto::listings::ListingDto;
use crate::dto::ratings::RatingDto;
use crate::forms::ratings::DeleteRatingFormPayload;
use crate::repository::{ListingReader, RatingReader, RatingWriter};
use crate::services::listings::find_listing;
use crate::services::{ServiceError, ServiceResult, require_operator};
use crate::session::SessionStatus;
use crate::shell::ListingShell;

/// A listing and its ratings, newest first. Ratings are read per request.
pub fn show_ratings<R>(
    listing_id: &ListingId,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
) -> ServiceResult<(ListingDto, Vec<RatingDto>)>
where
    R: ListingReader + RatingReader,
{
    require_operator(session)?;

    let listing = find_listing(listing_id, shell, repo)?;
    let ratings = match repo.list_ratings(listing_id) {
        Ok(ratings) => ratings,
        Err(e) => {
            log::error!("Failed to list ratings of listing {listing_id}: {e}");
            Vec::new()
        }
    };

    Ok((
        ListingDto::new(&listing, false),
        ratings.into_iter().map(RatingDto::from).collect(),
    ))
}

pub fn delete_rating<R>(
    payload: DeleteRatingFormPayload,
    session: &SessionStatus,
    repo: &R,
) -> ServiceResult<bool>
where
    R: RatingWriter,
{
    let operator = require_operator(session)?;

    if !payload.confirmed {
        return Err(ServiceError::Form(
            "Confirma la eliminación del comentario.".to_string(),
        ));
    }

    match repo.delete_rating(&payload.listing_id, &payload.rating_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!(
                "Rating {} of listing {} deleted by {}",
                payload.rating_id,
                payload.listing_id,
                operator.email
            );
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete rating {}: {e}", payload.rating_id);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::Operator;
    use crate::domain::listing::{Listing, ListingDetails};
    use crate::domain::rating::Rating;
    use crate::domain::types::{RatingId, RatingScore};
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn signed_in() -> SessionStatus {
        SessionStatus::SignedIn(Operator {
            uid: "uid-1".into(),
            email: "admin@example.com".into(),
        })
    }

    fn sample_listing() -> Listing {
        Listing {
            id: ListingId::new("l1").unwrap(),
            details: ListingDetails::default(),
            status: Some(true),
            image_url: None,
            gallery: vec![],
            created_at: None,
        }
    }

    fn sample_rating(id: &str, secs: i64) -> Rating {
        Rating {
            id: RatingId::new(id).unwrap(),
            listing_id: ListingId::new("l1").unwrap(),
            score: RatingScore::new(4.5).unwrap(),
            text: format!("comentario {id}"),
            timestamp: DateTime::from_timestamp(secs, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn ratings_are_listed_newest_first() {
        let repo = TestRepository::new(vec![sample_listing()])
            .with_ratings(vec![sample_rating("old", 10), sample_rating("new", 20)]);
        let shell = ListingShell::default();

        let (listing, ratings) = show_ratings(
            &ListingId::new("l1").unwrap(),
            &signed_in(),
            &shell,
            &repo,
        )
        .unwrap();

        assert_eq!(listing.id, "l1");
        let ids: Vec<&str> = ratings.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn ratings_of_unknown_listing_are_not_found() {
        let repo = TestRepository::new(vec![]);
        let shell = ListingShell::default();

        let result = show_ratings(
            &ListingId::new("missing").unwrap(),
            &signed_in(),
            &shell,
            &repo,
        );

        assert_eq!(result.unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn rating_delete_requires_confirmation() {
        let repo =
            TestRepository::new(vec![sample_listing()]).with_ratings(vec![sample_rating("r1", 10)]);
        let payload = DeleteRatingFormPayload {
            listing_id: ListingId::new("l1").unwrap(),
            rating_id: RatingId::new("r1").unwrap(),
            confirmed: false,
        };

        assert!(matches!(
            delete_rating(payload.clone(), &signed_in(), &repo),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(repo.write_calls(), 0);

        let confirmed = DeleteRatingFormPayload {
            confirmed: true,
            ..payload
        };
        assert_eq!(delete_rating(confirmed, &signed_in(), &repo), Ok(true));
        assert!(repo.stored_ratings().is_empty());
    }
}
