use std::collections::HashMap;

use diesel::dsl::{max, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::domain::listing::{Listing, ListingUpdate, NewListing};
use crate::domain::types::{ImageUrl, ListingId};
use crate::models::listing::{
    Listing as DbListing, ListingChangeset, NewListing as DbNewListing,
};
use crate::models::listing_image::{GalleryImage, NewGalleryImage, gallery_urls};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ListingReader, ListingWriter};

fn load_galleries(
    conn: &mut SqliteConnection,
    listing_ids: &[&str],
) -> QueryResult<HashMap<String, Vec<GalleryImage>>> {
    use crate::schema::listing_gallery;

    let rows = listing_gallery::table
        .filter(listing_gallery::listing_id.eq_any(listing_ids.to_vec()))
        .order((listing_gallery::position.asc(), listing_gallery::id.asc()))
        .load::<GalleryImage>(conn)?;

    let mut grouped: HashMap<String, Vec<GalleryImage>> = HashMap::new();
    for row in rows {
        grouped.entry(row.listing_id.clone()).or_default().push(row);
    }
    Ok(grouped)
}

impl ListingReader for DieselRepository {
    fn list_listings(&self) -> RepositoryResult<Vec<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let rows = listings::table
            .order(sql::<BigInt>("rowid"))
            .load::<DbListing>(&mut conn)?;

        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        let mut galleries = load_galleries(&mut conn, &ids)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let gallery = galleries.remove(&row.id).unwrap_or_default();
                row.into_domain(gallery_urls(gallery))
            })
            .collect::<Result<Vec<Listing>, _>>()?;

        Ok(items)
    }

    fn get_listing_by_id(&self, id: &ListingId) -> RepositoryResult<Option<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let row = listings::table
            .find(id.as_str())
            .first::<DbListing>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut galleries = load_galleries(&mut conn, &[id.as_str()])?;
        let gallery = galleries.remove(id.as_str()).unwrap_or_default();
        Ok(Some(row.into_domain(gallery_urls(gallery))?))
    }
}

impl ListingWriter for DieselRepository {
    fn create_listing(&self, listing: &NewListing) -> RepositoryResult<Listing> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let id = ListingId::generate();
        let db_listing = DbNewListing::from_domain(&id, listing.clone());

        diesel::insert_into(listings::table)
            .values(&db_listing)
            .execute(&mut conn)?;

        Ok(Listing {
            id,
            details: listing.details.clone(),
            status: listing.status,
            image_url: listing.image_url.clone(),
            gallery: vec![],
            created_at: Some(listing.created_at),
        })
    }

    fn update_listing(&self, id: &ListingId, update: &ListingUpdate) -> RepositoryResult<usize> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let affected = diesel::update(listings::table.find(id.as_str()))
            .set(ListingChangeset::from(update))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_listing_status(&self, id: &ListingId, status: bool) -> RepositoryResult<usize> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let affected = diesel::update(listings::table.find(id.as_str()))
            .set(listings::status.eq(Some(status)))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn append_gallery_images(
        &self,
        id: &ListingId,
        urls: &[ImageUrl],
    ) -> RepositoryResult<usize> {
        use crate::schema::{listing_gallery, listings};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            let exists = listings::table
                .find(id.as_str())
                .count()
                .get_result::<i64>(conn)?
                > 0;
            if !exists {
                return Ok::<usize, diesel::result::Error>(0);
            }

            let last = listing_gallery::table
                .filter(listing_gallery::listing_id.eq(id.as_str()))
                .select(max(listing_gallery::position))
                .first::<Option<i32>>(conn)?
                .unwrap_or(-1);

            let rows: Vec<NewGalleryImage<'_>> = urls
                .iter()
                .zip(last + 1..)
                .map(|(url, position)| NewGalleryImage {
                    listing_id: id.as_str(),
                    position,
                    url: url.as_str(),
                })
                .collect();

            diesel::insert_into(listing_gallery::table)
                .values(&rows)
                .execute(conn)
        })?;

        Ok(affected)
    }

    fn remove_gallery_image(&self, id: &ListingId, url: &ImageUrl) -> RepositoryResult<usize> {
        use crate::schema::listing_gallery;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            listing_gallery::table
                .filter(listing_gallery::listing_id.eq(id.as_str()))
                .filter(listing_gallery::url.eq(url.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_listing(&self, id: &ListingId) -> RepositoryResult<usize> {
        use crate::schema::{listing_gallery, listings, ratings};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(listing_gallery::table.filter(listing_gallery::listing_id.eq(id.as_str())))
                .execute(conn)?;
            diesel::delete(ratings::table.filter(ratings::listing_id.eq(id.as_str())))
                .execute(conn)?;
            diesel::delete(listings::table.find(id.as_str())).execute(conn)
        })?;

        Ok(affected)
    }
}
