use diesel::prelude::*;

use crate::domain::types::ImageUrl;

/// Diesel model representing the `listing_gallery` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::listing_gallery)]
pub struct GalleryImage {
    pub id: i32,
    pub listing_id: String,
    pub position: i32,
    pub url: String,
}

/// Insertable form of [`GalleryImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::listing_gallery)]
pub struct NewGalleryImage<'a> {
    pub listing_id: &'a str,
    pub position: i32,
    pub url: &'a str,
}

/// Converts stored gallery rows into URLs, skipping values that no longer
/// parse so one bad row does not hide the whole listing.
pub fn gallery_urls(rows: Vec<GalleryImage>) -> Vec<ImageUrl> {
    rows.into_iter()
        .filter_map(|row| match ImageUrl::new(row.url) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Skipping gallery image {} of listing {}: {e}", row.id, row.listing_id);
                None
            }
        })
        .collect()
}
