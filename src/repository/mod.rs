use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::listing::{Listing, ListingUpdate, NewListing};
use crate::domain::rating::Rating;
use crate::domain::types::{CategoryId, ImageUrl, ListingId, RatingId};

pub mod category;
pub mod errors;
pub mod listing;
pub mod rating;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Record store backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read operations on the `services` collection.
pub trait ListingReader {
    /// Read the whole collection in insertion order.
    fn list_listings(&self) -> RepositoryResult<Vec<Listing>>;
    /// Retrieve a listing by its identifier.
    fn get_listing_by_id(&self, id: &ListingId) -> RepositoryResult<Option<Listing>>;
}

/// Write operations on the `services` collection.
///
/// Methods returning `usize` report the number of affected rows.
pub trait ListingWriter {
    /// Persist a new listing and return it with its assigned identifier.
    fn create_listing(&self, listing: &NewListing) -> RepositoryResult<Listing>;
    /// Overwrite every editable field of a listing.
    fn update_listing(&self, id: &ListingId, update: &ListingUpdate) -> RepositoryResult<usize>;
    /// Set the published flag.
    fn set_listing_status(&self, id: &ListingId, status: bool) -> RepositoryResult<usize>;
    /// Append URLs to the end of the gallery, keeping their order.
    fn append_gallery_images(&self, id: &ListingId, urls: &[ImageUrl])
    -> RepositoryResult<usize>;
    /// Remove every gallery entry equal to `url`.
    fn remove_gallery_image(&self, id: &ListingId, url: &ImageUrl) -> RepositoryResult<usize>;
    /// Delete a listing together with its gallery and ratings.
    fn delete_listing(&self, id: &ListingId) -> RepositoryResult<usize>;
}

/// Read operations on the `categories` collection.
pub trait CategoryReader {
    /// Read the whole collection in insertion order.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations on the `categories` collection.
pub trait CategoryWriter {
    /// Persist a new category and return it with its assigned identifier.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace name, subcategories and icon of a category.
    fn update_category(&self, id: &CategoryId, update: &CategoryUpdate)
    -> RepositoryResult<usize>;
    /// Delete a category. Listings referencing it by name are left untouched.
    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize>;
}

/// Read operations on the `services/{id}/ratings` sub-collection.
pub trait RatingReader {
    /// List ratings of a listing, newest first.
    fn list_ratings(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Rating>>;
}

/// Delete-only access to ratings.
pub trait RatingWriter {
    fn delete_rating(&self, listing_id: &ListingId, id: &RatingId) -> RepositoryResult<usize>;
}
