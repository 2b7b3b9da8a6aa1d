use std::sync::Mutex;

use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::listing::{Listing, ListingUpdate, NewListing};
use crate::domain::rating::Rating;
use crate::domain::types::{CategoryId, ImageUrl, ListingId, RatingId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, ListingReader, ListingWriter, RatingReader, RatingWriter,
};

/// Simple in-memory repository used for unit tests.
///
/// `failing_reads` / `failing_writes` make every call of that kind return an
/// error so callers' failure paths can be exercised.
#[derive(Default)]
pub struct TestRepository {
    listings: Mutex<Vec<Listing>>,
    categories: Mutex<Vec<Category>>,
    ratings: Mutex<Vec<Rating>>,
    fail_reads: bool,
    fail_writes: bool,
    writes: Mutex<usize>,
}

impl TestRepository {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: Mutex::new(listings),
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Mutex::new(categories);
        self
    }

    pub fn with_ratings(mut self, ratings: Vec<Rating>) -> Self {
        self.ratings = Mutex::new(ratings);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of write calls that reached the repository.
    pub fn write_calls(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn stored_listings(&self) -> Vec<Listing> {
        self.listings.lock().unwrap().clone()
    }

    pub fn stored_categories(&self) -> Vec<Category> {
        self.categories.lock().unwrap().clone()
    }

    pub fn stored_ratings(&self) -> Vec<Rating> {
        self.ratings.lock().unwrap().clone()
    }

    fn read(&self) -> RepositoryResult<()> {
        if self.fail_reads {
            Err(RepositoryError::ValidationError("read failed".into()))
        } else {
            Ok(())
        }
    }

    fn write(&self) -> RepositoryResult<()> {
        *self.writes.lock().unwrap() += 1;
        if self.fail_writes {
            Err(RepositoryError::ValidationError("write failed".into()))
        } else {
            Ok(())
        }
    }

    fn with_listing<F>(&self, id: &ListingId, change: F) -> usize
    where
        F: FnOnce(&mut Listing),
    {
        let mut listings = self.listings.lock().unwrap();
        match listings.iter_mut().find(|l| &l.id == id) {
            Some(listing) => {
                change(listing);
                1
            }
            None => 0,
        }
    }
}

impl ListingReader for TestRepository {
    fn list_listings(&self) -> RepositoryResult<Vec<Listing>> {
        self.read()?;
        Ok(self.stored_listings())
    }

    fn get_listing_by_id(&self, id: &ListingId) -> RepositoryResult<Option<Listing>> {
        self.read()?;
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| &l.id == id)
            .cloned())
    }
}

impl ListingWriter for TestRepository {
    fn create_listing(&self, listing: &NewListing) -> RepositoryResult<Listing> {
        self.write()?;
        let created = Listing {
            id: ListingId::generate(),
            details: listing.details.clone(),
            status: listing.status,
            image_url: listing.image_url.clone(),
            gallery: vec![],
            created_at: Some(listing.created_at),
        };
        self.listings.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn update_listing(&self, id: &ListingId, update: &ListingUpdate) -> RepositoryResult<usize> {
        self.write()?;
        Ok(self.with_listing(id, |l| l.apply_update(update)))
    }

    fn set_listing_status(&self, id: &ListingId, status: bool) -> RepositoryResult<usize> {
        self.write()?;
        Ok(self.with_listing(id, |l| l.status = Some(status)))
    }

    fn append_gallery_images(
        &self,
        id: &ListingId,
        urls: &[ImageUrl],
    ) -> RepositoryResult<usize> {
        self.write()?;
        let found = self.with_listing(id, |l| l.gallery.extend_from_slice(urls));
        Ok(if found == 1 { urls.len() } else { 0 })
    }

    fn remove_gallery_image(&self, id: &ListingId, url: &ImageUrl) -> RepositoryResult<usize> {
        self.write()?;
        let mut removed = 0;
        self.with_listing(id, |l| {
            let before = l.gallery.len();
            l.gallery.retain(|u| u != url);
            removed = before - l.gallery.len();
        });
        Ok(removed)
    }

    fn delete_listing(&self, id: &ListingId) -> RepositoryResult<usize> {
        self.write()?;
        let mut listings = self.listings.lock().unwrap();
        let before = listings.len();
        listings.retain(|l| &l.id != id);
        Ok(before - listings.len())
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.read()?;
        Ok(self.stored_categories())
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        self.read()?;
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        self.write()?;
        let created = Category {
            id: CategoryId::generate(),
            name: category.name.clone(),
            subcategories: category.subcategories.clone(),
            icon_url: category.icon_url.clone(),
            created_at: category.created_at,
        };
        self.categories.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn update_category(
        &self,
        id: &CategoryId,
        update: &CategoryUpdate,
    ) -> RepositoryResult<usize> {
        self.write()?;
        let mut categories = self.categories.lock().unwrap();
        match categories.iter_mut().find(|c| &c.id == id) {
            Some(category) => {
                category.apply_update(update);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        self.write()?;
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| &c.id != id);
        Ok(before - categories.len())
    }
}

impl RatingReader for TestRepository {
    fn list_ratings(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Rating>> {
        self.read()?;
        let mut items: Vec<Rating> = self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.listing_id == listing_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(items)
    }
}

impl RatingWriter for TestRepository {
    fn delete_rating(&self, listing_id: &ListingId, id: &RatingId) -> RepositoryResult<usize> {
        self.write()?;
        let mut ratings = self.ratings.lock().unwrap();
        let before = ratings.len();
        ratings.retain(|r| !(&r.id == id && &r.listing_id == listing_id));
        Ok(before - ratings.len())
    }
}
