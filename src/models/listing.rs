use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::listing::{
    Listing as DomainListing, ListingDetails, ListingUpdate, NewListing as DomainNewListing,
};
use crate::domain::types::{ImageUrl, ListingId, TypeConstraintError};

/// Diesel model representing the `listings` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::listings)]
pub struct Listing {
    pub id: String,
    pub full_name: Option<String>,
    pub post_title: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub dni: Option<String>,
    pub professional_license: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
    pub contact_number: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub facebook_page: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub qualification: Option<String>,
    pub status: Option<bool>,
    pub image_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Insertable form of [`Listing`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::listings)]
pub struct NewListing {
    pub id: String,
    pub full_name: Option<String>,
    pub post_title: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub dni: Option<String>,
    pub professional_license: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
    pub contact_number: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub facebook_page: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub qualification: Option<String>,
    pub status: Option<bool>,
    pub image_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Patch written when an edit form is saved. Blank fields clear the column.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::listings)]
#[diesel(treat_none_as_null = true)]
pub struct ListingChangeset {
    pub full_name: Option<String>,
    pub post_title: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub dni: Option<String>,
    pub professional_license: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
    pub contact_number: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub facebook_page: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub qualification: Option<String>,
    pub status: Option<bool>,
    pub image_url: Option<String>,
}

impl Listing {
    /// Builds the domain listing from the row and its gallery URLs.
    pub fn into_domain(self, gallery: Vec<ImageUrl>) -> Result<DomainListing, TypeConstraintError> {
        let image_url = match self.image_url {
            Some(url) => match ImageUrl::new(url) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("Ignoring image of listing {}: {e}", self.id);
                    None
                }
            },
            None => None,
        };

        Ok(DomainListing {
            id: ListingId::new(self.id)?,
            details: ListingDetails {
                full_name: self.full_name,
                post_title: self.post_title,
                description: self.description,
                phone: self.phone,
                email: self.email,
                location: self.location,
                dni: self.dni,
                professional_license: self.professional_license,
                address: self.address,
                company_name: self.company_name,
                contact_number: self.contact_number,
                short_description: self.short_description,
                long_description: self.long_description,
                facebook_page: self.facebook_page,
                website: self.website,
                category: self.category,
                subcategory: self.subcategory,
                qualification: self.qualification,
            },
            status: self.status,
            image_url,
            gallery,
            created_at: self.created_at,
        })
    }
}

impl NewListing {
    pub fn from_domain(id: &ListingId, listing: DomainNewListing) -> Self {
        let d = listing.details;
        Self {
            id: id.as_str().to_string(),
            full_name: d.full_name,
            post_title: d.post_title,
            description: d.description,
            phone: d.phone,
            email: d.email,
            location: d.location,
            dni: d.dni,
            professional_license: d.professional_license,
            address: d.address,
            company_name: d.company_name,
            contact_number: d.contact_number,
            short_description: d.short_description,
            long_description: d.long_description,
            facebook_page: d.facebook_page,
            website: d.website,
            category: d.category,
            subcategory: d.subcategory,
            qualification: d.qualification,
            status: listing.status,
            image_url: listing.image_url.map(ImageUrl::into_inner),
            created_at: Some(listing.created_at),
        }
    }
}

impl From<&ListingUpdate> for ListingChangeset {
    fn from(update: &ListingUpdate) -> Self {
        let d = update.details.clone();
        Self {
            full_name: d.full_name,
            post_title: d.post_title,
            description: d.description,
            phone: d.phone,
            email: d.email,
            location: d.location,
            dni: d.dni,
            professional_license: d.professional_license,
            address: d.address,
            company_name: d.company_name,
            contact_number: d.contact_number,
            short_description: d.short_description,
            long_description: d.long_description,
            facebook_page: d.facebook_page,
            website: d.website,
            category: d.category,
            subcategory: d.subcategory,
            qualification: d.qualification,
            status: update.status,
            image_url: update.image_url.as_ref().map(|u| u.as_str().to_string()),
        }
    }
}
