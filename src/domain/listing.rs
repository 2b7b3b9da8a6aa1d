use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImageUrl, ListingId};

/// Free-text attributes of a service listing.
///
/// Every field is optional and carries no uniqueness constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingDetails {
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
}

impl ListingDetails {
    /// Field names paired with their values, in form order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 18] {
        [
            ("full_name", self.full_name.as_deref()),
            ("post_title", self.post_title.as_deref()),
            ("description", self.description.as_deref()),
            ("phone", self.phone.as_deref()),
            ("email", self.email.as_deref()),
            ("location", self.location.as_deref()),
            ("dni", self.dni.as_deref()),
            ("professional_license", self.professional_license.as_deref()),
            ("address", self.address.as_deref()),
            ("company_name", self.company_name.as_deref()),
            ("contact_number", self.contact_number.as_deref()),
            ("short_description", self.short_description.as_deref()),
            ("long_description", self.long_description.as_deref()),
            ("facebook_page", self.facebook_page.as_deref()),
            ("website", self.website.as_deref()),
            ("category", self.category.as_deref()),
            ("subcategory", self.subcategory.as_deref()),
            ("qualification", self.qualification.as_deref()),
        ]
    }
}

/// One service offering shown in the dashboard table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub details: ListingDetails,
    /// `Some(true)` published, `Some(false)` inactive, `None` never set.
    pub status: Option<bool>,
    pub image_url: Option<ImageUrl>,
    pub gallery: Vec<ImageUrl>,
    pub created_at: Option<NaiveDateTime>,
}

impl Listing {
    /// Whether the listing is explicitly active.
    pub fn is_active(&self) -> bool {
        self.status == Some(true)
    }

    /// Whether the listing is explicitly inactive.
    pub fn is_inactive(&self) -> bool {
        self.status == Some(false)
    }

    /// Copies the values of a saved edit form onto this listing.
    pub fn apply_update(&mut self, update: &ListingUpdate) {
        self.details = update.details.clone();
        self.status = update.status;
        self.image_url = update.image_url.clone();
    }
}

/// Data required to insert a new [`Listing`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewListing {
    pub details: ListingDetails,
    pub status: Option<bool>,
    pub image_url: Option<ImageUrl>,
    pub created_at: NaiveDateTime,
}

/// Full set of editable values persisted when an edit form is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingUpdate {
    pub details: ListingDetails,
    pub status: Option<bool>,
    pub image_url: Option<ImageUrl>,
}
