use serde::Serialize;

use crate::domain::listing::Listing;
use crate::listing_query::{ListingCounts, ListingProjection, ViewState};

/// Label and input kind for each listing field, keyed by field name.
const FIELD_LABELS: [(&str, &str, bool); 18] = [
    ("full_name", "Nombre completo", false),
    ("post_title", "Título de la publicación", false),
    ("description", "Descripción", true),
    ("phone", "Teléfono", false),
    ("email", "Correo electrónico", false),
    ("location", "Ubicación", false),
    ("dni", "DNI", false),
    ("professional_license", "Matrícula profesional", false),
    ("address", "Dirección", false),
    ("company_name", "Empresa", false),
    ("contact_number", "Número de contacto", false),
    ("short_description", "Descripción corta", true),
    ("long_description", "Descripción larga", true),
    ("facebook_page", "Página de Facebook", false),
    ("website", "Sitio web", false),
    ("category", "Categoría", false),
    ("subcategory", "Subcategoría", false),
    ("qualification", "Calificación", false),
];

fn label_of(name: &str) -> (&'static str, bool) {
    FIELD_LABELS
        .iter()
        .find(|(field, _, _)| *field == name)
        .map(|(_, label, multiline)| (*label, *multiline))
        .unwrap_or(("", false))
}

fn status_value(status: Option<bool>) -> &'static str {
    match status {
        Some(true) => "active",
        Some(false) => "inactive",
        None => "",
    }
}

/// Placeholder avatar built from the first letter of the name.
fn placeholder_image(full_name: Option<&str>) -> String {
    let initial = full_name
        .and_then(|name| name.chars().next())
        .map(|c| c.to_string())
        .unwrap_or_else(|| "S".to_string());
    format!("https://via.placeholder.com/80?text={initial}")
}

/// One row of the listings table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingRowDto {
    pub id: String,
    pub full_name: String,
    pub post_title: String,
    pub category: String,
    pub status: &'static str,
    pub image_url: String,
    pub created_at: Option<String>,
    pub gallery_size: usize,
}

impl From<&Listing> for ListingRowDto {
    fn from(listing: &Listing) -> Self {
        let full_name = listing.details.full_name.as_deref();
        Self {
            id: listing.id.as_str().to_string(),
            full_name: full_name.unwrap_or_default().to_string(),
            post_title: listing.details.post_title.clone().unwrap_or_default(),
            category: listing.details.category.clone().unwrap_or_default(),
            status: status_value(listing.status),
            image_url: listing
                .image_url
                .as_ref()
                .map(|url| url.as_str().to_string())
                .unwrap_or_else(|| placeholder_image(full_name)),
            created_at: listing
                .created_at
                .map(|at| at.format("%d/%m/%Y").to_string()),
            gallery_size: listing.gallery.len(),
        }
    }
}

/// Everything the dashboard template needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardDto {
    pub rows: Vec<ListingRowDto>,
    pub counts: ListingCounts,
    pub search: String,
    pub tab: &'static str,
}

impl DashboardDto {
    pub fn new(projection: ListingProjection<'_>, view: &ViewState) -> Self {
        Self {
            rows: projection
                .ordered
                .into_iter()
                .map(ListingRowDto::from)
                .collect(),
            counts: projection.counts,
            search: view.search_text.clone(),
            tab: view.tab.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingFieldDto {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub multiline: bool,
}

/// Edit form seeded with the listing's current values.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingDto {
    pub id: String,
    pub full_name: String,
    pub fields: Vec<ListingFieldDto>,
    pub status: &'static str,
    pub image_url: Option<String>,
    pub gallery: Vec<String>,
    /// An image upload for this listing is still running.
    pub uploading: bool,
}

impl ListingDto {
    pub fn new(listing: &Listing, uploading: bool) -> Self {
        Self {
            id: listing.id.as_str().to_string(),
            full_name: listing.details.full_name.clone().unwrap_or_default(),
            fields: listing
                .details
                .entries()
                .into_iter()
                .map(|(name, value)| {
                    let (label, multiline) = label_of(name);
                    ListingFieldDto {
                        name,
                        label,
                        value: value.unwrap_or_default().to_string(),
                        multiline,
                    }
                })
                .collect(),
            status: status_value(listing.status),
            image_url: listing.image_url.as_ref().map(|u| u.as_str().to_string()),
            gallery: listing
                .gallery
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
            uploading,
        }
    }
}
