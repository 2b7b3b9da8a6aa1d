use chrono::Utc;

use crate::asset_host::{AssetHost, ImageUpload};
use crate::domain::listing::Listing;
use crate::domain::types::ListingId;
use crate::dto::listings::{DashboardDto, ListingDto};
use crate::forms::listings::{
    DeleteListingFormPayload, GalleryUploadFormPayload, ListingFormPayload,
    RemoveGalleryImageFormPayload,
};
use crate::listing_query::{ViewState, project};
use crate::repository::{ListingReader, ListingWriter};
use crate::services::uploads::{upload_batch, upload_image};
use crate::services::{ServiceError, ServiceResult, require_operator};
use crate::session::SessionStatus;
use crate::shell::ListingShell;

const UPLOAD_IN_PROGRESS: &str = "Ya hay una carga de imágenes en curso para este servicio.";

/// Result of a gallery upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryUpload {
    /// This many URLs were appended to the gallery.
    Appended(usize),
    /// Every file failed to upload; nothing was persisted.
    NothingUploaded,
    /// Uploads succeeded but the record store rejected the append.
    StoreFailed,
}

/// Looks a listing up in the snapshot, falling back to the record store.
pub(crate) fn find_listing<R>(listing_id: &ListingId, shell: &ListingShell, repo: &R) -> ServiceResult<Listing>
where
    R: ListingReader,
{
    let cached = shell.lock().get(listing_id).cloned();
    if let Some(listing) = cached {
        return Ok(listing);
    }

    match repo.get_listing_by_id(listing_id) {
        Ok(Some(listing)) => Ok(listing),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get listing {listing_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Filtered, ordered listings table plus tab counts.
pub fn show_dashboard<R>(
    view: &ViewState,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
) -> ServiceResult<DashboardDto>
where
    R: ListingReader,
{
    require_operator(session)?;

    let snapshot = shell.ensure_mounted(|| repo.list_listings());
    Ok(DashboardDto::new(project(snapshot.records(), view), view))
}

/// Re-reads the whole collection into the snapshot.
pub fn refresh_listings<R>(session: &SessionStatus, shell: &ListingShell, repo: &R) -> ServiceResult<()>
where
    R: ListingReader,
{
    require_operator(session)?;
    shell.refresh(|| repo.list_listings());
    Ok(())
}

pub async fn create_listing<R, A>(
    payload: ListingFormPayload,
    image: Option<ImageUpload>,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
    host: &A,
) -> ServiceResult<bool>
where
    R: ListingWriter,
    A: AssetHost + ?Sized,
{
    let operator = require_operator(session)?;

    let mut listing = payload.into_new_listing(Utc::now().naive_utc());
    if let Some(image) = image {
        listing.image_url = upload_image(host, image).await;
    }

    match repo.create_listing(&listing) {
        Ok(created) => {
            log::info!("Listing {} created by {}", created.id, operator.email);
            shell.lock().confirm_insert(created);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to create listing: {e}");
            Ok(false)
        }
    }
}

/// Edit form seeded with the listing's current values.
pub fn show_listing_editor<R>(
    listing_id: &ListingId,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
) -> ServiceResult<ListingDto>
where
    R: ListingReader,
{
    require_operator(session)?;

    let listing = find_listing(listing_id, shell, repo)?;
    let uploading = shell.uploads().is_busy(listing_id.as_str());
    Ok(ListingDto::new(&listing, uploading))
}

/// Persists the whole edit form.
///
/// A new primary image is uploaded first. On success it replaces the form's
/// image URL; on failure the URL the listing already had is saved unchanged.
pub async fn save_listing_edit<R, A>(
    listing_id: ListingId,
    payload: ListingFormPayload,
    image: Option<ImageUpload>,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
    host: &A,
) -> ServiceResult<bool>
where
    R: ListingReader + ListingWriter,
    A: AssetHost + ?Sized,
{
    let operator = require_operator(session)?;

    let mut image_url = find_listing(&listing_id, shell, repo)?.image_url;

    if let Some(image) = image {
        let Some(_upload) = shell.uploads().try_begin(listing_id.as_str()) else {
            return Err(ServiceError::Form(UPLOAD_IN_PROGRESS.to_string()));
        };
        if let Some(url) = upload_image(host, image).await {
            image_url = Some(url);
        }
    }

    let update = payload.into_update(image_url);
    match repo.update_listing(&listing_id, &update) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Listing {listing_id} updated by {}", operator.email);
            shell
                .lock()
                .confirm_update(&listing_id, |listing| listing.apply_update(&update));
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to update listing {listing_id}: {e}");
            Ok(false)
        }
    }
}

/// Flips the published flag. A listing whose status was never set becomes
/// active.
pub fn toggle_listing_status<R>(
    listing_id: &ListingId,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ListingReader + ListingWriter,
{
    require_operator(session)?;

    let next = !find_listing(listing_id, shell, repo)?.is_active();

    match repo.set_listing_status(listing_id, next) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            shell
                .lock()
                .confirm_update(listing_id, |listing| listing.status = Some(next));
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to set status of listing {listing_id}: {e}");
            Ok(false)
        }
    }
}

pub fn delete_listing<R>(
    payload: DeleteListingFormPayload,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ListingWriter,
{
    let operator = require_operator(session)?;

    if !payload.confirmed {
        return Err(ServiceError::Form(
            "Confirma la eliminación del servicio.".to_string(),
        ));
    }

    match repo.delete_listing(&payload.listing_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!(
                "Listing {} deleted by {}",
                payload.listing_id,
                operator.email
            );
            shell.lock().confirm_remove(&payload.listing_id);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete listing {}: {e}", payload.listing_id);
            Ok(false)
        }
    }
}

/// Uploads a batch of gallery images one by one and appends the URLs of
/// those that made it.
pub async fn add_gallery_images<R, A>(
    listing_id: ListingId,
    payload: GalleryUploadFormPayload,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
    host: &A,
) -> ServiceResult<GalleryUpload>
where
    R: ListingReader + ListingWriter,
    A: AssetHost + ?Sized,
{
    require_operator(session)?;
    find_listing(&listing_id, shell, repo)?;

    let Some(_upload) = shell.uploads().try_begin(listing_id.as_str()) else {
        return Err(ServiceError::Form(UPLOAD_IN_PROGRESS.to_string()));
    };

    let urls = upload_batch(host, payload.images).await;
    if urls.is_empty() {
        return Ok(GalleryUpload::NothingUploaded);
    }

    match repo.append_gallery_images(&listing_id, &urls) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(appended) => {
            shell
                .lock()
                .confirm_update(&listing_id, |listing| listing.gallery.extend(urls));
            Ok(GalleryUpload::Appended(appended))
        }
        Err(e) => {
            log::error!("Failed to append gallery images to listing {listing_id}: {e}");
            Ok(GalleryUpload::StoreFailed)
        }
    }
}

pub fn remove_gallery_image<R>(
    payload: RemoveGalleryImageFormPayload,
    session: &SessionStatus,
    shell: &ListingShell,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ListingWriter,
{
    require_operator(session)?;

    match repo.remove_gallery_image(&payload.listing_id, &payload.url) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            shell.lock().confirm_update(&payload.listing_id, |listing| {
                listing.gallery.retain(|url| url != &payload.url)
            });
            Ok(true)
        }
        Err(e) => {
            log::error!(
                "Failed to remove gallery image from listing {}: {e}",
                payload.listing_id
            );
            Ok(false)
        }
    }
}
