use chrono::Utc;

use crate::asset_host::{AssetHost, ImageUpload};
use crate::domain::category::Category;
use crate::domain::types::{CategoryId, ImageUrl};
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{CategoryFormPayload, DeleteCategoryFormPayload};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::uploads::upload_image;
use crate::services::{ServiceError, ServiceResult, require_operator};
use crate::session::SessionStatus;
use crate::shell::CategoryShell;

fn find_category<R>(category_id: &CategoryId, shell: &CategoryShell, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    let cached = shell.lock().get(category_id).cloned();
    if let Some(category) = cached {
        return Ok(category);
    }

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category {category_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Uploads a new icon if one was given; otherwise, or on failure, keeps
/// `current`. Uploads for a stored category are serialized per category.
/// Unsaved categories share no record, so their uploads never wait.
async fn resolve_icon<A>(
    category_id: Option<&CategoryId>,
    icon: Option<ImageUpload>,
    current: Option<ImageUrl>,
    shell: &CategoryShell,
    host: &A,
) -> ServiceResult<Option<ImageUrl>>
where
    A: AssetHost + ?Sized,
{
    let Some(icon) = icon else {
        return Ok(current);
    };
    let _upload = match category_id {
        Some(id) => Some(shell.uploads().try_begin(id.as_str()).ok_or_else(|| {
            ServiceError::Form("Ya hay un ícono subiéndose para esta categoría.".to_string())
        })?),
        None => None,
    };
    Ok(upload_image(host, icon).await.or(current))
}

/// Categories in insertion order, plus the one being edited if any.
pub fn show_categories<R>(
    editing: Option<&CategoryId>,
    session: &SessionStatus,
    shell: &CategoryShell,
    repo: &R,
) -> ServiceResult<(Vec<CategoryDto>, Option<CategoryDto>)>
where
    R: CategoryReader,
{
    require_operator(session)?;

    let snapshot = shell.ensure_mounted(|| repo.list_categories());
    let categories = snapshot.records().iter().map(CategoryDto::from).collect();
    let editing = editing.and_then(|id| snapshot.get(id)).map(CategoryDto::from);
    Ok((categories, editing))
}

pub async fn add_category<R, A>(
    payload: CategoryFormPayload,
    icon: Option<ImageUpload>,
    session: &SessionStatus,
    shell: &CategoryShell,
    repo: &R,
    host: &A,
) -> ServiceResult<bool>
where
    R: CategoryWriter,
    A: AssetHost + ?Sized,
{
    let operator = require_operator(session)?;

    let icon_url = resolve_icon(None, icon, None, shell, host).await?;
    let category = payload.into_new_category(icon_url, Utc::now().naive_utc());

    match repo.create_category(&category) {
        Ok(created) => {
            log::info!("Category {} created by {}", created.name, operator.email);
            shell.lock().confirm_insert(created);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Ok(false)
        }
    }
}

pub async fn update_category<R, A>(
    category_id: CategoryId,
    payload: CategoryFormPayload,
    icon: Option<ImageUpload>,
    session: &SessionStatus,
    shell: &CategoryShell,
    repo: &R,
    host: &A,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
    A: AssetHost + ?Sized,
{
    require_operator(session)?;

    let current = find_category(&category_id, shell, repo)?.icon_url;
    let icon_url = resolve_icon(Some(&category_id), icon, current, shell, host).await?;
    let update = payload.into_update(icon_url);

    match repo.update_category(&category_id, &update) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            shell
                .lock()
                .confirm_update(&category_id, |category| category.apply_update(&update));
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to update category {category_id}: {e}");
            Ok(false)
        }
    }
}

pub fn delete_category<R>(
    payload: DeleteCategoryFormPayload,
    session: &SessionStatus,
    shell: &CategoryShell,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryWriter,
{
    let operator = require_operator(session)?;

    if !payload.confirmed {
        return Err(ServiceError::Form(
            "Confirma la eliminación de la categoría.".to_string(),
        ));
    }

    match repo.delete_category(&payload.category_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!(
                "Category {} deleted by {}",
                payload.category_id,
                operator.email
            );
            shell.lock().confirm_remove(&payload.category_id);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete category {}: {e}", payload.category_id);
            Ok(false)
        }
    }
}
