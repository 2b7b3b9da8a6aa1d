//! HTML form bindings and their conversion into validated payloads.

use actix_multipart::form::tempfile::TempFile;
use serde::Deserialize;
use thiserror::Error;

use crate::asset_host::ImageUpload;

pub mod auth;
pub mod categories;
pub mod listings;
pub mod ratings;

/// Confirmation checkbox shown next to destructive actions.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

impl ConfirmForm {
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirm.as_deref().map(str::trim),
            Some("yes" | "on" | "true")
        )
    }
}

#[derive(Debug, Error)]
pub enum ImageFileError {
    #[error("uploaded file is not an image ({0})")]
    NotAnImage(String),
    #[error("failed to read uploaded file")]
    ReadFailed,
}

impl From<std::io::Error> for ImageFileError {
    fn from(_: std::io::Error) -> Self {
        Self::ReadFailed
    }
}

/// Rejects content types other than `image/*`. A missing type is accepted.
pub fn ensure_image_type(content_type: Option<&str>) -> Result<(), ImageFileError> {
    match content_type {
        Some(mime) if !mime.starts_with("image/") => {
            Err(ImageFileError::NotAnImage(mime.to_string()))
        }
        _ => Ok(()),
    }
}

/// Reads an uploaded file into memory. Browsers send an empty part when no
/// file was chosen; that yields `None`.
pub fn read_image(file: TempFile) -> Result<Option<ImageUpload>, ImageFileError> {
    if file.size == 0 {
        return Ok(None);
    }

    let content_type = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string());
    ensure_image_type(content_type.as_deref())?;

    let bytes = std::fs::read(file.file.path())?;
    Ok(Some(ImageUpload {
        file_name: file.file_name.unwrap_or_else(|| "image".to_string()),
        content_type,
        bytes,
    }))
}
