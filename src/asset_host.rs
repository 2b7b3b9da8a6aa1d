//! Image hosting collaborator.
//!
//! The dashboard never stores image bytes itself; it hands them to the asset
//! host and keeps the public URL that comes back.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::{ImageUrl, TypeConstraintError};
use crate::models::config::AssetHostConfig;

/// Image bytes read from an uploaded form file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum AssetHostError {
    #[error("asset host request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("asset host rejected the upload")]
    Rejected,
    #[error("asset host returned an invalid link: {0}")]
    InvalidLink(#[from] TypeConstraintError),
}

/// Accepts an image and returns its public URL.
#[async_trait(?Send)]
pub trait AssetHost {
    async fn upload(&self, image: ImageUpload) -> Result<ImageUrl, AssetHostError>;
}

/// Anonymous image upload API authorised with a client id.
#[derive(Clone)]
pub struct ImgurAssetHost {
    client: reqwest::Client,
    upload_url: String,
    client_id: String,
}

impl ImgurAssetHost {
    pub fn new(config: &AssetHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            client_id: config.client_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    link: Option<String>,
}

fn link_from_response(response: UploadResponse) -> Result<ImageUrl, AssetHostError> {
    match response {
        UploadResponse {
            success: true,
            data: Some(UploadData { link: Some(link) }),
        } => Ok(ImageUrl::new(link)?),
        _ => Err(AssetHostError::Rejected),
    }
}

#[async_trait(?Send)]
impl AssetHost for ImgurAssetHost {
    async fn upload(&self, image: ImageUpload) -> Result<ImageUrl, AssetHostError> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let response = self
            .client
            .post(&self.upload_url)
            .header(AUTHORIZATION, format!("Client-ID {}", self.client_id))
            .multipart(Form::new().part("image", part))
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!("Asset host answered {}", response.status());
            return Err(AssetHostError::Rejected);
        }

        link_from_response(response.json::<UploadResponse>().await?)
    }
}
