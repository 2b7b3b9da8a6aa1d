//! Asset host calls whose failures degrade to "no URL".

use crate::asset_host::{AssetHost, ImageUpload};
use crate::domain::types::ImageUrl;

/// Uploads one image. Failures are logged and yield `None`.
pub async fn upload_image<A>(host: &A, image: ImageUpload) -> Option<ImageUrl>
where
    A: AssetHost + ?Sized,
{
    let file_name = image.file_name.clone();
    match host.upload(image).await {
        Ok(url) => Some(url),
        Err(e) => {
            log::error!("Failed to upload image '{file_name}': {e}");
            None
        }
    }
}

/// Uploads images one after another and keeps the URLs of those that
/// succeeded, in input order.
pub async fn upload_batch<A>(host: &A, images: Vec<ImageUpload>) -> Vec<ImageUrl>
where
    A: AssetHost + ?Sized,
{
    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        if let Some(url) = upload_image(host, image).await {
            urls.push(url);
        }
    }
    urls
}

#[cfg(test)]
pub(crate) mod test {
    use std::cell::RefCell;

    use async_trait::async_trait;

    use crate::asset_host::{AssetHost, AssetHostError, ImageUpload};
    use crate::domain::types::ImageUrl;

    /// Asset host that answers from the file name: names starting with
    /// `fail` are rejected, everything else is "hosted" under a fixed prefix.
    #[derive(Default)]
    pub struct FakeAssetHost {
        pub uploaded: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl AssetHost for FakeAssetHost {
        async fn upload(&self, image: ImageUpload) -> Result<ImageUrl, AssetHostError> {
            self.uploaded.borrow_mut().push(image.file_name.clone());
            if image.file_name.starts_with("fail") {
                return Err(AssetHostError::Rejected);
            }
            Ok(ImageUrl::new(format!("https://img.test/{}", image.file_name))?)
        }
    }

    pub fn image(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }
}
