//! Object store client for uploaded item images.
//!
//! Talks to a Supabase-compatible storage API: objects are uploaded into a
//! public bucket and referenced by their public URL. Image upload is never
//! load-bearing for a scan; callers use [`MediaStore::try_upload_item_image`]
//! and carry on without a URL when the store misbehaves.

use std::sync::Arc;

use rand::RngCore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::MediaStoreConfig;
use crate::models::ScanImage;

/// Errors that can occur when uploading media.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store returned a non-success status.
    #[error("upload failed ({status}): {message}")]
    Upload {
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        message: String,
    },
}

/// Object store client for item images.
#[derive(Clone)]
pub struct MediaStore {
    inner: Arc<MediaStoreInner>,
}

struct MediaStoreInner {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl MediaStore {
    /// Create a new media store client.
    ///
    /// # Panics
    ///
    /// Panics if the service key contains invalid header characters.
    #[must_use]
    pub fn new(config: &MediaStoreConfig) -> Self {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", config.service_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).expect("Invalid service key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(MediaStoreInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                bucket: config.bucket.clone(),
            }),
        }
    }

    /// Upload an image under its content type and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects the object.
    #[instrument(skip(self, image), fields(bytes = image.bytes.len(), mime = %image.mime_type))]
    pub async fn upload_item_image(&self, image: ScanImage) -> Result<String, MediaError> {
        let object = object_name(&image.mime_type);
        let url = format!(
            "{}/storage/v1/object/{}/{object}",
            self.inner.base_url, self.inner.bucket
        );

        let response = self
            .inner
            .client
            .post(&url)
            .header(CONTENT_TYPE, image.mime_type)
            .body(image.bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload {
                status: status.as_u16(),
                message,
            });
        }

        Ok(format!(
            "{}/storage/v1/object/public/{}/{object}",
            self.inner.base_url, self.inner.bucket
        ))
    }

    /// Upload an image, logging and swallowing failures.
    ///
    /// Returns `None` on any error so the scan can continue without a URL.
    pub async fn try_upload_item_image(&self, image: ScanImage) -> Option<String> {
        match self.upload_item_image(image).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Image upload failed, continuing without URL");
                None
            }
        }
    }
}

/// Generate a unique object name with an extension matching the content type.
fn object_name(mime_type: &str) -> String {
    let ext = match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    format!("scan-{}.{ext}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_format() {
        let name = object_name("image/jpeg");
        assert!(name.starts_with("scan-"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "scan-".len() + 32 + ".jpg".len());
    }

    #[test]
    fn test_object_name_extension_follows_content_type() {
        assert!(object_name("image/png").ends_with(".png"));
        assert!(object_name("image/webp").ends_with(".webp"));
        // Unknown types keep the jpg default
        assert!(object_name("application/octet-stream").ends_with(".jpg"));
    }

    #[test]
    fn test_object_names_are_unique() {
        assert_ne!(object_name("image/jpeg"), object_name("image/jpeg"));
    }

    #[test]
    fn test_media_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MediaStore>();
    }
}
