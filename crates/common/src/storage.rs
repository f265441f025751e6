//! Media blob storage abstraction.
//!
//! Posts and questions reference uploaded media by URL only; this module owns
//! the upload/delete seam so the stores never touch bytes themselves.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Content types accepted for feed and question media.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "video/mp4",
    "video/webm",
];

/// Returns whether a content type is accepted for upload.
#[must_use]
pub fn is_allowed_media_type(content_type: &str) -> bool {
    ALLOWED_MEDIA_TYPES.contains(&content_type)
}

/// Uploaded media metadata.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Storage key (path within the backend).
    pub key: String,
    /// Public URL to access the media.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}

/// Media storage backend trait.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Upload a media blob.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str)
    -> AppResult<UploadedMedia>;

    /// Delete a media blob by its public URL.
    async fn delete(&self, url: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a blob exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    /// Resolve a public URL back to the storage key it was issued for.
    fn key_for_url(&self, url: &str) -> AppResult<String> {
        let base = self.base_url.trim_end_matches('/');
        url.strip_prefix(base)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|key| !key.is_empty() && !key.contains(".."))
            .ok_or_else(|| AppError::Storage(format!("URL not served by this backend: {url}")))
    }
}

#[async_trait::async_trait]
impl MediaStorage for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedMedia> {
        if !is_allowed_media_type(content_type) {
            return Err(AppError::Validation(format!(
                "Invalid media type: {content_type}. Allowed: images (jpeg, png, webp) and video (mp4, webm)"
            )));
        }

        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        Ok(UploadedMedia {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
        })
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        let key = self.key_for_url(url)?;
        let path = self.base_path.join(&key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.base_path.join(key);
        Ok(path.exists())
    }
}

/// Generate a unique storage key for an uploaded file.
///
/// Keys are grouped by feature area and owner, e.g.
/// `petbook/<account>/1700000000000_<uuid>.jpg`.
#[must_use]
pub fn generate_storage_key(area: &str, account_id: &str, original_name: &str) -> String {
    use chrono::Utc;

    let timestamp = Utc::now().timestamp_millis();

    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && !ext.is_empty())
        .unwrap_or("bin");

    format!(
        "{}/{}/{}_{}.{}",
        area,
        account_id,
        timestamp,
        uuid::Uuid::new_v4(),
        extension
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        let key = generate_storage_key("petbook", "user123", "photo.jpg");
        assert!(key.starts_with("petbook/user123/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_generate_storage_key_no_extension() {
        let key = generate_storage_key("petora", "user123", "file");
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn test_allowed_media_types() {
        assert!(is_allowed_media_type("image/jpeg"));
        assert!(is_allowed_media_type("video/webm"));
        assert!(!is_allowed_media_type("application/pdf"));
        assert!(!is_allowed_media_type("image/gif"));
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf(), "/files".to_string());

        let key = generate_storage_key("petbook", "u1", "pic.png");
        let uploaded = storage.upload(&key, b"bytes", "image/png").await.unwrap();

        assert_eq!(uploaded.size, 5);
        assert!(uploaded.url.starts_with("/files/petbook/u1/"));
        assert!(storage.exists(&key).await.unwrap());

        storage.delete(&uploaded.url).await.unwrap();
        assert!(!storage.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf(), "/files".to_string());

        let result = storage.upload("k", b"bytes", "application/pdf").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_foreign_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf(), "/files".to_string());

        let result = storage.delete("https://elsewhere.example/blob.png").await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
