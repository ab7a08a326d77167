//! Local filesystem media store for development and tests.
//!
//! Media refs are relative keys (`{folder}/{filename}`); folder deletes map
//! to recursive directory removal. No thumbnail transformation exists
//! locally, so video thumbnails degrade to the original URL.

use crate::traits::{validate_segment, MediaResult, MediaStore, MediaStoreError, UploadedMedia};
use async_trait::async_trait;
use bazaar_core::models::MediaKind;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Clone)]
pub struct LocalMediaStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create a new LocalMediaStore rooted at `base_path`, serving files
    /// from `base_url`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> MediaResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            MediaStoreError::ConfigError(format!(
                "Failed to create media directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalMediaStore {
            base_path,
            base_url,
        })
    }

    /// Convert a media ref to a filesystem path, rejecting traversal.
    fn ref_to_path(&self, media_ref: &str) -> MediaResult<PathBuf> {
        if media_ref.contains("..") || media_ref.starts_with('/') {
            return Err(MediaStoreError::InvalidPath(media_ref.to_string()));
        }
        Ok(self.base_path.join(media_ref))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(path: &Path) -> MediaResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(
        &self,
        data: Bytes,
        folder: &str,
        filename: &str,
        kind: MediaKind,
    ) -> MediaResult<UploadedMedia> {
        validate_segment(folder)?;
        validate_segment(filename)?;
        if filename.contains('/') {
            return Err(MediaStoreError::InvalidPath(filename.to_string()));
        }

        let key = format!("{}/{}", folder, filename);
        let path = self.ref_to_path(&key)?;
        Self::ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;
        file.write_all(&data)
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;

        let url = self.generate_url(&key);
        tracing::debug!(key = %key, size_bytes = data.len(), "Local media upload");

        let thumbnail_url = match kind {
            MediaKind::Video => Some(url.clone()),
            MediaKind::Image => None,
        };

        Ok(UploadedMedia {
            url,
            media_ref: key,
            kind,
            thumbnail_url,
        })
    }

    async fn delete(&self, media_ref: &str, _kind: MediaKind) -> MediaResult<()> {
        let path = self.ref_to_path(media_ref)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Idempotent: already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(media_ref = %media_ref, "Local media already deleted");
                Ok(())
            }
            Err(e) => Err(MediaStoreError::DeleteFailed(e.to_string())),
        }
    }

    async fn delete_folder(&self, folder: &str) -> MediaResult<()> {
        validate_segment(folder)?;
        let path = self.ref_to_path(folder)?;
        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaStoreError::DeleteFailed(e.to_string())),
        }
    }

    async fn list_folders(&self, prefix: &str) -> MediaResult<Vec<String>> {
        validate_segment(prefix)?;
        let path = self.ref_to_path(prefix)?;

        let mut entries = match fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MediaStoreError::BackendError(e.to_string())),
        };

        let mut folders = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MediaStoreError::BackendError(e.to_string()))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| MediaStoreError::BackendError(e.to_string()))?;
            if file_type.is_dir() {
                folders.push(format!(
                    "{}/{}",
                    prefix.trim_end_matches('/'),
                    entry.file_name().to_string_lossy()
                ));
            }
        }

        Ok(folders)
    }

    fn video_thumbnail_url(&self, media_ref: &str) -> String {
        // No local transformation; the artifact URL is the best we can do
        self.generate_url(media_ref)
    }
}
