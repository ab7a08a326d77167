//! Media gateway abstraction trait
//!
//! This module defines the MediaStore trait that all media backends must
//! implement.

use async_trait::async_trait;
use bazaar_core::models::MediaKind;
use bytes::Bytes;
use thiserror::Error;

/// Media gateway operation errors
#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    #[error("Media backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media gateway operations
pub type MediaResult<T> = Result<T, MediaStoreError>;

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Publicly accessible URL of the artifact.
    pub url: String,
    /// Opaque handle used to address the artifact for deletion/transformation.
    /// Distinct from the URL; stored on the owning record.
    pub media_ref: String,
    pub kind: MediaKind,
    /// Thumbnail produced opportunistically at upload time (video only).
    pub thumbnail_url: Option<String>,
}

/// Media gateway abstraction.
///
/// All backends (CDN, local filesystem) implement this trait so the
/// lifecycle services never couple to a specific remote store.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload an artifact into `folder` and return its URL and media ref.
    ///
    /// For video content the backend should produce a thumbnail URL at
    /// upload time when it can; callers fall back to [`derive_thumbnail`]
    /// when it cannot.
    ///
    /// [`derive_thumbnail`]: MediaStore::derive_thumbnail
    async fn upload(
        &self,
        data: Bytes,
        folder: &str,
        filename: &str,
        kind: MediaKind,
    ) -> MediaResult<UploadedMedia>;

    /// Delete a single artifact by its media ref.
    ///
    /// Idempotent: deleting a ref that no longer exists succeeds.
    async fn delete(&self, media_ref: &str, kind: MediaKind) -> MediaResult<()>;

    /// Bulk-delete every artifact whose path starts with `folder`, then
    /// remove the now-empty folder marker.
    async fn delete_folder(&self, folder: &str) -> MediaResult<()>;

    /// Enumerate folders directly below `prefix`. Used by the reconcile
    /// sweep; best-effort.
    async fn list_folders(&self, prefix: &str) -> MediaResult<Vec<String>>;

    /// Derive a scaled video thumbnail URL from a media ref without
    /// re-uploading.
    fn video_thumbnail_url(&self, media_ref: &str) -> String;

    /// Derive a thumbnail URL from a public media URL. Degrades gracefully:
    /// returns the input URL when no transformation applies.
    fn derive_thumbnail(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Reject folder/filename segments that could escape the storage root or
/// smuggle path separators into a ref.
pub(crate) fn validate_segment(segment: &str) -> MediaResult<()> {
    if segment.is_empty() || segment.contains("..") || segment.starts_with('/') {
        return Err(MediaStoreError::InvalidPath(segment.to_string()));
    }
    Ok(())
}
