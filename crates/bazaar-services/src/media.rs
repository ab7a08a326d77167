//! Concurrent media fan-out helpers shared by the lifecycle services.

use std::sync::Arc;

use bazaar_core::models::MediaKind;
use bazaar_core::AppError;
use bazaar_storage::{MediaStore, UploadedMedia};
use bytes::Bytes;
use futures::stream::{self, StreamExt};

/// Inline media artifact after base64 decoding at the HTTP layer.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Upload a batch concurrently, preserving input order so the resulting URL
/// and ref lists stay parallel to the submitted payloads.
///
/// On any failure the artifacts that did land are deleted best-effort and the
/// first error is returned. Nothing has been persisted at this point, so an
/// artifact only leaks when the rollback delete itself fails; the reconcile
/// sweep picks those up.
pub(crate) async fn upload_all(
    store: &Arc<dyn MediaStore>,
    folder: &str,
    items: Vec<MediaUpload>,
    kind: MediaKind,
    concurrency: usize,
) -> Result<Vec<UploadedMedia>, AppError> {
    let results: Vec<_> = stream::iter(items)
        .map(|item| {
            let store = store.clone();
            let folder = folder.to_string();
            async move { store.upload(item.data, &folder, &item.filename, kind).await }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut uploaded = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(media) => uploaded.push(media),
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        for media in &uploaded {
            if let Err(rollback) = store.delete(&media.media_ref, kind).await {
                tracing::warn!(
                    media_ref = %media.media_ref,
                    error = %rollback,
                    "Failed to roll back uploaded artifact"
                );
            }
        }
        return Err(AppError::MediaStore(e.to_string()));
    }

    Ok(uploaded)
}

/// Delete a batch of refs concurrently. Failures are logged, never
/// propagated; returns true when every delete succeeded.
pub(crate) async fn delete_refs(
    store: &Arc<dyn MediaStore>,
    refs: &[String],
    kind: MediaKind,
    concurrency: usize,
) -> bool {
    let outcomes: Vec<bool> = stream::iter(refs.to_vec())
        .map(|media_ref| {
            let store = store.clone();
            async move {
                match store.delete(&media_ref, kind).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            media_ref = %media_ref,
                            error = %e,
                            "Failed to delete media artifact"
                        );
                        false
                    }
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    outcomes.iter().all(|&ok| ok)
}

/// Bulk-delete a folder, falling back to per-ref deletes when the bulk
/// operation fails.
pub(crate) async fn delete_folder_or_refs(
    store: &Arc<dyn MediaStore>,
    folder: &str,
    refs: &[String],
    kind: MediaKind,
    concurrency: usize,
) -> bool {
    match store.delete_folder(folder).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                folder = %folder,
                error = %e,
                "Folder delete failed, falling back to per-ref deletes"
            );
            delete_refs(store, refs, kind, concurrency).await
        }
    }
}
