//! CDN media store implementation (Cloudinary-style HTTP API).
//!
//! Upload and destroy go through the signed upload API; bulk prefix deletes
//! and folder listing go through the admin API with basic auth. Media refs
//! are the provider's public IDs.

use crate::traits::{validate_segment, MediaResult, MediaStore, MediaStoreError, UploadedMedia};
use async_trait::async_trait;
use bazaar_core::models::MediaKind;
use bytes::Bytes;
use serde::Deserialize;
use sha2::{Digest, Sha256};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// CDN-backed media store.
#[derive(Clone)]
pub struct CdnMediaStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: String,
    delivery_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct FolderEntry {
    path: String,
}

#[derive(Debug, Deserialize)]
struct FoldersResponse {
    #[serde(default)]
    folders: Vec<FolderEntry>,
}

fn resource_type(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
    }
}

impl CdnMediaStore {
    /// Create a new CdnMediaStore.
    ///
    /// # Arguments
    /// * `cloud_name` - Provider cloud/account identifier
    /// * `api_key` / `api_secret` - Upload API credentials
    /// * `api_base` - Optional API base override (for provider-compatible
    ///   endpoints or test servers)
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        api_base: Option<String>,
    ) -> MediaResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MediaStoreError::ConfigError(e.to_string()))?;

        Ok(CdnMediaStore {
            client,
            cloud_name,
            api_key,
            api_secret,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        })
    }

    /// Sign request params: sorted `k=v` pairs joined with `&`, secret
    /// appended, SHA-256 hex digest.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn upload_url(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base,
            self.cloud_name,
            resource_type(kind),
            action
        )
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_base, self.cloud_name, path)
    }
}

#[async_trait]
impl MediaStore for CdnMediaStore {
    async fn upload(
        &self,
        data: Bytes,
        folder: &str,
        filename: &str,
        kind: MediaKind,
    ) -> MediaResult<UploadedMedia> {
        validate_segment(folder)?;
        validate_segment(filename)?;

        let size = data.len() as u64;
        let start = std::time::Instant::now();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let signed_params = [
            ("folder", folder.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.sign(&signed_params);

        let file_part = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url(kind, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                %status,
                folder = %folder,
                filename = %filename,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "CDN upload failed"
            );
            return Err(MediaStoreError::UploadFailed(format!(
                "{}: {}",
                status, body
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;

        tracing::info!(
            folder = %folder,
            media_ref = %parsed.public_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CDN upload successful"
        );

        let thumbnail_url = match kind {
            MediaKind::Video => Some(self.video_thumbnail_url(&parsed.public_id)),
            MediaKind::Image => None,
        };

        Ok(UploadedMedia {
            url: parsed.secure_url,
            media_ref: parsed.public_id,
            kind,
            thumbnail_url,
        })
    }

    async fn delete(&self, media_ref: &str, kind: MediaKind) -> MediaResult<()> {
        let start = std::time::Instant::now();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let signed_params = [
            ("public_id", media_ref.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.sign(&signed_params);

        let form = [
            ("public_id", media_ref.to_string()),
            ("api_key", self.api_key.clone()),
            ("timestamp", timestamp),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self
            .client
            .post(self.upload_url(kind, "destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(
                %status,
                media_ref = %media_ref,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "CDN destroy failed"
            );
            return Err(MediaStoreError::DeleteFailed(status.to_string()));
        }

        let parsed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))?;

        // "not found" means a previous delete already won; idempotent success
        if parsed.result != "ok" && parsed.result != "not found" {
            return Err(MediaStoreError::DeleteFailed(parsed.result));
        }

        tracing::debug!(
            media_ref = %media_ref,
            result = %parsed.result,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CDN destroy successful"
        );

        Ok(())
    }

    async fn delete_folder(&self, folder: &str) -> MediaResult<()> {
        validate_segment(folder)?;
        let start = std::time::Instant::now();

        // Prefix-delete both resource types; promotional folders can hold
        // either.
        for rt in ["image", "video"] {
            let url = self.admin_url(&format!("resources/{}/upload", rt));
            let response = self
                .client
                .delete(&url)
                .basic_auth(&self.api_key, Some(&self.api_secret))
                .query(&[("prefix", folder)])
                .send()
                .await
                .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))?;

            if !response.status().is_success() && response.status().as_u16() != 404 {
                return Err(MediaStoreError::DeleteFailed(format!(
                    "prefix delete ({}) returned {}",
                    rt,
                    response.status()
                )));
            }
        }

        // Remove the now-empty folder marker; 404 means it never existed
        let response = self
            .client
            .delete(self.admin_url(&format!("folders/{}", folder)))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(MediaStoreError::DeleteFailed(format!(
                "folder delete returned {}",
                response.status()
            )));
        }

        tracing::info!(
            folder = %folder,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CDN folder delete successful"
        );

        Ok(())
    }

    async fn list_folders(&self, prefix: &str) -> MediaResult<Vec<String>> {
        validate_segment(prefix)?;

        let response = self
            .client
            .get(self.admin_url(&format!("folders/{}", prefix)))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .map_err(|e| MediaStoreError::BackendError(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(MediaStoreError::BackendError(format!(
                "folder list returned {}",
                response.status()
            )));
        }

        let parsed: FoldersResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::BackendError(e.to_string()))?;

        Ok(parsed.folders.into_iter().map(|f| f.path).collect())
    }

    fn video_thumbnail_url(&self, media_ref: &str) -> String {
        format!(
            "{}/{}/video/upload/w_640,h_360,c_fill,so_0/{}.jpg",
            self.delivery_base, self.cloud_name, media_ref
        )
    }

    fn derive_thumbnail(&self, url: &str) -> String {
        // Insert a first-frame transformation into a video delivery URL and
        // swap the extension; anything unrecognized passes through unchanged.
        let marker = "/video/upload/";
        match url.find(marker) {
            Some(pos) => {
                let (head, tail) = url.split_at(pos + marker.len());
                let tail = match tail.rfind('.') {
                    Some(dot) => &tail[..dot],
                    None => tail,
                };
                format!("{}so_0/{}.jpg", head, tail)
            }
            None => url.to_string(),
        }
    }
}
