use crate::{CdnMediaStore, LocalMediaStore, MediaStore, MediaStoreError, MediaResult};
use bazaar_core::config::{Config, MediaBackend};
use std::sync::Arc;

/// Create a media store backend based on configuration.
pub async fn create_media_store(config: &Config) -> MediaResult<Arc<dyn MediaStore>> {
    match config.media_backend() {
        MediaBackend::Cdn => {
            let cloud_name = config
                .cdn_cloud_name()
                .map(String::from)
                .ok_or_else(|| MediaStoreError::ConfigError("CDN_CLOUD_NAME not configured".to_string()))?;
            let api_key = config
                .cdn_api_key()
                .map(String::from)
                .ok_or_else(|| MediaStoreError::ConfigError("CDN_API_KEY not configured".to_string()))?;
            let api_secret = config
                .cdn_api_secret()
                .map(String::from)
                .ok_or_else(|| MediaStoreError::ConfigError("CDN_API_SECRET not configured".to_string()))?;
            let api_base = config.cdn_base_url().map(String::from);

            let store = CdnMediaStore::new(cloud_name, api_key, api_secret, api_base)?;
            Ok(Arc::new(store))
        }
        MediaBackend::Local => {
            let base_path = config.local_media_path().map(String::from).ok_or_else(|| {
                MediaStoreError::ConfigError("LOCAL_MEDIA_PATH not configured".to_string())
            })?;
            let base_url = config
                .local_media_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    MediaStoreError::ConfigError("LOCAL_MEDIA_BASE_URL not configured".to_string())
                })?;

            let store = LocalMediaStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }
    }
}
