//! Promo lifecycle. All four promotional kinds share this single flow: one
//! media artifact, optional presentation fields, no dependents. Video media
//! is only accepted by the kinds that render it, and always carries a
//! thumbnail URL.

use std::sync::Arc;

use bazaar_core::models::{MediaKind, NewPromoItem, PromoItem, PromoKind, PromoPatch};
use bazaar_core::{paths, AppError};
use bazaar_db::PromoStore;
use bazaar_storage::MediaStore;
use uuid::Uuid;

use crate::media::MediaUpload;

/// Decoded create input.
pub struct PromoInput {
    pub kind: PromoKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub button_text: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub media_kind: MediaKind,
    pub media: MediaUpload,
}

/// Decoded partial-update input. `price` and `old_price` distinguish absence
/// from an explicit null.
#[derive(Default)]
pub struct PromoUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub button_text: Option<String>,
    pub price: Option<Option<f64>>,
    pub old_price: Option<Option<f64>>,
    pub media_kind: Option<MediaKind>,
    pub media: Option<MediaUpload>,
}

pub struct PromoService {
    promos: Arc<dyn PromoStore>,
    media: Arc<dyn MediaStore>,
}

impl PromoService {
    pub fn new(promos: Arc<dyn PromoStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { promos, media }
    }

    fn check_media_kind(kind: PromoKind, media_kind: MediaKind) -> Result<(), AppError> {
        if media_kind == MediaKind::Video && !kind.supports_video() {
            return Err(AppError::InvalidInput(format!(
                "{} items do not accept video media",
                kind.kind_slug()
            )));
        }
        Ok(())
    }

    /// Thumbnail for a freshly uploaded artifact: gateway-produced when
    /// available, derived from the public URL otherwise. Images carry none.
    fn thumbnail_for(
        &self,
        media_kind: MediaKind,
        uploaded_thumbnail: Option<String>,
        url: &str,
    ) -> Option<String> {
        match media_kind {
            MediaKind::Video => {
                Some(uploaded_thumbnail.unwrap_or_else(|| self.media.derive_thumbnail(url)))
            }
            MediaKind::Image => None,
        }
    }

    #[tracing::instrument(skip(self, input), fields(kind = ?input.kind, title = %input.title))]
    pub async fn create(&self, input: PromoInput) -> Result<PromoItem, AppError> {
        Self::check_media_kind(input.kind, input.media_kind)?;

        let folder = paths::promo_folder(input.kind.kind_slug());
        let uploaded = self
            .media
            .upload(
                input.media.data,
                &folder,
                &input.media.filename,
                input.media_kind,
            )
            .await
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        let thumbnail_url =
            self.thumbnail_for(input.media_kind, uploaded.thumbnail_url.clone(), &uploaded.url);

        self.promos
            .insert(NewPromoItem {
                kind: input.kind,
                title: input.title,
                subtitle: input.subtitle,
                description: input.description,
                redirect_url: input.redirect_url,
                button_text: input.button_text,
                price: input.price,
                old_price: input.old_price,
                media_kind: input.media_kind,
                media_url: uploaded.url,
                media_ref: uploaded.media_ref,
                thumbnail_url,
                media_folder: folder,
            })
            .await
    }

    /// Partial update. Replacement media deletes the old artifact first and
    /// recomputes the thumbnail for the new media kind.
    #[tracing::instrument(skip(self, update), fields(promo_id = %id))]
    pub async fn update(&self, id: Uuid, update: PromoUpdate) -> Result<PromoItem, AppError> {
        // Explicit null clears a price; an explicit value must still be a
        // valid price, checked here rather than by the DB constraint.
        if matches!(update.price, Some(Some(p)) if p < 0.0)
            || matches!(update.old_price, Some(Some(p)) if p < 0.0)
        {
            return Err(AppError::InvalidInput(
                "price values must be non-negative".to_string(),
            ));
        }

        let item = self
            .promos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Promo item not found".to_string()))?;

        let effective_kind = update.media_kind.unwrap_or(item.media_kind);
        Self::check_media_kind(item.kind, effective_kind)?;

        // The stored kind drives deletion and thumbnail handling for the
        // stored artifact, so relabeling it without replacing it would lie
        // about what is actually on the media store.
        if effective_kind != item.media_kind && update.media.is_none() {
            return Err(AppError::InvalidInput(
                "changing media_kind requires replacement media".to_string(),
            ));
        }

        let mut patch = PromoPatch {
            title: update.title,
            subtitle: update.subtitle,
            description: update.description,
            redirect_url: update.redirect_url,
            button_text: update.button_text,
            price: update.price,
            old_price: update.old_price,
            media_kind: update.media_kind,
            ..PromoPatch::default()
        };

        if let Some(media) = update.media {
            if let Err(e) = self.media.delete(&item.media_ref, item.media_kind).await {
                tracing::warn!(
                    media_ref = %item.media_ref,
                    error = %e,
                    "Failed to delete replaced promo media"
                );
            }
            let uploaded = self
                .media
                .upload(media.data, &item.media_folder, &media.filename, effective_kind)
                .await
                .map_err(|e| AppError::MediaStore(e.to_string()))?;

            patch.thumbnail_url = Some(self.thumbnail_for(
                effective_kind,
                uploaded.thumbnail_url.clone(),
                &uploaded.url,
            ));
            patch.media_url = Some(uploaded.url);
            patch.media_ref = Some(uploaded.media_ref);
            patch.media_kind = Some(effective_kind);
        }

        self.promos.update(id, patch).await
    }

    /// Delete the artifact then the record; a media failure is logged and
    /// reported but never keeps the record around.
    #[tracing::instrument(skip(self), fields(promo_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let item = self
            .promos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Promo item not found".to_string()))?;

        let media_deleted = match self.media.delete(&item.media_ref, item.media_kind).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    media_ref = %item.media_ref,
                    error = %e,
                    "Failed to delete promo media"
                );
                false
            }
        };

        self.promos.delete(id).await?;
        Ok(media_deleted)
    }

    pub async fn get(&self, id: Uuid) -> Result<PromoItem, AppError> {
        self.promos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Promo item not found".to_string()))
    }

    pub async fn list(&self, kind: PromoKind) -> Result<Vec<PromoItem>, AppError> {
        self.promos.list_by_kind(kind).await
    }
}
