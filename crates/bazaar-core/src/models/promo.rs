use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::media::{MediaKind, MediaPayload};

/// The four promotional surfaces share one lifecycle (single media artifact,
/// no uniqueness constraint, no dependents), so they are one discriminated
/// record rather than four copy-pasted flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "promo_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    Explore,
    Featured,
    HeroSlider,
    VideoItem,
}

impl PromoKind {
    /// Slug segment used in the promo media folder path.
    pub fn kind_slug(&self) -> &'static str {
        match self {
            PromoKind::Explore => "explore",
            PromoKind::Featured => "featured",
            PromoKind::HeroSlider => "hero-sliders",
            PromoKind::VideoItem => "video-items",
        }
    }

    /// Whether this kind may carry video media (and therefore a thumbnail).
    pub fn supports_video(&self) -> bool {
        matches!(self, PromoKind::HeroSlider | PromoKind::VideoItem)
    }
}

/// Promotional record with one primary media artifact. Per-kind presentation
/// fields are optional columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromoItem {
    pub id: Uuid,
    pub kind: PromoKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub button_text: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub media_kind: MediaKind,
    pub media_url: String,
    pub media_ref: String,
    pub thumbnail_url: Option<String>,
    pub media_folder: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new promo item (repository input).
#[derive(Debug, Clone)]
pub struct NewPromoItem {
    pub kind: PromoKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub button_text: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub media_kind: MediaKind,
    pub media_url: String,
    pub media_ref: String,
    pub thumbnail_url: Option<String>,
    pub media_folder: String,
}

/// Partial update applied over an existing promo item. `price` and
/// `old_price` use double-Option so an explicit null clears the field.
#[derive(Debug, Clone, Default)]
pub struct PromoPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub button_text: Option<String>,
    pub price: Option<Option<f64>>,
    pub old_price: Option<Option<f64>>,
    pub media_kind: Option<MediaKind>,
    pub media_url: Option<String>,
    pub media_ref: Option<String>,
    pub thumbnail_url: Option<Option<String>>,
}

/// Request DTO for creating a promo item.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePromoRequest {
    pub kind: PromoKind,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub old_price: Option<f64>,
    /// Defaults to image; hero sliders and video items may submit video.
    #[serde(default = "default_media_kind")]
    pub media_kind: MediaKind,
    #[validate(nested)]
    pub media: MediaPayload,
}

fn default_media_kind() -> MediaKind {
    MediaKind::Image
}

/// Request DTO for updating a promo item.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePromoRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default, with = "super::product::double_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<f64>>,
    #[serde(default, with = "super::product::double_option")]
    #[schema(value_type = Option<f64>)]
    pub old_price: Option<Option<f64>>,
    #[serde(default)]
    pub media_kind: Option<MediaKind>,
    /// Replacement media; when absent, the existing artifact is left
    /// untouched.
    #[serde(default)]
    #[validate(nested)]
    pub media: Option<MediaPayload>,
}
