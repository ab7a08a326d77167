use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::media::MediaPayload;

/// Customer review of a product. `images` may be empty; `media_refs` is
/// always the same length. `media_folder` is shared by all reviews of one
/// product and frozen at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub rating: i16,
    pub comment: String,
    pub images: Vec<String>,
    pub media_refs: Vec<String>,
    pub media_folder: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new review (repository input).
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub rating: i16,
    pub comment: String,
    pub images: Vec<String>,
    pub media_refs: Vec<String>,
    pub media_folder: String,
}

/// Request DTO for creating a review.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateReviewRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub reviewer_name: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(min = 1))]
    pub comment: String,
    /// Optional review photos; may be empty.
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<MediaPayload>,
}
