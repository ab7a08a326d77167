use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::media::MediaPayload;

/// Top-level catalog grouping. `slug` is always the normalized form of
/// `name`; both are unique. `media_folder` is frozen at creation time and is
/// the bulk-deletion scope for the category's products.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub media_ref: String,
    pub media_folder: String,
    pub parent_page: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new category (repository input).
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub media_ref: String,
    pub media_folder: String,
    pub parent_page: String,
}

/// Partial update applied over an existing category. Absent fields retain
/// their prior values.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub media_ref: Option<String>,
    pub parent_page: Option<String>,
}

/// Request DTO for creating a category.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub parent_page: String,
    #[validate(nested)]
    pub image: MediaPayload,
}

/// Request DTO for updating a category. All fields optional (partial update).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub parent_page: Option<String>,
    /// Replacement image; when absent, existing media is left untouched.
    #[serde(default)]
    #[validate(nested)]
    pub image: Option<MediaPayload>,
}
