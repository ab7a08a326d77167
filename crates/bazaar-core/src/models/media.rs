use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Kind of media artifact held by an entity. Deletion and thumbnail
/// derivation depend on it, so it is stored alongside the media ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Inline media artifact submitted with a create/update request.
///
/// `data` is base64-encoded; handlers decode it before it reaches the
/// lifecycle services.
///
/// `Serialize` is required by `validator` to report list-level length
/// violations on `Vec<MediaPayload>` fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct MediaPayload {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    #[validate(length(min = 1))]
    pub data: String,
}
