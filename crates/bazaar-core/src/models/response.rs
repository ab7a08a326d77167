use serde::Serialize;
use utoipa::ToSchema;

/// Uniform caller-facing envelope: `{success, data?, count?, message?}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            count: None,
            message: None,
        }
    }

    pub fn list(data: T, count: usize) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            count: Some(count),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            count: None,
            message: Some(message.into()),
        }
    }
}

/// Partial-failure report for a product deletion cascade.
///
/// `record_deleted` is the only step whose failure aborts the operation; the
/// media flags tell the caller whether manual media-store cleanup is needed.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct DeletionReport {
    pub media_deleted: bool,
    pub review_media_deleted: bool,
    pub reviews_deleted: bool,
    pub record_deleted: bool,
}

impl DeletionReport {
    pub fn pending() -> Self {
        DeletionReport {
            media_deleted: false,
            review_media_deleted: false,
            reviews_deleted: false,
            record_deleted: false,
        }
    }

    /// True when every cascade step succeeded and no remnants remain.
    pub fn fully_cleaned(&self) -> bool {
        self.media_deleted && self.review_media_deleted && self.reviews_deleted && self.record_deleted
    }
}

/// Report for a category deletion: the category's own cleanup plus one
/// product report per cascaded product.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDeletionReport {
    pub media_deleted: bool,
    pub folder_deleted: bool,
    pub record_deleted: bool,
    pub product_reports: Vec<DeletionReport>,
}
