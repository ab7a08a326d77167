use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::media::MediaPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    MobileModel,
    ClothingSize,
}

/// Product variant set: one variant axis with its options.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Variants {
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    pub options: Vec<String>,
}

/// Catalog product. `images` and `media_refs` are parallel lists of equal
/// length; `media_folder` is frozen at creation time and is the product's
/// bulk-deletion scope in the media store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub old_price: Option<f64>,
    pub images: Vec<String>,
    pub media_refs: Vec<String>,
    pub category_id: Uuid,
    pub parent_page: String,
    pub tags: Vec<String>,
    pub stock_status: StockStatus,
    pub is_active: bool,
    #[schema(value_type = Variants)]
    pub variants: sqlx::types::Json<Variants>,
    pub media_folder: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new product (repository input).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub old_price: Option<f64>,
    pub images: Vec<String>,
    pub media_refs: Vec<String>,
    pub category_id: Uuid,
    pub parent_page: String,
    pub tags: Vec<String>,
    pub stock_status: StockStatus,
    pub is_active: bool,
    pub variants: Variants,
    pub media_folder: String,
}

/// Partial update applied over an existing product. Absent fields retain
/// their prior values; `old_price` distinguishes "leave unchanged" (outer
/// `None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<Option<f64>>,
    pub images: Option<Vec<String>>,
    pub media_refs: Option<Vec<String>>,
    pub category_id: Option<Uuid>,
    pub parent_page: Option<String>,
    pub tags: Option<Vec<String>>,
    pub stock_status: Option<StockStatus>,
    pub is_active: Option<bool>,
    pub variants: Option<Variants>,
}

/// Request DTO for creating a product.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub old_price: Option<f64>,
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub parent_page: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub stock_status: StockStatus,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub variants: Variants,
    #[validate(length(min = 1, message = "at least one image is required"))]
    #[validate(nested)]
    pub images: Vec<MediaPayload>,
}

fn default_is_active() -> bool {
    true
}

/// Request DTO for updating a product. All fields optional (partial update).
/// `old_price` uses double-Option to distinguish absence from explicit null.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub old_price: Option<Option<f64>>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub parent_page: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub stock_status: Option<StockStatus>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub variants: Option<Variants>,
    /// Replacement media; when absent, existing images/refs are left
    /// untouched. When present, every prior artifact is deleted and the new
    /// list uploaded in its place.
    #[serde(default)]
    #[validate(nested)]
    pub images: Option<Vec<MediaPayload>>,
}

/// Serde helper: map a present-but-null JSON field to `Some(None)` and an
/// absent field to `None` (via `#[serde(default)]`).
pub(crate) mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_old_price_double_option() {
        let absent: UpdateProductRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.old_price, None);

        let null: UpdateProductRequest = serde_json::from_str(r#"{"old_price": null}"#).unwrap();
        assert_eq!(null.old_price, Some(None));

        let set: UpdateProductRequest = serde_json::from_str(r#"{"old_price": 9.5}"#).unwrap();
        assert_eq!(set.old_price, Some(Some(9.5)));
    }

    #[test]
    fn test_create_request_rejects_empty_images() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "title": "Clear Case",
            "description": "desc",
            "price": 9.99,
            "category_id": Uuid::new_v4(),
            "parent_page": "shop",
            "stock_status": "in_stock",
            "variants": {"type": "mobile_model", "options": ["iphone-15"]},
            "images": [],
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("images"));
    }

    #[test]
    fn test_variants_type_field_rename() {
        let v: Variants =
            serde_json::from_str(r#"{"type": "mobile_model", "options": ["iphone-15"]}"#).unwrap();
        assert_eq!(v.variant_type, VariantType::MobileModel);
        assert_eq!(v.options, vec!["iphone-15"]);
    }
}
