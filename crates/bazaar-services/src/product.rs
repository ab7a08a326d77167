//! Product lifecycle: media-first create, partial update with media
//! replacement, and the deletion cascade that reports partial failures.

use std::sync::Arc;

use bazaar_core::models::{
    DeletionReport, MediaKind, NewProduct, Product, ProductPatch, StockStatus, Variants,
};
use bazaar_core::{paths, AppError};
use bazaar_db::{CategoryStore, ProductStore, ReviewStore};
use bazaar_storage::MediaStore;
use uuid::Uuid;

use crate::media::{self, MediaUpload};

/// Decoded create input (request DTO with media payloads already decoded).
pub struct ProductInput {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub old_price: Option<f64>,
    pub category_id: Uuid,
    pub parent_page: String,
    pub tags: Vec<String>,
    pub stock_status: StockStatus,
    pub is_active: bool,
    pub variants: Variants,
    pub images: Vec<MediaUpload>,
}

/// Decoded partial-update input. `old_price` distinguishes absence from an
/// explicit null; `images`, when present, replaces the whole media set.
#[derive(Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<Option<f64>>,
    pub category_id: Option<Uuid>,
    pub parent_page: Option<String>,
    pub tags: Option<Vec<String>>,
    pub stock_status: Option<StockStatus>,
    pub is_active: Option<bool>,
    pub variants: Option<Variants>,
    pub images: Option<Vec<MediaUpload>>,
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    reviews: Arc<dyn ReviewStore>,
    media: Arc<dyn MediaStore>,
    concurrency: usize,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        reviews: Arc<dyn ReviewStore>,
        media: Arc<dyn MediaStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            products,
            categories,
            reviews,
            media,
            concurrency,
        }
    }

    /// Create a product: uniqueness is checked before any upload so a
    /// duplicate title costs nothing on the media store.
    #[tracing::instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: ProductInput) -> Result<Product, AppError> {
        if input.images.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one image is required".to_string(),
            ));
        }
        if input.variants.options.is_empty() {
            return Err(AppError::InvalidInput(
                "variants must include at least one option".to_string(),
            ));
        }

        let category = self
            .categories
            .find_by_id(input.category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let slug = paths::slug(&input.title);
        if self.products.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(
                "Product with this title already exists".to_string(),
            ));
        }

        let folder = paths::product_folder(&category.slug, &slug);
        let uploaded = media::upload_all(
            &self.media,
            &folder,
            input.images,
            MediaKind::Image,
            self.concurrency,
        )
        .await?;

        let images = uploaded.iter().map(|u| u.url.clone()).collect();
        let media_refs = uploaded.iter().map(|u| u.media_ref.clone()).collect();

        self.products
            .insert(NewProduct {
                title: input.title,
                slug,
                description: input.description,
                price: input.price,
                old_price: input.old_price,
                images,
                media_refs,
                category_id: category.id,
                parent_page: input.parent_page,
                tags: input.tags,
                stock_status: input.stock_status,
                is_active: input.is_active,
                variants: input.variants,
                media_folder: folder,
            })
            .await
    }

    /// Partial update. When replacement images are supplied, every prior
    /// artifact is deleted and the new set uploaded into the product's frozen
    /// media folder; otherwise media is left untouched.
    #[tracing::instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update(&self, id: Uuid, update: ProductUpdate) -> Result<Product, AppError> {
        // Explicit null clears old_price; an explicit value must still be a
        // valid price, checked here rather than by the DB constraint.
        if matches!(update.old_price, Some(Some(p)) if p < 0.0) {
            return Err(AppError::InvalidInput(
                "old_price must be non-negative".to_string(),
            ));
        }

        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let mut patch = ProductPatch {
            description: update.description,
            price: update.price,
            old_price: update.old_price,
            parent_page: update.parent_page,
            tags: update.tags,
            stock_status: update.stock_status,
            is_active: update.is_active,
            ..ProductPatch::default()
        };

        if let Some(variants) = update.variants {
            if variants.options.is_empty() {
                return Err(AppError::InvalidInput(
                    "variants must include at least one option".to_string(),
                ));
            }
            patch.variants = Some(variants);
        }

        if let Some(title) = update.title {
            if title != product.title {
                let slug = paths::slug(&title);
                if slug != product.slug && self.products.find_by_slug(&slug).await?.is_some() {
                    return Err(AppError::Conflict(
                        "Product with this title already exists".to_string(),
                    ));
                }
                patch.slug = Some(slug);
                patch.title = Some(title);
            }
        }

        if let Some(category_id) = update.category_id {
            if category_id != product.category_id {
                self.categories
                    .find_by_id(category_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
                patch.category_id = Some(category_id);
            }
        }

        if let Some(images) = update.images {
            if images.is_empty() {
                return Err(AppError::InvalidInput(
                    "at least one image is required".to_string(),
                ));
            }
            // Old artifacts go first; an upload failure after this point
            // leaves the record with its stale URLs, which is logged and
            // accepted.
            media::delete_refs(
                &self.media,
                &product.media_refs,
                MediaKind::Image,
                self.concurrency,
            )
            .await;
            let uploaded = media::upload_all(
                &self.media,
                &product.media_folder,
                images,
                MediaKind::Image,
                self.concurrency,
            )
            .await?;
            patch.images = Some(uploaded.iter().map(|u| u.url.clone()).collect());
            patch.media_refs = Some(uploaded.iter().map(|u| u.media_ref.clone()).collect());
        }

        self.products.update(id, patch).await
    }

    /// Delete a product and everything under it, reporting which cleanup
    /// steps succeeded. Only a failure to delete the record itself aborts.
    #[tracing::instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<DeletionReport, AppError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        self.delete_cascade(&product).await
    }

    /// The cascade body, shared with category deletion.
    pub(crate) async fn delete_cascade(&self, product: &Product) -> Result<DeletionReport, AppError> {
        let reviews = self.reviews.list_by_product(product.id).await?;
        let mut report = DeletionReport::pending();

        report.media_deleted = media::delete_folder_or_refs(
            &self.media,
            &product.media_folder,
            &product.media_refs,
            MediaKind::Image,
            self.concurrency,
        )
        .await;

        report.review_media_deleted = match reviews.first() {
            Some(first) => {
                let all_refs: Vec<String> = reviews
                    .iter()
                    .flat_map(|r| r.media_refs.iter().cloned())
                    .collect();
                media::delete_folder_or_refs(
                    &self.media,
                    &first.media_folder,
                    &all_refs,
                    MediaKind::Image,
                    self.concurrency,
                )
                .await
            }
            None => true,
        };

        report.reviews_deleted = match self.reviews.delete_many_by_product(product.id).await {
            Ok(removed) => {
                tracing::debug!(product_id = %product.id, removed, "Deleted product reviews");
                true
            }
            Err(e) => {
                tracing::warn!(product_id = %product.id, error = %e, "Failed to delete product reviews");
                false
            }
        };

        report.record_deleted = self.products.delete(product.id).await?;

        if !report.fully_cleaned() {
            tracing::warn!(
                product_id = %product.id,
                media_deleted = report.media_deleted,
                review_media_deleted = report.review_media_deleted,
                reviews_deleted = report.reviews_deleted,
                "Product deleted with incomplete cleanup"
            );
        }

        Ok(report)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Product, AppError> {
        self.products
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.products.list().await
    }

    pub async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.products.list_by_category(category_id).await
    }
}
