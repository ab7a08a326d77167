//! Review lifecycle: creation with optional photos, deletion that never lets
//! a media outage keep the record around, and the read-side rating stats.

use std::sync::Arc;

use bazaar_core::models::{MediaKind, NewReview, Review};
use bazaar_core::{paths, AppError, ReviewStats};
use bazaar_db::{CategoryStore, ProductStore, ReviewStore};
use bazaar_storage::MediaStore;
use uuid::Uuid;

use crate::media::{self, MediaUpload};

/// Decoded create input.
pub struct ReviewInput {
    pub product_id: Uuid,
    pub reviewer_name: String,
    pub rating: i16,
    pub comment: String,
    pub images: Vec<MediaUpload>,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    media: Arc<dyn MediaStore>,
    concurrency: usize,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        media: Arc<dyn MediaStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            reviews,
            products,
            categories,
            media,
            concurrency,
        }
    }

    /// Create a review. Photos are optional; when present they land in the
    /// per-product review folder shared by all of the product's reviews.
    #[tracing::instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create(&self, input: ReviewInput) -> Result<Review, AppError> {
        if !(1..=5).contains(&input.rating) {
            return Err(AppError::InvalidInput(
                "rating must be between 1 and 5".to_string(),
            ));
        }

        let product = self
            .products
            .find_by_id(input.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        let category = self
            .categories
            .find_by_id(product.category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let folder = paths::review_folder(&category.slug, &product.slug);
        let uploaded = media::upload_all(
            &self.media,
            &folder,
            input.images,
            MediaKind::Image,
            self.concurrency,
        )
        .await?;

        self.reviews
            .insert(NewReview {
                product_id: product.id,
                reviewer_name: input.reviewer_name,
                rating: input.rating,
                comment: input.comment,
                images: uploaded.iter().map(|u| u.url.clone()).collect(),
                media_refs: uploaded.iter().map(|u| u.media_ref.clone()).collect(),
                media_folder: folder,
            })
            .await
    }

    /// Delete a review. Media refs are removed first but a failure there
    /// never blocks the record delete; returns whether media cleanup
    /// completed.
    #[tracing::instrument(skip(self), fields(review_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        let media_deleted = media::delete_refs(
            &self.media,
            &review.media_refs,
            MediaKind::Image,
            self.concurrency,
        )
        .await;

        self.reviews.delete(id).await?;

        if !media_deleted {
            tracing::warn!(review_id = %id, "Review deleted with incomplete media cleanup");
        }
        Ok(media_deleted)
    }

    pub async fn get(&self, id: Uuid) -> Result<Review, AppError> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
    }

    /// Reviews of one product, newest first. 404 when the product is missing.
    pub async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<Review>, AppError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        self.reviews.list_by_product(product_id).await
    }

    /// Aggregate rating statistics for one product.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn stats(&self, product_id: Uuid) -> Result<ReviewStats, AppError> {
        let reviews = self.list_by_product(product_id).await?;
        let ratings: Vec<u8> = reviews.iter().map(|r| r.rating as u8).collect();
        Ok(ReviewStats::from_ratings(&ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        payload, FakeMediaStore, InMemoryCategories, InMemoryProducts, InMemoryReviews,
    };
    use bazaar_core::models::{NewCategory, NewProduct, Product, StockStatus, VariantType, Variants};

    struct Fixture {
        reviews: Arc<InMemoryReviews>,
        media: Arc<FakeMediaStore>,
        service: ReviewService,
        product: Product,
    }

    async fn fixture() -> Fixture {
        let categories = Arc::new(InMemoryCategories::default());
        let products = Arc::new(InMemoryProducts::default());
        let reviews = Arc::new(InMemoryReviews::default());
        let media = FakeMediaStore::new();

        let category = categories
            .insert(NewCategory {
                name: "Phone Cases".to_string(),
                slug: "phone-cases".to_string(),
                image_url: "https://cdn.test/categories/cover.jpg".to_string(),
                media_ref: "categories/cover.jpg".to_string(),
                media_folder: "products/phone-cases".to_string(),
                parent_page: "shop".to_string(),
            })
            .await
            .unwrap();
        let product = products
            .insert(NewProduct {
                title: "Clear Case".to_string(),
                slug: "clear-case".to_string(),
                description: "desc".to_string(),
                price: 9.99,
                old_price: None,
                images: vec!["https://cdn.test/p/a.jpg".to_string()],
                media_refs: vec!["products/phone-cases/products/clear-case/a.jpg".to_string()],
                category_id: category.id,
                parent_page: "shop".to_string(),
                tags: vec![],
                stock_status: StockStatus::InStock,
                is_active: true,
                variants: Variants {
                    variant_type: VariantType::MobileModel,
                    options: vec!["iphone-15".to_string()],
                },
                media_folder: "products/phone-cases/products/clear-case".to_string(),
            })
            .await
            .unwrap();

        let service = ReviewService::new(
            reviews.clone(),
            products.clone(),
            categories.clone(),
            media.clone(),
            4,
        );
        Fixture {
            reviews,
            media,
            service,
            product,
        }
    }

    fn input(product_id: Uuid, rating: i16, images: Vec<crate::media::MediaUpload>) -> ReviewInput {
        ReviewInput {
            product_id,
            reviewer_name: "Sam".to_string(),
            rating,
            comment: "solid case".to_string(),
            images,
        }
    }

    #[tokio::test]
    async fn test_create_uploads_into_review_folder() {
        let f = fixture().await;
        let review = f
            .service
            .create(input(f.product.id, 5, vec![payload("photo.jpg")]))
            .await
            .unwrap();

        assert_eq!(review.media_folder, "reviews/phone-cases/clear-case");
        assert_eq!(
            review.media_refs,
            vec!["reviews/phone-cases/clear-case/photo.jpg"]
        );
        assert_eq!(review.images.len(), review.media_refs.len());
    }

    #[tokio::test]
    async fn test_create_without_images_skips_media_store() {
        let f = fixture().await;
        let review = f.service.create(input(f.product.id, 4, vec![])).await.unwrap();
        assert!(review.media_refs.is_empty());
        assert_eq!(f.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_create_for_missing_product_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .create(input(Uuid::new_v4(), 5, vec![payload("p.jpg")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(f.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_rating() {
        let f = fixture().await;
        let err = f.service.create(input(f.product.id, 6, vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_record_despite_media_outage() {
        let f = fixture().await;
        let review = f
            .service
            .create(input(f.product.id, 5, vec![payload("photo.jpg")]))
            .await
            .unwrap();

        f.media.fail_deletes(true);
        let media_deleted = f.service.delete(review.id).await.unwrap();

        assert!(!media_deleted);
        assert!(f.reviews.find_by_id(review.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_over_product_reviews() {
        let f = fixture().await;
        for rating in [5, 5, 4, 3] {
            f.service.create(input(f.product.id, rating, vec![])).await.unwrap();
        }

        let stats = f.service.stats(f.product.id).await.unwrap();
        assert_eq!(stats.total_reviews, 4);
        assert!((stats.average_rating - 4.25).abs() < f64::EPSILON);
        assert_eq!(stats.rating_counts[0].rating, 5);
        assert_eq!(stats.rating_counts[0].count, 2);
    }

    #[tokio::test]
    async fn test_stats_for_missing_product_is_not_found() {
        let f = fixture().await;
        let err = f.service.stats(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
