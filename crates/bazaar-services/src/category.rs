//! Category lifecycle: create with a single header image, partial update,
//! and the cascade-of-cascades that removes every product under the category
//! before the category itself.

use std::sync::Arc;

use bazaar_core::models::{Category, CategoryDeletionReport, CategoryPatch, MediaKind, NewCategory};
use bazaar_core::{paths, AppError};
use bazaar_db::{CategoryStore, ProductStore};
use bazaar_storage::MediaStore;
use uuid::Uuid;

use crate::media::MediaUpload;
use crate::product::ProductService;

pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    products: Arc<dyn ProductStore>,
    media: Arc<dyn MediaStore>,
    product_service: ProductService,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
        media: Arc<dyn MediaStore>,
        product_service: ProductService,
    ) -> Self {
        Self {
            categories,
            products,
            media,
            product_service,
        }
    }

    /// Create a category. Name and slug uniqueness are checked before the
    /// header image is uploaded, so a duplicate costs nothing remotely.
    /// `media_folder` is frozen here: later renames change the slug but never
    /// the deletion scope.
    #[tracing::instrument(skip(self, image), fields(name = %name))]
    pub async fn create(
        &self,
        name: String,
        parent_page: String,
        image: MediaUpload,
    ) -> Result<Category, AppError> {
        let slug = paths::slug(&name);
        if self.categories.find_by_name(&name).await?.is_some()
            || self.categories.find_by_slug(&slug).await?.is_some()
        {
            return Err(AppError::Conflict(
                "Category with this name already exists".to_string(),
            ));
        }

        let uploaded = self
            .media
            .upload(
                image.data,
                &paths::category_image_folder(),
                &image.filename,
                MediaKind::Image,
            )
            .await
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        self.categories
            .insert(NewCategory {
                name,
                slug: slug.clone(),
                image_url: uploaded.url,
                media_ref: uploaded.media_ref,
                media_folder: paths::category_folder(&slug),
                parent_page,
            })
            .await
    }

    /// Partial update. A replacement image deletes the old artifact first;
    /// renaming updates name and slug but leaves the frozen media folder.
    #[tracing::instrument(skip(self, image), fields(category_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        parent_page: Option<String>,
        image: Option<MediaUpload>,
    ) -> Result<Category, AppError> {
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let mut patch = CategoryPatch {
            parent_page,
            ..CategoryPatch::default()
        };

        if let Some(name) = name {
            if name != category.name {
                let slug = paths::slug(&name);
                let name_taken = self.categories.find_by_name(&name).await?.is_some();
                let slug_taken =
                    slug != category.slug && self.categories.find_by_slug(&slug).await?.is_some();
                if name_taken || slug_taken {
                    return Err(AppError::Conflict(
                        "Category with this name already exists".to_string(),
                    ));
                }
                patch.name = Some(name);
                patch.slug = Some(slug);
            }
        }

        if let Some(image) = image {
            if let Err(e) = self
                .media
                .delete(&category.media_ref, MediaKind::Image)
                .await
            {
                tracing::warn!(
                    media_ref = %category.media_ref,
                    error = %e,
                    "Failed to delete replaced category image"
                );
            }
            let uploaded = self
                .media
                .upload(
                    image.data,
                    &paths::category_image_folder(),
                    &image.filename,
                    MediaKind::Image,
                )
                .await
                .map_err(|e| AppError::MediaStore(e.to_string()))?;
            patch.image_url = Some(uploaded.url);
            patch.media_ref = Some(uploaded.media_ref);
        }

        self.categories.update(id, patch).await
    }

    /// Delete a category: run the full product cascade for every product
    /// under it, then remove the category's own image, its subtree folder,
    /// and finally the record. Media failures are reported, not fatal.
    #[tracing::instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<CategoryDeletionReport, AppError> {
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let products = self.products.list_by_category(id).await?;
        let mut product_reports = Vec::with_capacity(products.len());
        for product in &products {
            product_reports.push(self.product_service.delete_cascade(product).await?);
        }

        let media_deleted = match self
            .media
            .delete(&category.media_ref, MediaKind::Image)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    media_ref = %category.media_ref,
                    error = %e,
                    "Failed to delete category image"
                );
                false
            }
        };

        let folder_deleted = match self.media.delete_folder(&category.media_folder).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    folder = %category.media_folder,
                    error = %e,
                    "Failed to delete category media folder"
                );
                false
            }
        };

        let record_deleted = self.categories.delete(id).await?;

        Ok(CategoryDeletionReport {
            media_deleted,
            folder_deleted,
            record_deleted,
            product_reports,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, AppError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category, AppError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ProductInput, ProductService};
    use crate::test_support::{
        payload, FakeMediaStore, InMemoryCategories, InMemoryProducts, InMemoryReviews,
    };
    use bazaar_core::models::{StockStatus, VariantType, Variants};

    struct Fixture {
        categories: Arc<InMemoryCategories>,
        products: Arc<InMemoryProducts>,
        media: Arc<FakeMediaStore>,
        product_service: ProductService,
        service: CategoryService,
    }

    fn fixture() -> Fixture {
        let categories = Arc::new(InMemoryCategories::default());
        let products = Arc::new(InMemoryProducts::default());
        let reviews = Arc::new(InMemoryReviews::default());
        let media = FakeMediaStore::new();
        let product_service = ProductService::new(
            products.clone(),
            categories.clone(),
            reviews.clone(),
            media.clone(),
            4,
        );
        let service = CategoryService::new(
            categories.clone(),
            products.clone(),
            media.clone(),
            product_service.clone(),
        );
        Fixture {
            categories,
            products,
            media,
            product_service,
            service,
        }
    }

    async fn seed_product(f: &Fixture, category_id: Uuid, title: &str) {
        f.product_service
            .create(ProductInput {
                title: title.to_string(),
                description: "desc".to_string(),
                price: 9.99,
                old_price: None,
                category_id,
                parent_page: "shop".to_string(),
                tags: vec![],
                stock_status: StockStatus::InStock,
                is_active: true,
                variants: Variants {
                    variant_type: VariantType::MobileModel,
                    options: vec!["iphone-15".to_string()],
                },
                images: vec![payload("img.jpg")],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_freezes_media_folder() {
        let f = fixture();
        let category = f
            .service
            .create(
                "Phone Cases".to_string(),
                "shop".to_string(),
                payload("cover.jpg"),
            )
            .await
            .unwrap();

        assert_eq!(category.slug, "phone-cases");
        assert_eq!(category.media_folder, "products/phone-cases");
        assert_eq!(category.media_ref, "categories/cover.jpg");

        // Rename changes name and slug but never the frozen folder
        let renamed = f
            .service
            .update(category.id, Some("Cases".to_string()), None, None)
            .await
            .unwrap();
        assert_eq!(renamed.slug, "cases");
        assert_eq!(renamed.media_folder, "products/phone-cases");
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflicts_before_upload() {
        let f = fixture();
        f.service
            .create(
                "Phone Cases".to_string(),
                "shop".to_string(),
                payload("a.jpg"),
            )
            .await
            .unwrap();

        let err = f
            .service
            .create(
                "Phone Cases".to_string(),
                "shop".to_string(),
                payload("b.jpg"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(f.media.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_image_once() {
        let f = fixture();
        let category = f
            .service
            .create(
                "Phone Cases".to_string(),
                "shop".to_string(),
                payload("old.jpg"),
            )
            .await
            .unwrap();

        let updated = f
            .service
            .update(category.id, None, None, Some(payload("new.jpg")))
            .await
            .unwrap();

        let deleted = f.media.deleted_refs.lock().unwrap().clone();
        assert_eq!(deleted, vec!["categories/old.jpg".to_string()]);
        assert_eq!(updated.media_ref, "categories/new.jpg");
    }

    #[tokio::test]
    async fn test_delete_cascades_products_and_reports_each() {
        let f = fixture();
        let category = f
            .service
            .create(
                "Phone Cases".to_string(),
                "shop".to_string(),
                payload("cover.jpg"),
            )
            .await
            .unwrap();
        seed_product(&f, category.id, "Clear Case").await;
        seed_product(&f, category.id, "Leather Case").await;

        let report = f.service.delete(category.id).await.unwrap();

        assert_eq!(report.product_reports.len(), 2);
        assert!(report.product_reports.iter().all(|r| r.fully_cleaned()));
        assert!(report.media_deleted);
        assert!(report.folder_deleted);
        assert!(report.record_deleted);

        assert!(f.categories.find_by_id(category.id).await.unwrap().is_none());
        assert!(f
            .products
            .list_by_category(category.id)
            .await
            .unwrap()
            .is_empty());

        let folders = f.media.deleted_folders.lock().unwrap().clone();
        assert!(folders.contains(&"products/phone-cases".to_string()));
        assert!(folders.contains(&"products/phone-cases/products/clear-case".to_string()));
    }

    #[tokio::test]
    async fn test_delete_reports_media_outage_but_removes_record() {
        let f = fixture();
        let category = f
            .service
            .create(
                "Phone Cases".to_string(),
                "shop".to_string(),
                payload("cover.jpg"),
            )
            .await
            .unwrap();

        f.media.fail_deletes(true);
        f.media.fail_folder_deletes(true);

        let report = f.service.delete(category.id).await.unwrap();

        assert!(!report.media_deleted);
        assert!(!report.folder_deleted);
        assert!(report.record_deleted);
        assert!(f.categories.find_by_id(category.id).await.unwrap().is_none());
    }
}
