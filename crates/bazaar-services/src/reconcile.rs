//! Orphan-folder reconciliation.
//!
//! Create and delete flows accept that a crash or media outage can strand
//! artifacts whose owning record is gone. Instead of distributed
//! transactions, this sweep re-lists the `products/` and `reviews/` subtrees
//! and bulk-deletes any folder whose slug no longer matches a live record.
//! Idempotent; safe to run on a schedule or by hand.

use std::collections::HashSet;
use std::sync::Arc;

use bazaar_core::{paths, AppError};
use bazaar_db::{CategoryStore, ProductStore, ReviewStore};
use bazaar_storage::MediaStore;

/// Outcome of one sweep.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Folders examined.
    pub scanned: usize,
    /// Orphaned folders that were removed.
    pub removed: Vec<String>,
    /// Orphaned folders whose removal failed (retried on the next sweep).
    pub failed: Vec<String>,
}

pub struct ReconcileService {
    categories: Arc<dyn CategoryStore>,
    products: Arc<dyn ProductStore>,
    reviews: Arc<dyn ReviewStore>,
    media: Arc<dyn MediaStore>,
}

impl ReconcileService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
        reviews: Arc<dyn ReviewStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            categories,
            products,
            reviews,
            media,
        }
    }

    /// Sweep the media store for folders no record claims.
    #[tracing::instrument(skip(self))]
    pub async fn sweep(&self) -> Result<ReconcileReport, AppError> {
        let categories = self.categories.list().await?;
        let products = self.products.list().await?;

        // Folders a live record still claims. Stored folders are
        // authoritative (frozen at creation): reviews created before a
        // rename still live under the old slugs, so their stored
        // media_folder counts, not a re-derivation from current names.
        let mut expected: HashSet<String> = HashSet::new();
        for category in &categories {
            expected.insert(category.media_folder.clone());
            expected.insert(format!("reviews/{}", category.slug));
        }
        for product in &products {
            expected.insert(product.media_folder.clone());
            if let Some(category) = categories.iter().find(|c| c.id == product.category_id) {
                expected.insert(paths::review_folder(&category.slug, &product.slug));
            }
            for review in self.reviews.list_by_product(product.id).await? {
                if let Some((parent, _)) = review.media_folder.rsplit_once('/') {
                    expected.insert(parent.to_string());
                }
                expected.insert(review.media_folder);
            }
        }

        let mut report = ReconcileReport::default();

        for root in ["products", "reviews"] {
            let top_level = self
                .media
                .list_folders(root)
                .await
                .map_err(|e| AppError::MediaStore(e.to_string()))?;

            for folder in top_level {
                report.scanned += 1;
                if !expected.contains(&folder) {
                    self.remove(&folder, &mut report).await;
                    continue;
                }

                // Live parent: descend one level to catch orphaned product
                // (or per-product review) folders under it.
                let child_prefix = match root {
                    "products" => format!("{}/products", folder),
                    _ => folder.clone(),
                };
                let children = match self.media.list_folders(&child_prefix).await {
                    Ok(children) => children,
                    Err(e) => {
                        tracing::warn!(prefix = %child_prefix, error = %e, "Failed to list media folders");
                        continue;
                    }
                };
                for child in children {
                    report.scanned += 1;
                    if !expected.contains(&child) {
                        self.remove(&child, &mut report).await;
                    }
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Media reconcile sweep finished"
        );
        Ok(report)
    }

    async fn remove(&self, folder: &str, report: &mut ReconcileReport) {
        match self.media.delete_folder(folder).await {
            Ok(()) => {
                tracing::info!(folder = %folder, "Removed orphaned media folder");
                report.removed.push(folder.to_string());
            }
            Err(e) => {
                tracing::warn!(folder = %folder, error = %e, "Failed to remove orphaned media folder");
                report.failed.push(folder.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FakeMediaStore, InMemoryCategories, InMemoryProducts, InMemoryReviews,
    };
    use bazaar_core::models::{
        NewCategory, NewProduct, NewReview, StockStatus, VariantType, Variants,
    };

    async fn seeded() -> (
        Arc<InMemoryCategories>,
        Arc<InMemoryProducts>,
        Arc<InMemoryReviews>,
    ) {
        let categories = Arc::new(InMemoryCategories::default());
        let products = Arc::new(InMemoryProducts::default());
        let reviews = Arc::new(InMemoryReviews::default());
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
        products
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
        (categories, products, reviews)
    }

    #[tokio::test]
    async fn test_sweep_removes_orphans_and_keeps_live_folders() {
        let (categories, products, reviews) = seeded().await;
        let media = FakeMediaStore::new();
        media.set_folders(
            "products",
            vec![
                "products/phone-cases".to_string(),
                "products/deleted-category".to_string(),
            ],
        );
        media.set_folders(
            "products/phone-cases/products",
            vec![
                "products/phone-cases/products/clear-case".to_string(),
                "products/phone-cases/products/deleted-product".to_string(),
            ],
        );
        media.set_folders("reviews", vec!["reviews/phone-cases".to_string()]);
        media.set_folders(
            "reviews/phone-cases",
            vec![
                "reviews/phone-cases/clear-case".to_string(),
                "reviews/phone-cases/deleted-product".to_string(),
            ],
        );

        let service = ReconcileService::new(categories, products, reviews, media.clone());
        let report = service.sweep().await.unwrap();

        let mut removed = report.removed.clone();
        removed.sort();
        assert_eq!(
            removed,
            vec![
                "products/deleted-category",
                "products/phone-cases/products/deleted-product",
                "reviews/phone-cases/deleted-product",
            ]
        );
        assert!(report.failed.is_empty());

        let deleted = media.deleted_folders.lock().unwrap().clone();
        assert!(!deleted.contains(&"products/phone-cases".to_string()));
        assert!(!deleted.contains(&"products/phone-cases/products/clear-case".to_string()));
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent_when_nothing_is_orphaned() {
        let (categories, products, reviews) = seeded().await;
        let media = FakeMediaStore::new();
        media.set_folders("products", vec!["products/phone-cases".to_string()]);
        media.set_folders(
            "products/phone-cases/products",
            vec!["products/phone-cases/products/clear-case".to_string()],
        );

        let service = ReconcileService::new(categories, products, reviews, media.clone());
        let report = service.sweep().await.unwrap();

        assert!(report.removed.is_empty());
        assert!(media.deleted_folders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_keeps_stored_review_folders_after_rename() {
        // Category renamed (slug now `cases`) after the review was created;
        // the review's media still lives under the old `phone-cases` slugs.
        let (categories, products, reviews) = seeded().await;
        let category = categories
            .list()
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        let product = products.list().await.unwrap().into_iter().next().unwrap();
        categories
            .update(
                category.id,
                bazaar_core::models::CategoryPatch {
                    name: Some("Cases".to_string()),
                    slug: Some("cases".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        reviews
            .insert(NewReview {
                product_id: product.id,
                reviewer_name: "Sam".to_string(),
                rating: 5,
                comment: "fits well".to_string(),
                images: vec!["https://cdn.test/r/a.jpg".to_string()],
                media_refs: vec!["reviews/phone-cases/clear-case/a.jpg".to_string()],
                media_folder: "reviews/phone-cases/clear-case".to_string(),
            })
            .await
            .unwrap();

        let media = FakeMediaStore::new();
        media.set_folders("products", vec!["products/phone-cases".to_string()]);
        media.set_folders(
            "products/phone-cases/products",
            vec!["products/phone-cases/products/clear-case".to_string()],
        );
        media.set_folders("reviews", vec!["reviews/phone-cases".to_string()]);
        media.set_folders(
            "reviews/phone-cases",
            vec!["reviews/phone-cases/clear-case".to_string()],
        );

        let service = ReconcileService::new(categories, products, reviews, media.clone());
        let report = service.sweep().await.unwrap();

        assert!(report.removed.is_empty());
        assert!(report.failed.is_empty());
        assert!(media.deleted_folders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_records_failed_removals() {
        let (categories, products, reviews) = seeded().await;
        let media = FakeMediaStore::new();
        media.set_folders("products", vec!["products/orphan".to_string()]);
        media.fail_folder_deletes(true);

        let service = ReconcileService::new(categories, products, reviews, media.clone());
        let report = service.sweep().await.unwrap();

        assert!(report.removed.is_empty());
        assert_eq!(report.failed, vec!["products/orphan"]);
    }
}
