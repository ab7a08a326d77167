//! In-memory repository and media-store fakes for service tests.
//!
//! The repository fakes enforce the same unique keys as the SQL schema so
//! conflict paths behave like the Postgres implementations. The media fake
//! records every call and can be flipped into failure modes per operation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bazaar_core::models::{
    Category, CategoryPatch, MediaKind, NewCategory, NewProduct, NewPromoItem, NewReview, Product,
    ProductPatch, PromoItem, PromoKind, PromoPatch, Review,
};
use bazaar_core::AppError;
use bazaar_db::{CategoryStore, ProductStore, PromoStore, ReviewStore};
use bazaar_storage::{MediaResult, MediaStore, MediaStoreError, UploadedMedia};
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryCategories {
    rows: Mutex<Vec<Category>>,
}

#[async_trait]
impl CategoryStore for InMemoryCategories {
    async fn insert(&self, new: NewCategory) -> Result<Category, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.name == new.name || c.slug == new.slug) {
            return Err(AppError::Conflict(
                "Category with this name already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            slug: new.slug,
            image_url: new.image_url,
            media_ref: new.media_ref,
            media_folder: new.media_folder,
            parent_page: new.parent_page,
            created_at: now,
            updated_at: now,
        };
        rows.push(category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(slug) = patch.slug {
            row.slug = slug;
        }
        if let Some(image_url) = patch.image_url {
            row.image_url = image_url;
        }
        if let Some(media_ref) = patch.media_ref {
            row.media_ref = media_ref;
        }
        if let Some(parent_page) = patch.parent_page {
            row.parent_page = parent_page;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductStore for InMemoryProducts {
    async fn insert(&self, new: NewProduct) -> Result<Product, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.slug == new.slug) {
            return Err(AppError::Conflict(
                "Product with this title already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            title: new.title,
            slug: new.slug,
            description: new.description,
            price: new.price,
            old_price: new.old_price,
            images: new.images,
            media_refs: new.media_refs,
            category_id: new.category_id,
            parent_page: new.parent_page,
            tags: new.tags,
            stock_status: new.stock_status,
            is_active: new.is_active,
            variants: sqlx::types::Json(new.variants),
            media_folder: new.media_folder,
            created_at: now,
            updated_at: now,
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError> {
        let mut rows: Vec<Product> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(slug) = patch.slug {
            row.slug = slug;
        }
        if let Some(description) = patch.description {
            row.description = description;
        }
        if let Some(price) = patch.price {
            row.price = price;
        }
        if let Some(old_price) = patch.old_price {
            row.old_price = old_price;
        }
        if let Some(images) = patch.images {
            row.images = images;
        }
        if let Some(media_refs) = patch.media_refs {
            row.media_refs = media_refs;
        }
        if let Some(category_id) = patch.category_id {
            row.category_id = category_id;
        }
        if let Some(parent_page) = patch.parent_page {
            row.parent_page = parent_page;
        }
        if let Some(tags) = patch.tags {
            row.tags = tags;
        }
        if let Some(stock_status) = patch.stock_status {
            row.stock_status = stock_status;
        }
        if let Some(is_active) = patch.is_active {
            row.is_active = is_active;
        }
        if let Some(variants) = patch.variants {
            row.variants = sqlx::types::Json(variants);
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryReviews {
    rows: Mutex<Vec<Review>>,
}

#[async_trait]
impl ReviewStore for InMemoryReviews {
    async fn insert(&self, new: NewReview) -> Result<Review, AppError> {
        let review = Review {
            id: Uuid::new_v4(),
            product_id: new.product_id,
            reviewer_name: new.reviewer_name,
            rating: new.rating,
            comment: new.comment,
            images: new.images,
            media_refs: new.media_refs,
            media_folder: new.media_folder,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<Review>, AppError> {
        let mut rows: Vec<Review> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_many_by_product(&self, product_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.product_id != product_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryPromos {
    rows: Mutex<Vec<PromoItem>>,
}

#[async_trait]
impl PromoStore for InMemoryPromos {
    async fn insert(&self, new: NewPromoItem) -> Result<PromoItem, AppError> {
        let now = Utc::now();
        let item = PromoItem {
            id: Uuid::new_v4(),
            kind: new.kind,
            title: new.title,
            subtitle: new.subtitle,
            description: new.description,
            redirect_url: new.redirect_url,
            button_text: new.button_text,
            price: new.price,
            old_price: new.old_price,
            media_kind: new.media_kind,
            media_url: new.media_url,
            media_ref: new.media_ref,
            thumbnail_url: new.thumbnail_url,
            media_folder: new.media_folder,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PromoItem>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_kind(&self, kind: PromoKind) -> Result<Vec<PromoItem>, AppError> {
        let mut rows: Vec<PromoItem> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.kind == kind)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn update(&self, id: Uuid, patch: PromoPatch) -> Result<PromoItem, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Promo item not found".to_string()))?;
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            row.subtitle = Some(subtitle);
        }
        if let Some(description) = patch.description {
            row.description = Some(description);
        }
        if let Some(redirect_url) = patch.redirect_url {
            row.redirect_url = Some(redirect_url);
        }
        if let Some(button_text) = patch.button_text {
            row.button_text = Some(button_text);
        }
        if let Some(price) = patch.price {
            row.price = price;
        }
        if let Some(old_price) = patch.old_price {
            row.old_price = old_price;
        }
        if let Some(media_kind) = patch.media_kind {
            row.media_kind = media_kind;
        }
        if let Some(media_url) = patch.media_url {
            row.media_url = media_url;
        }
        if let Some(media_ref) = patch.media_ref {
            row.media_ref = media_ref;
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            row.thumbnail_url = thumbnail_url;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}

/// Recording media store with per-operation failure switches.
#[derive(Default)]
pub struct FakeMediaStore {
    pub uploads: Mutex<Vec<String>>,
    pub deleted_refs: Mutex<Vec<String>>,
    pub deleted_folders: Mutex<Vec<String>>,
    pub folders: Mutex<HashMap<String, Vec<String>>>,
    pub fail_uploads: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub fail_folder_deletes: AtomicBool,
}

impl FakeMediaStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_folder_deletes(&self, fail: bool) {
        self.fail_folder_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn set_folders(&self, prefix: &str, folders: Vec<String>) {
        self.folders
            .lock()
            .unwrap()
            .insert(prefix.to_string(), folders);
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(
        &self,
        _data: Bytes,
        folder: &str,
        filename: &str,
        kind: MediaKind,
    ) -> MediaResult<UploadedMedia> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaStoreError::UploadFailed("simulated outage".to_string()));
        }
        let media_ref = format!("{}/{}", folder, filename);
        self.uploads.lock().unwrap().push(media_ref.clone());
        let url = format!("https://cdn.test/{}", media_ref);
        let thumbnail_url = match kind {
            MediaKind::Video => Some(format!("https://cdn.test/thumb/{}", media_ref)),
            MediaKind::Image => None,
        };
        Ok(UploadedMedia {
            url,
            media_ref,
            kind,
            thumbnail_url,
        })
    }

    async fn delete(&self, media_ref: &str, _kind: MediaKind) -> MediaResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaStoreError::DeleteFailed("simulated outage".to_string()));
        }
        self.deleted_refs.lock().unwrap().push(media_ref.to_string());
        Ok(())
    }

    async fn delete_folder(&self, folder: &str) -> MediaResult<()> {
        if self.fail_folder_deletes.load(Ordering::SeqCst) {
            return Err(MediaStoreError::DeleteFailed("simulated outage".to_string()));
        }
        self.deleted_folders.lock().unwrap().push(folder.to_string());
        Ok(())
    }

    async fn list_folders(&self, prefix: &str) -> MediaResult<Vec<String>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .get(prefix)
            .cloned()
            .unwrap_or_default())
    }

    fn video_thumbnail_url(&self, media_ref: &str) -> String {
        format!("https://cdn.test/thumb/{}", media_ref)
    }
}

pub fn payload(filename: &str) -> crate::media::MediaUpload {
    crate::media::MediaUpload {
        filename: filename.to_string(),
        data: Bytes::from_static(b"bytes"),
    }
}
