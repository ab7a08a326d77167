use async_trait::async_trait;
use bazaar_core::models::{NewProduct, Product, ProductPatch};
use bazaar_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::map_unique_violation;

/// Persistence operations for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, new: NewProduct) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError>;
    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>, AppError>;
    /// Products in one category, newest first.
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError>;
    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const COLUMNS: &str = "id, title, slug, description, price, old_price, images, media_refs, \
     category_id, parent_page, tags, stock_status, is_active, variants, media_folder, \
     created_at, updated_at";

/// Postgres-backed product repository.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "products", db.operation = "insert"))]
    async fn insert(&self, new: NewProduct) -> Result<Product, AppError> {
        let product = sqlx::query_as::<Postgres, Product>(&format!(
            r#"
            INSERT INTO products
                (id, title, slug, description, price, old_price, images, media_refs,
                 category_id, parent_page, tags, stock_status, is_active, variants, media_folder)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.old_price)
        .bind(&new.images)
        .bind(&new.media_refs)
        .bind(new.category_id)
        .bind(&new.parent_page)
        .bind(&new.tags)
        .bind(new.stock_status)
        .bind(new.is_active)
        .bind(Json(&new.variants))
        .bind(&new.media_folder)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Product with this title already exists"))?;

        Ok(product)
    }

    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<Postgres, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select"))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<Postgres, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<Postgres, Product>(&format!(
            "SELECT {COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select"))]
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<Postgres, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE category_id = $1 ORDER BY created_at DESC"
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "products", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError> {
        // old_price uses an explicit "set" flag so a present-but-null patch
        // clears the column instead of keeping it
        let old_price_set = patch.old_price.is_some();
        let old_price = patch.old_price.flatten();

        let product = sqlx::query_as::<Postgres, Product>(&format!(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                old_price = CASE WHEN $6 THEN $7 ELSE old_price END,
                images = COALESCE($8, images),
                media_refs = COALESCE($9, media_refs),
                category_id = COALESCE($10, category_id),
                parent_page = COALESCE($11, parent_page),
                tags = COALESCE($12, tags),
                stock_status = COALESCE($13, stock_status),
                is_active = COALESCE($14, is_active),
                variants = COALESCE($15, variants),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.slug)
        .bind(patch.description)
        .bind(patch.price)
        .bind(old_price_set)
        .bind(old_price)
        .bind(patch.images)
        .bind(patch.media_refs)
        .bind(patch.category_id)
        .bind(patch.parent_page)
        .bind(patch.tags)
        .bind(patch.stock_status)
        .bind(patch.is_active)
        .bind(patch.variants.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Product with this title already exists"))?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        Ok(product)
    }

    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
