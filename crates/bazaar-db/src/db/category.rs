use async_trait::async_trait;
use bazaar_core::models::{Category, CategoryPatch, NewCategory};
use bazaar_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::map_unique_violation;

/// Persistence operations for categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert(&self, new: NewCategory) -> Result<Category, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError>;
    /// All categories, newest first.
    async fn list(&self) -> Result<Vec<Category>, AppError>;
    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const COLUMNS: &str =
    "id, name, slug, image_url, media_ref, media_folder, parent_page, created_at, updated_at";

/// Postgres-backed category repository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "categories", db.operation = "insert"))]
    async fn insert(&self, new: NewCategory) -> Result<Category, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(&format!(
            r#"
            INSERT INTO categories (id, name, slug, image_url, media_ref, media_folder, parent_page)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.image_url)
        .bind(&new.media_ref)
        .bind(&new.media_folder)
        .bind(&new.parent_page)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Category with this name already exists"))?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<Postgres, Category>(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "categories", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, AppError> {
        let category = sqlx::query_as::<Postgres, Category>(&format!(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                image_url = COALESCE($4, image_url),
                media_ref = COALESCE($5, media_ref),
                parent_page = COALESCE($6, parent_page),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.slug)
        .bind(patch.image_url)
        .bind(patch.media_ref)
        .bind(patch.parent_page)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Category with this name already exists"))?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
