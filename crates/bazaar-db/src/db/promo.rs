use async_trait::async_trait;
use bazaar_core::models::{NewPromoItem, PromoItem, PromoKind, PromoPatch};
use bazaar_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence operations for promotional items (all four kinds share one
/// table, discriminated by `kind`).
#[async_trait]
pub trait PromoStore: Send + Sync {
    async fn insert(&self, new: NewPromoItem) -> Result<PromoItem, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PromoItem>, AppError>;
    /// Items of one kind, newest first.
    async fn list_by_kind(&self, kind: PromoKind) -> Result<Vec<PromoItem>, AppError>;
    async fn update(&self, id: Uuid, patch: PromoPatch) -> Result<PromoItem, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const COLUMNS: &str = "id, kind, title, subtitle, description, redirect_url, button_text, \
     price, old_price, media_kind, media_url, media_ref, thumbnail_url, media_folder, \
     created_at, updated_at";

/// Postgres-backed promo repository.
#[derive(Clone)]
pub struct PgPromoRepository {
    pool: PgPool,
}

impl PgPromoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromoStore for PgPromoRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "promo_items", db.operation = "insert"))]
    async fn insert(&self, new: NewPromoItem) -> Result<PromoItem, AppError> {
        let item = sqlx::query_as::<Postgres, PromoItem>(&format!(
            r#"
            INSERT INTO promo_items
                (id, kind, title, subtitle, description, redirect_url, button_text,
                 price, old_price, media_kind, media_url, media_ref, thumbnail_url, media_folder)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.kind)
        .bind(&new.title)
        .bind(&new.subtitle)
        .bind(&new.description)
        .bind(&new.redirect_url)
        .bind(&new.button_text)
        .bind(new.price)
        .bind(new.old_price)
        .bind(new.media_kind)
        .bind(&new.media_url)
        .bind(&new.media_ref)
        .bind(&new.thumbnail_url)
        .bind(&new.media_folder)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    #[tracing::instrument(skip(self), fields(db.table = "promo_items", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PromoItem>, AppError> {
        let item = sqlx::query_as::<Postgres, PromoItem>(&format!(
            "SELECT {COLUMNS} FROM promo_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    #[tracing::instrument(skip(self), fields(db.table = "promo_items", db.operation = "select"))]
    async fn list_by_kind(&self, kind: PromoKind) -> Result<Vec<PromoItem>, AppError> {
        let items = sqlx::query_as::<Postgres, PromoItem>(&format!(
            "SELECT {COLUMNS} FROM promo_items WHERE kind = $1 ORDER BY created_at DESC"
        ))
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "promo_items", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: PromoPatch) -> Result<PromoItem, AppError> {
        let price_set = patch.price.is_some();
        let price = patch.price.flatten();
        let old_price_set = patch.old_price.is_some();
        let old_price = patch.old_price.flatten();
        let thumbnail_set = patch.thumbnail_url.is_some();
        let thumbnail_url = patch.thumbnail_url.flatten();

        let item = sqlx::query_as::<Postgres, PromoItem>(&format!(
            r#"
            UPDATE promo_items SET
                title = COALESCE($2, title),
                subtitle = COALESCE($3, subtitle),
                description = COALESCE($4, description),
                redirect_url = COALESCE($5, redirect_url),
                button_text = COALESCE($6, button_text),
                price = CASE WHEN $7 THEN $8 ELSE price END,
                old_price = CASE WHEN $9 THEN $10 ELSE old_price END,
                media_kind = COALESCE($11, media_kind),
                media_url = COALESCE($12, media_url),
                media_ref = COALESCE($13, media_ref),
                thumbnail_url = CASE WHEN $14 THEN $15 ELSE thumbnail_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.subtitle)
        .bind(patch.description)
        .bind(patch.redirect_url)
        .bind(patch.button_text)
        .bind(price_set)
        .bind(price)
        .bind(old_price_set)
        .bind(old_price)
        .bind(patch.media_kind)
        .bind(patch.media_url)
        .bind(patch.media_ref)
        .bind(thumbnail_set)
        .bind(thumbnail_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Promo item not found".to_string()))?;

        Ok(item)
    }

    #[tracing::instrument(skip(self), fields(db.table = "promo_items", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM promo_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
