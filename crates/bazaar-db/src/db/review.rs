use async_trait::async_trait;
use bazaar_core::models::{NewReview, Review};
use bazaar_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence operations for reviews.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, new: NewReview) -> Result<Review, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError>;
    /// Reviews of one product, newest first.
    async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<Review>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    /// Bulk-delete all reviews of one product; returns the number removed.
    async fn delete_many_by_product(&self, product_id: Uuid) -> Result<u64, AppError>;
}

const COLUMNS: &str = "id, product_id, reviewer_name, rating, comment, images, media_refs, \
     media_folder, created_at";

/// Postgres-backed review repository.
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "reviews", db.operation = "insert"))]
    async fn insert(&self, new: NewReview) -> Result<Review, AppError> {
        let review = sqlx::query_as::<Postgres, Review>(&format!(
            r#"
            INSERT INTO reviews
                (id, product_id, reviewer_name, rating, comment, images, media_refs, media_folder)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.product_id)
        .bind(&new.reviewer_name)
        .bind(new.rating)
        .bind(&new.comment)
        .bind(&new.images)
        .bind(&new.media_refs)
        .bind(&new.media_folder)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    #[tracing::instrument(skip(self), fields(db.table = "reviews", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<Postgres, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    #[tracing::instrument(skip(self), fields(db.table = "reviews", db.operation = "select"))]
    async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<Postgres, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY created_at DESC"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    #[tracing::instrument(skip(self), fields(db.table = "reviews", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "reviews", db.operation = "delete"))]
    async fn delete_many_by_product(&self, product_id: Uuid) -> Result<u64, AppError> {
        let rows_affected = sqlx::query("DELETE FROM reviews WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
