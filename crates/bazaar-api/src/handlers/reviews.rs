use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bazaar_core::models::{ApiResponse, CreateReviewRequest, Review};
use bazaar_core::{AppError, ReviewStats};
use bazaar_services::ReviewInput;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

use super::decode_payloads;

#[utoipa::path(
    post,
    path = "/api/v0/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let images = decode_payloads(req.images)?;
    let review = state
        .reviews
        .create(ReviewInput {
            product_id: req.product_id,
            reviewer_name: req.reviewer_name,
            rating: req.rating,
            comment: req.comment,
            images,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(review))))
}

#[utoipa::path(
    get,
    path = "/api/v0/reviews/{id}",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let review = state.reviews.get(id).await?;
    Ok(Json(ApiResponse::data(review)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/reviews/{id}",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media_deleted = state.reviews.delete(id).await?;
    let message = if media_deleted {
        "Review deleted"
    } else {
        "Review deleted; some media artifacts could not be removed"
    };
    Ok(Json(ApiResponse::<()>::message(message)))
}

#[utoipa::path(
    get,
    path = "/api/v0/products/{id}/reviews",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews of the product, newest first", body = [Review]),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn list_product_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let reviews = state.reviews.list_by_product(id).await?;
    let count = reviews.len();
    Ok(Json(ApiResponse::list(reviews, count)))
}

#[utoipa::path(
    get,
    path = "/api/v0/products/{id}/review-stats",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Aggregated rating statistics", body = ReviewStats),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_review_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stats = state.reviews.stats(id).await?;
    Ok(Json(ApiResponse::data(stats)))
}
