use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bazaar_core::models::{
    ApiResponse, Category, CategoryDeletionReport, CreateCategoryRequest, UpdateCategoryRequest,
};
use bazaar_core::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

use super::decode_payload;

#[utoipa::path(
    post,
    path = "/api/v0/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation failure or duplicate name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let image = decode_payload(req.image)?;
    let category = state
        .categories
        .create(req.name, req.parent_page, image)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(category))))
}

#[utoipa::path(
    get,
    path = "/api/v0/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories, newest first", body = [Category])
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = state.categories.list().await?;
    let count = categories.len();
    Ok(Json(ApiResponse::list(categories, count)))
}

#[utoipa::path(
    get,
    path = "/api/v0/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = state.categories.get(id).await?;
    Ok(Json(ApiResponse::data(category)))
}

#[utoipa::path(
    put,
    path = "/api/v0/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation failure or duplicate name", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let image = req.image.map(decode_payload).transpose()?;
    let category = state
        .categories
        .update(id, req.name, req.parent_page, image)
        .await?;
    Ok(Json(ApiResponse::data(category)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted; report lists any remnants", body = CategoryDeletionReport),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Record deletion failed", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state.categories.delete(id).await?;
    Ok(Json(ApiResponse::data(report)))
}
