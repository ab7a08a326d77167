use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bazaar_core::models::{
    ApiResponse, CreateProductRequest, DeletionReport, Product, UpdateProductRequest,
};
use bazaar_core::AppError;
use bazaar_services::{ProductInput, ProductUpdate};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

use super::decode_payloads;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ProductListQuery {
    /// Restrict to one category.
    pub category_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/v0/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation failure or duplicate title", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Upload or insert failure", body = ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let images = decode_payloads(req.images)?;
    let product = state
        .products
        .create(ProductInput {
            title: req.title,
            description: req.description,
            price: req.price,
            old_price: req.old_price,
            category_id: req.category_id,
            parent_page: req.parent_page,
            tags: req.tags,
            stock_status: req.stock_status,
            is_active: req.is_active,
            variants: req.variants,
            images,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(product))))
}

#[utoipa::path(
    get,
    path = "/api/v0/products",
    tag = "products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products, newest first", body = [Product])
    )
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let products = match query.category_id {
        Some(category_id) => state.products.list_by_category(category_id).await?,
        None => state.products.list().await?,
    };
    let count = products.len();
    Ok(Json(ApiResponse::list(products, count)))
}

#[utoipa::path(
    get,
    path = "/api/v0/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let product = state.products.get(id).await?;
    Ok(Json(ApiResponse::data(product)))
}

#[utoipa::path(
    put,
    path = "/api/v0/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation failure or duplicate title", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let images = req.images.map(decode_payloads).transpose()?;
    let product = state
        .products
        .update(
            id,
            ProductUpdate {
                title: req.title,
                description: req.description,
                price: req.price,
                old_price: req.old_price,
                category_id: req.category_id,
                parent_page: req.parent_page,
                tags: req.tags,
                stock_status: req.stock_status,
                is_active: req.is_active,
                variants: req.variants,
                images,
            },
        )
        .await?;
    Ok(Json(ApiResponse::data(product)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted; report lists any remnants", body = DeletionReport),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Record deletion failed", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state.products.delete(id).await?;
    Ok(Json(ApiResponse::data(report)))
}
