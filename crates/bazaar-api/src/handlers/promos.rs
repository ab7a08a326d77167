use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bazaar_core::models::{
    ApiResponse, CreatePromoRequest, PromoItem, PromoKind, UpdatePromoRequest,
};
use bazaar_core::AppError;
use bazaar_services::{PromoInput, PromoUpdate};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

use super::decode_payload;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PromoListQuery {
    /// Promotional surface to list.
    pub kind: PromoKind,
}

#[utoipa::path(
    post,
    path = "/api/v0/promos",
    tag = "promos",
    request_body = CreatePromoRequest,
    responses(
        (status = 201, description = "Promo item created", body = PromoItem),
        (status = 400, description = "Validation failure or video on a non-video kind", body = ErrorResponse),
        (status = 500, description = "Upload or insert failure", body = ErrorResponse)
    )
)]
pub async fn create_promo(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreatePromoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let media = decode_payload(req.media)?;
    let item = state
        .promos
        .create(PromoInput {
            kind: req.kind,
            title: req.title,
            subtitle: req.subtitle,
            description: req.description,
            redirect_url: req.redirect_url,
            button_text: req.button_text,
            price: req.price,
            old_price: req.old_price,
            media_kind: req.media_kind,
            media,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(item))))
}

#[utoipa::path(
    get,
    path = "/api/v0/promos",
    tag = "promos",
    params(PromoListQuery),
    responses(
        (status = 200, description = "Promo items of one kind, newest first", body = [PromoItem])
    )
)]
pub async fn list_promos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PromoListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let items = state.promos.list(query.kind).await?;
    let count = items.len();
    Ok(Json(ApiResponse::list(items, count)))
}

#[utoipa::path(
    get,
    path = "/api/v0/promos/{id}",
    tag = "promos",
    params(("id" = Uuid, Path, description = "Promo item ID")),
    responses(
        (status = 200, description = "Promo item found", body = PromoItem),
        (status = 404, description = "Promo item not found", body = ErrorResponse)
    )
)]
pub async fn get_promo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let item = state.promos.get(id).await?;
    Ok(Json(ApiResponse::data(item)))
}

#[utoipa::path(
    put,
    path = "/api/v0/promos/{id}",
    tag = "promos",
    params(("id" = Uuid, Path, description = "Promo item ID")),
    request_body = UpdatePromoRequest,
    responses(
        (status = 200, description = "Promo item updated", body = PromoItem),
        (status = 400, description = "Validation failure or video on a non-video kind", body = ErrorResponse),
        (status = 404, description = "Promo item not found", body = ErrorResponse)
    )
)]
pub async fn update_promo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePromoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    req.validate().map_err(AppError::from)?;
    let media = req.media.map(decode_payload).transpose()?;
    let item = state
        .promos
        .update(
            id,
            PromoUpdate {
                title: req.title,
                subtitle: req.subtitle,
                description: req.description,
                redirect_url: req.redirect_url,
                button_text: req.button_text,
                price: req.price,
                old_price: req.old_price,
                media_kind: req.media_kind,
                media,
            },
        )
        .await?;
    Ok(Json(ApiResponse::data(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/promos/{id}",
    tag = "promos",
    params(("id" = Uuid, Path, description = "Promo item ID")),
    responses(
        (status = 200, description = "Promo item deleted"),
        (status = 404, description = "Promo item not found", body = ErrorResponse)
    )
)]
pub async fn delete_promo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media_deleted = state.promos.delete(id).await?;
    let message = if media_deleted {
        "Promo item deleted"
    } else {
        "Promo item deleted; its media artifact could not be removed"
    };
    Ok(Json(ApiResponse::<()>::message(message)))
}
