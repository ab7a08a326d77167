//! Route configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use bazaar_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

// Inline base64 payloads inflate request bodies by ~4/3; leave headroom.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(config)?;

    let api = Router::new()
        .route(
            "/categories",
            post(handlers::categories::create_category).get(handlers::categories::list_categories),
        )
        .route(
            "/categories/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/products",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/products/{id}/reviews",
            get(handlers::reviews::list_product_reviews),
        )
        .route(
            "/products/{id}/review-stats",
            get(handlers::reviews::get_review_stats),
        )
        .route("/reviews", post(handlers::reviews::create_review))
        .route(
            "/reviews/{id}",
            get(handlers::reviews::get_review).delete(handlers::reviews::delete_review),
        )
        .route(
            "/promos",
            post(handlers::promos::create_promo).get(handlers::promos::list_promos),
        )
        .route(
            "/promos/{id}",
            get(handlers::promos::get_promo)
                .put(handlers::promos::update_promo)
                .delete(handlers::promos::delete_promo),
        )
        .route("/admin/reconcile", post(handlers::admin::run_reconcile));

    let router = Router::new()
        .route("/health", get(handlers::admin::health))
        .nest("/api/v0", api)
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let origins = config.cors_origins();
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let parsed = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(methods)
        .allow_headers(Any))
}
