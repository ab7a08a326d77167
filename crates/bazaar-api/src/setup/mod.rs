//! Application bootstrap: configuration, database, media store, services,
//! routes.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use bazaar_core::Config;
use bazaar_db::{
    PgCategoryRepository, PgProductRepository, PgPromoRepository, PgReviewRepository,
};
use bazaar_services::{
    CategoryService, ProductService, PromoService, ReconcileService, ReviewService,
};
use bazaar_storage::create_media_store;

use crate::state::AppState;

/// Initialize the entire application.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!(
        environment = %config.environment(),
        media_backend = ?config.media_backend(),
        "Configuration loaded and validated"
    );

    let pool = bazaar_db::connect(&config)
        .await
        .context("Failed to connect to database")?;
    bazaar_db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let media = create_media_store(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize media store: {}", e))?;

    let categories = Arc::new(PgCategoryRepository::new(pool.clone()));
    let products = Arc::new(PgProductRepository::new(pool.clone()));
    let reviews = Arc::new(PgReviewRepository::new(pool.clone()));
    let promos = Arc::new(PgPromoRepository::new(pool.clone()));

    let concurrency = config.upload_concurrency();
    let product_service = ProductService::new(
        products.clone(),
        categories.clone(),
        reviews.clone(),
        media.clone(),
        concurrency,
    );
    let state = Arc::new(AppState {
        categories: CategoryService::new(
            categories.clone(),
            products.clone(),
            media.clone(),
            product_service.clone(),
        ),
        reviews: ReviewService::new(
            reviews.clone(),
            products.clone(),
            categories.clone(),
            media.clone(),
            concurrency,
        ),
        promos: PromoService::new(promos, media.clone()),
        reconcile: ReconcileService::new(categories, products, reviews, media),
        products: product_service,
        config,
        pool,
    });

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
