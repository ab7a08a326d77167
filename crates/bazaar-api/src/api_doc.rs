//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use bazaar_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bazaar API",
        version = "0.1.0",
        description = "Catalog management API: categories, products, reviews, and promotional surfaces, with media artifacts stored in a remote media store. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Categories
        handlers::categories::create_category,
        handlers::categories::list_categories,
        handlers::categories::get_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        // Products
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        // Reviews
        handlers::reviews::create_review,
        handlers::reviews::get_review,
        handlers::reviews::delete_review,
        handlers::reviews::list_product_reviews,
        handlers::reviews::get_review_stats,
        // Promos
        handlers::promos::create_promo,
        handlers::promos::list_promos,
        handlers::promos::get_promo,
        handlers::promos::update_promo,
        handlers::promos::delete_promo,
        // Admin
        handlers::admin::run_reconcile,
    ),
    components(schemas(
        models::Category,
        models::CreateCategoryRequest,
        models::UpdateCategoryRequest,
        models::Product,
        models::CreateProductRequest,
        models::UpdateProductRequest,
        models::StockStatus,
        models::VariantType,
        models::Variants,
        models::Review,
        models::CreateReviewRequest,
        models::PromoItem,
        models::PromoKind,
        models::CreatePromoRequest,
        models::UpdatePromoRequest,
        models::MediaKind,
        models::MediaPayload,
        models::DeletionReport,
        models::CategoryDeletionReport,
        bazaar_core::stats::ReviewStats,
        bazaar_core::stats::RatingBucket,
        handlers::admin::ReconcileResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "categories", description = "Catalog categories"),
        (name = "products", description = "Catalog products"),
        (name = "reviews", description = "Product reviews and rating statistics"),
        (name = "promos", description = "Promotional surfaces"),
        (name = "admin", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;
