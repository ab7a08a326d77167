//! Application state shared by all handlers.

use bazaar_core::Config;
use bazaar_services::{
    CategoryService, ProductService, PromoService, ReconcileService, ReviewService,
};
use sqlx::PgPool;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub categories: CategoryService,
    pub products: ProductService,
    pub reviews: ReviewService,
    pub promos: PromoService,
    pub reconcile: ReconcileService,
}
