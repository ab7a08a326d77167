//! Bazaar Database Library
//!
//! Repository traits for each entity kind plus their Postgres (sqlx)
//! implementations. The lifecycle services depend only on the traits, so
//! tests substitute in-memory fakes at the same seam.

pub mod db;

pub use db::category::{CategoryStore, PgCategoryRepository};
pub use db::product::{PgProductRepository, ProductStore};
pub use db::promo::{PgPromoRepository, PromoStore};
pub use db::review::{PgReviewRepository, ReviewStore};
pub use db::{connect, run_migrations};
