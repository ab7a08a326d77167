//! Lifecycle services coordinating the repositories and the media store.
//!
//! Each entity kind gets one service that owns its create / update / delete
//! protocol. Creates upload media before inserting the record; deletes remove
//! the record even when media cleanup fails, reporting what was actually
//! cleaned. Handlers stay thin and everything here is unit-testable without
//! HTTP, Postgres, or a network.

pub mod category;
pub mod media;
pub mod product;
pub mod promo;
pub mod reconcile;
pub mod review;

#[cfg(test)]
pub(crate) mod test_support;

pub use category::CategoryService;
pub use media::MediaUpload;
pub use product::{ProductInput, ProductService, ProductUpdate};
pub use promo::{PromoInput, PromoService, PromoUpdate};
pub use reconcile::{ReconcileReport, ReconcileService};
pub use review::{ReviewInput, ReviewService};
