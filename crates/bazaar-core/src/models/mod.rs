//! Domain models and request/response DTOs.

pub mod category;
pub mod media;
pub mod product;
pub mod promo;
pub mod response;
pub mod review;

pub use category::{Category, CategoryPatch, CreateCategoryRequest, NewCategory, UpdateCategoryRequest};
pub use media::{MediaKind, MediaPayload};
pub use product::{
    CreateProductRequest, NewProduct, Product, ProductPatch, StockStatus, UpdateProductRequest,
    VariantType, Variants,
};
pub use promo::{
    CreatePromoRequest, NewPromoItem, PromoItem, PromoKind, PromoPatch, UpdatePromoRequest,
};
pub use response::{ApiResponse, CategoryDeletionReport, DeletionReport};
pub use review::{CreateReviewRequest, NewReview, Review};
