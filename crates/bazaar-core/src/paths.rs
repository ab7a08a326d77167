//! Shared slug and media-folder derivation.
//!
//! Folder paths are the unit of bulk deletion in the media store, so they
//! must be reproducible from data stored on the entity itself (slugs), never
//! from anything request-scoped. Entities freeze their folder at creation
//! time (`media_folder` column); these helpers produce that initial value
//! and let the reconcile sweep re-derive paths for comparison.
//!
//! Layout:
//! - category images:  `categories`
//! - category subtree: `products/{category-slug}`
//! - product media:    `products/{category-slug}/products/{product-slug}`
//! - review media:     `reviews/{category-slug}/{product-slug}`
//! - promo media:      `promos/{kind-slug}`

/// Normalize a human-readable name into a slug.
///
/// Lowercases and replaces every character outside `[a-z0-9]` with `-`.
/// Not collision-free; uniqueness is enforced by the repositories.
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Folder holding category header images.
pub fn category_image_folder() -> String {
    "categories".to_string()
}

/// Folder prefix covering everything under a category (its products' media).
pub fn category_folder(category_slug: &str) -> String {
    format!("products/{}", category_slug)
}

/// Folder holding a single product's media.
pub fn product_folder(category_slug: &str, product_slug: &str) -> String {
    format!("products/{}/products/{}", category_slug, product_slug)
}

/// Folder holding the media of all reviews of a product.
pub fn review_folder(category_slug: &str, product_slug: &str) -> String {
    format!("reviews/{}/{}", category_slug, product_slug)
}

/// Folder holding promotional media for one promo kind.
pub fn promo_folder(kind_slug: &str) -> String {
    format!("promos/{}", kind_slug)
}
