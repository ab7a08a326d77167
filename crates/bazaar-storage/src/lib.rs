//! Bazaar Storage Library
//!
//! Media Gateway abstraction and implementations. The gateway stores every
//! artifact under a folder path (`products/{category-slug}/products/{slug}`
//! and friends, see `bazaar_core::paths`); that folder is the unit of bulk
//! deletion, so backends must support prefix deletes in addition to per-ref
//! deletes.
//!
//! The remote store has no transactions and no cross-record atomicity. The
//! lifecycle services compensate with media-first ordering on create and
//! best-effort cleanup on delete; the gateway's job is only to make each
//! individual operation idempotent (deleting a missing ref is not an error).

pub mod cdn;
pub mod factory;
pub mod local;
pub mod traits;

pub use cdn::CdnMediaStore;
pub use factory::create_media_store;
pub use local::LocalMediaStore;
pub use traits::{MediaResult, MediaStore, MediaStoreError, UploadedMedia};
