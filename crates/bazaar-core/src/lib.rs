//! Bazaar Core Library
//!
//! This crate provides the domain models, error types, configuration, path
//! derivation, and review statistics shared across all bazaar components.

pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use stats::ReviewStats;
