//! Error types module
//!
//! All errors are unified under the `AppError` enum which can represent
//! database, media-store, validation, and other domain-specific errors.
//!
//! The split between `InvalidInput`, `Conflict`, and `NotFound` matters for
//! the lifecycle services: a `Conflict` on the uniqueness pre-check means no
//! media was uploaded yet, while a `MediaStore` error during a cascade is
//! recorded in the deletion report instead of aborting the operation.

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Media store error: {0}")]
    MediaStore(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::MediaStore(_) => (500, "MEDIA_STORE_ERROR", true, LogLevel::Error),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        // Uniqueness conflicts render as 400, matching the public API contract
        AppError::Conflict(_) => (400, "CONFLICT", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::MediaStore(_) => "MediaStore",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Conflict(_) => "Conflict",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::MediaStore(_) => "Failed to access media store".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
