//! HTTP error response conversion.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; `AppError`
//! values convert via `?` and render in the uniform
//! `{success: false, message}` envelope with the status code the error's
//! metadata dictates.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bazaar_core::{AppError, ErrorMetadata, LogLevel};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

/// Error body in the uniform envelope shape.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Wrapper type for AppError to implement IntoResponse. Necessary because of
/// Rust's orphan rules: IntoResponse is external and AppError lives in
/// bazaar-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body deserialization failures into a 400 in the envelope
/// shape instead of axum's plain-text default.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that renders deserialization failures in the envelope
/// shape. Use instead of `Json<T>` in handlers.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error.detailed_message(), error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error.detailed_message(), error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Sensitive details stay in the logs; the client sees the metadata's
        // client-safe message.
        let body = Json(ErrorResponse {
            success: false,
            message: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = HttpAppError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_renders_404_envelope() {
        let (status, body) = render(AppError::NotFound("Product not found".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_conflict_renders_400() {
        let (status, body) =
            render(AppError::Conflict("Category with this name already exists".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Category with this name already exists");
    }

    #[tokio::test]
    async fn test_media_store_error_hides_details() {
        let (status, body) =
            render(AppError::MediaStore("signature mismatch at gateway".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to access media store");
    }
}
