//! HTTP handlers. Thin: decode, call the service, wrap in the envelope.

pub mod admin;
pub mod categories;
pub mod products;
pub mod promos;
pub mod reviews;

use base64::Engine;
use bazaar_core::models::MediaPayload;
use bazaar_core::AppError;
use bazaar_services::MediaUpload;
use bytes::Bytes;

/// Decode an inline base64 media payload into raw bytes for the services.
pub(crate) fn decode_payload(payload: MediaPayload) -> Result<MediaUpload, AppError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.data.as_bytes())
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 media data: {}", e)))?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("Media data is empty".to_string()));
    }
    Ok(MediaUpload {
        filename: payload.filename,
        data: Bytes::from(data),
    })
}

pub(crate) fn decode_payloads(payloads: Vec<MediaPayload>) -> Result<Vec<MediaUpload>, AppError> {
    payloads.into_iter().map(decode_payload).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payload() {
        let upload = decode_payload(MediaPayload {
            filename: "a.jpg".to_string(),
            data: "aGVsbG8=".to_string(),
        })
        .unwrap();
        assert_eq!(upload.filename, "a.jpg");
        assert_eq!(&upload.data[..], b"hello");
    }

    #[test]
    fn test_decode_payload_rejects_bad_base64() {
        let err = decode_payload(MediaPayload {
            filename: "a.jpg".to_string(),
            data: "not base64!!".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
