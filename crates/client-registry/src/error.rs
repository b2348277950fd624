//! Error types for the registration service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Registration pipeline errors.
///
/// Every variant carries the raw, unnormalized input so that error
/// responses name exactly what the caller sent.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Phone number {0:?} could not be parsed")]
    Unparseable(String),

    #[error("Phone number {number:?} does not belong to the {region} numbering plan")]
    WrongRegion { number: String, region: String },

    #[error("Phone number {0:?} is not a valid number")]
    InvalidNumber(String),

    #[error("Client with phone number {0:?} already exists")]
    DuplicateClient(String),

    #[error("Failed to store client with phone number {0:?}")]
    Persistence(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RegistrationError::Unparseable(_) => (StatusCode::BAD_REQUEST, "UNPARSEABLE_NUMBER"),
            RegistrationError::WrongRegion { .. } => (StatusCode::BAD_REQUEST, "WRONG_REGION"),
            RegistrationError::InvalidNumber(_) => (StatusCode::BAD_REQUEST, "INVALID_NUMBER"),
            RegistrationError::DuplicateClient(_) => (StatusCode::CONFLICT, "ALREADY_REGISTERED"),
            RegistrationError::Persistence(_) => (StatusCode::BAD_REQUEST, "STORAGE_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
