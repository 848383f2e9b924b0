//! Translation of domain failures into HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Decode a path segment as a base-10 record id. Only ASCII digits are accepted.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidId(raw.to_string()));
    }
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            ApiError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id", None),
            ApiError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "invalid_body", None),
            ApiError::Domain(DomainError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(e.field().to_string()),
            ),
            ApiError::Domain(DomainError::DonorNotFound(_)) => (StatusCode::NOT_FOUND, "donor_not_found", None),
            ApiError::Domain(DomainError::DonationNotFound(_)) => {
                (StatusCode::NOT_FOUND, "donation_not_found", None)
            }
            ApiError::Domain(DomainError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, field) = self.parts();

        let message = match &self {
            ApiError::Domain(DomainError::Storage(e)) => {
                error!("Storage failure: {:#}", e);
                "Internal server error".to_string()
            }
            ApiError::Domain(DomainError::DonorNotFound(_)) => "Donor not found".to_string(),
            ApiError::Domain(DomainError::DonationNotFound(_)) => "Donation not found".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            field,
        };
        (status, Json(body)).into_response()
    }
}
