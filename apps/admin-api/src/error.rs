//! # API Error Types
//!
//! Every handler failure funnels through [`ApiError`], which maps onto the
//! wire taxonomy:
//!
//! ```text
//! ValidationError / bad multipart   → 400  {success:false, error}
//! StoreError::NotFound              → 404  {success:false, error, code}
//! everything else                   → 500  {success:false, error, code?}
//! ```
//!
//! Nothing is retried; failures are logged at the handler boundary and
//! surfaced directly to the caller.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use souk_core::error::{CoreError, ValidationError};
use souk_db::StoreError;

use crate::response::ApiResponse;

/// Admin API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request input failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Domain rule violation (e.g. illegal status transition).
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Storage failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Malformed multipart payload.
    #[error("Malformed multipart request: {0}")]
    Multipart(#[from] MultipartError),

    /// Malformed request body outside the typed extractors.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Multipart(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Core(CoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::InvalidStatusTransition { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Store(err) => Some(err.code()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        } else {
            tracing::debug!(error = %message, status = %status, "Request rejected");
        }

        let body = Json(ApiResponse::err(message, self.code()));
        (status, body).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::Validation(ValidationError::Required {
            field: "name".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::Store(StoreError::not_found("Category", "c1"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), Some("not_found"));

        let err = ApiError::Store(StoreError::QueryFailed("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
