//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::retrieval::RetrievalError;
use crate::store::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Retrieval engine error
    #[error("{0}")]
    Retrieval(#[from] RetrievalError),

    /// Store client could not be built
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Retrieval exceeded the request deadline
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Retrieval(e) => match e {
                RetrievalError::MalformedQuery(_) => (StatusCode::BAD_REQUEST, "MALFORMED_QUERY"),
                RetrievalError::MalformedRange(_) => (StatusCode::BAD_REQUEST, "MALFORMED_RANGE"),
                RetrievalError::UnknownRangeUnit(_) => {
                    (StatusCode::BAD_REQUEST, "UNKNOWN_RANGE_UNIT")
                }
                RetrievalError::InvalidBudget => (StatusCode::BAD_REQUEST, "INVALID_BUDGET"),
                RetrievalError::InvalidKey { .. } => (StatusCode::BAD_REQUEST, "INVALID_KEY"),
                RetrievalError::ObjectNotFound(_) => (StatusCode::NOT_FOUND, "OBJECT_NOT_FOUND"),
                RetrievalError::NoDataFound => (StatusCode::NOT_FOUND, "NO_DATA_FOUND"),
                RetrievalError::ObjectDecode { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "OBJECT_DECODE_ERROR")
                }
                RetrievalError::Store(_) => (StatusCode::BAD_GATEWAY, "STORE_ERROR"),
            },
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_CONFIG_ERROR"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        // Log the error
        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_status_mapping() {
        let cases = [
            (RetrievalError::MalformedQuery("x".into()), StatusCode::BAD_REQUEST),
            (RetrievalError::MalformedRange("abcd".into()), StatusCode::BAD_REQUEST),
            (RetrievalError::UnknownRangeUnit("x".into()), StatusCode::BAD_REQUEST),
            (RetrievalError::InvalidBudget, StatusCode::BAD_REQUEST),
            (RetrievalError::ObjectNotFound("k".into()), StatusCode::NOT_FOUND),
            (RetrievalError::NoDataFound, StatusCode::NOT_FOUND),
            (
                RetrievalError::ObjectDecode {
                    key: "k".into(),
                    reason: "bad".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_and_code().0, status);
        }
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let (status, code) = ApiError::Timeout(30).status_and_code();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(code, "TIMEOUT");
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::Retrieval(RetrievalError::NoDataFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
