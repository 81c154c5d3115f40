//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and produces
//! the same envelope as a successful search, with `success: false`, a
//! machine-readable `code` and an empty `data` list.

use crate::api::models::SearchResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Application-level error type that implements `IntoResponse`.
///
/// - `InvalidQuery` → 400 `INVALID_QUERY`
/// - `ServiceUnavailable` → 503 `SERVICE_UNAVAILABLE`
/// - `Internal` → 500 `INTERNAL_ERROR`
#[derive(Debug)]
pub enum ApiError {
    /// Empty, blank or oversized query (400).
    InvalidQuery(String),
    /// The strategy's artifacts were not loaded (503).
    ServiceUnavailable(String),
    /// Unexpected failure while serving the request (500).
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidQuery(_) => "INVALID_QUERY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// A body that is not valid JSON or lacks `query` is a bad query, reported in
/// the usual envelope rather than axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidQuery(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::InvalidQuery(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        };
        (status, Json(SearchResponse::failure(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code() {
        let err = ApiError::ServiceUnavailable("down".into());
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "SERVICE_UNAVAILABLE");
        let resp = ApiError::InvalidQuery("empty".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
