//! Error types for the order cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures surfaced by the cache service and its stores.
///
/// A cache miss is never an error; reads report misses as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The underlying store could not be reached or rejected the command
    #[error("Store error: {0}")]
    Store(String),

    /// A value could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Expiration options that resolve to a time not in the future
    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    /// The cache-aside factory failed
    #[error("Factory error: {0}")]
    Factory(#[source] anyhow::Error),

    /// The operation was cancelled before the store answered
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Store(err.to_string())
    }
}

/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == API Error Enum ==
/// Errors returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No cached order for the requested id
    #[error("Order not found")]
    OrderNotFound,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache failure bubbling up from the service
    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::OrderNotFound => StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Cache(CacheError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_bad_request() {
        let response = ApiError::OrderNotFound.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cancelled_is_service_unavailable() {
        let response = ApiError::from(CacheError::Cancelled).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_store_error_is_internal() {
        let response = ApiError::from(CacheError::Store("connection refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_order_not_found_message() {
        assert_eq!(ApiError::OrderNotFound.to_string(), "Order not found");
    }
}
