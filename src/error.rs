//! Error types for the event service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

// == App Error Enum ==
/// Unified error type for the repository, cache and HTTP layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistent store failed for a reason other than a missing record
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn event_not_found(id: u64) -> Self {
        AppError::NotFound(format!("event {} not found", id))
    }

    pub fn category_not_found(id: u64) -> Self {
        AppError::NotFound(format!("category {} not found", id))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Storage unavailable"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid input data"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(ApiResponse::<()>::failure(message, Some(self.to_string())));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the event service.
pub type Result<T> = std::result::Result<T, AppError>;
