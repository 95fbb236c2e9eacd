//! # REST API Errors
//!
//! Error types for the card endpoints and their mapping to HTTP status
//! codes and JSON error bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::service::ServiceError;
use crate::store::StoreErrorCode;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    /// Invalid request body
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Lookup returned nothing
    #[error("Resource not found")]
    NotFound,

    // ==================
    // Service Errors
    // ==================
    /// Validation, lookup or storage failure from the card service
    #[error("{0}")]
    Service(#[from] ServiceError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Worker task failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::MissingParam(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            RestError::NotFound => StatusCode::NOT_FOUND,

            RestError::Service(err) => match err {
                ServiceError::MissingOwner => StatusCode::BAD_REQUEST,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Store(store_err) => match store_err.code() {
                    StoreErrorCode::DuplicateKey | StoreErrorCode::Conflict => {
                        StatusCode::CONFLICT
                    }
                    StoreErrorCode::Io | StoreErrorCode::Corruption => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                },
            },

            // 500 Internal Server Error
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RestError::InvalidQueryParam(_) => "REST_INVALID_QUERY_PARAM",
            RestError::MissingParam(_) => "REST_MISSING_PARAM",
            RestError::InvalidBody(_) => "REST_INVALID_BODY",
            RestError::NotFound => "REST_NOT_FOUND",
            RestError::Service(err) => err.code(),
            RestError::Internal(_) => "REST_INTERNAL_ERROR",
        }
    }

    /// Offending card field, for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            RestError::Service(ServiceError::Validation(err)) => Some(err.field()),
            _ => None,
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::InvalidBody(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            kind: err.kind(),
            field: err.field().map(str::to_string),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
