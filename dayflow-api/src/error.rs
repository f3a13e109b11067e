//! Error types for dayflow-api
//!
//! Every failure leaves the service as the same JSON envelope:
//! `{"success": false, "error": {"code", "message", "details"?}}`.
//! Upstream failures are logged with their detail and reported to the
//! client with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;
use thiserror::Error;

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Include internal error detail in 500 responses (development only)
///
/// Only the first call has an effect.
pub fn set_expose_details(expose: bool) {
    let _ = EXPOSE_DETAILS.set(expose);
}

fn expose_details() -> bool {
    EXPOSE_DETAILS.get().copied().unwrap_or(false)
}

/// One invalid request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or invalid fields (400)
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// Missing, invalid or expired bearer token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found or not owned by the caller (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Optional provider not configured (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Storage, auth or inference provider failed (500)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Single-field validation error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message, details): (&str, String, Option<Value>) = match self {
            ApiError::Validation(fields) => (
                "VALIDATION_ERROR",
                "Request validation failed".to_string(),
                Some(json!(fields)),
            ),
            ApiError::Unauthorized(msg) => ("UNAUTHORIZED", msg, None),
            ApiError::NotFound(msg) => ("NOT_FOUND", msg, None),
            ApiError::ServiceUnavailable(msg) => ("SERVICE_UNAVAILABLE", msg, None),
            err => {
                tracing::error!("Request failed: {}", err);
                let details = expose_details().then(|| json!(err.to_string()));
                ("INTERNAL_ERROR", "Internal server error".to_string(), details)
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "success": false, "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
