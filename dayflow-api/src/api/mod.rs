//! HTTP API handlers for dayflow-api
//!
//! Everything is served under `/api`. Successful responses use the
//! `{"success": true, "data": ...}` envelope; failures go through
//! [`ApiError`](crate::error::ApiError).

pub mod analytics;
pub mod auth;
pub mod events;
pub mod extract;
pub mod health;
pub mod insights;
pub mod schedule;
pub mod validation;

pub use analytics::analytics_routes;
pub use auth::auth_middleware;
pub use events::event_routes;
pub use health::health_routes;
pub use insights::insights_routes;
pub use schedule::{image_schedule_routes, public_schedule_routes, schedule_routes};

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;

use crate::error::ApiError;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }

    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(data))
    }
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Render a handler panic as the standard 500 envelope
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
