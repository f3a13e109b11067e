//! dayflow-api library interface
//!
//! The binary wires real providers into [`AppState`]; integration tests wire
//! stubs and an in-memory SQLite store into the same router.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::{
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use services::{AuthProvider, EventStore, TextModel, VisionModel};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn EventStore>,
    /// Groq; insights, analytics, task tips and the basic parser
    pub text_model: Arc<dyn TextModel>,
    /// Gemini text model for `parse-schedule-pro`
    pub pro_model: Option<Arc<dyn TextModel>>,
    /// Gemini vision model for the image parsers
    pub vision_model: Option<Arc<dyn VisionModel>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn EventStore>,
        text_model: Arc<dyn TextModel>,
    ) -> Self {
        Self {
            auth,
            store,
            text_model,
            pro_model: None,
            vision_model: None,
            startup_time: Utc::now(),
        }
    }

    /// Enable the Gemini-backed routes
    pub fn with_gemini(
        mut self,
        pro_model: Arc<dyn TextModel>,
        vision_model: Arc<dyn VisionModel>,
    ) -> Self {
        self.pro_model = Some(pro_model);
        self.vision_model = Some(vision_model);
        self
    }
}

/// Build application router
///
/// `/api/health` and `/api/ai/test-parse` are public; every other route
/// requires a bearer token. CORS is left to the caller (see [`cors_layer`]).
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(api::insights_routes())
        .merge(api::schedule_routes())
        .merge(api::image_schedule_routes())
        .merge(api::analytics_routes())
        .merge(api::event_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .merge(api::health_routes())
        .merge(api::public_schedule_routes());

    Router::new()
        .nest("/api", protected.merge(public))
        .fallback(api::not_found)
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for `origin`: `*`, or a comma-separated list of origins
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origin = origin.trim();
    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origin
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()?;
    if origins.is_empty() {
        anyhow::bail!("CORS origin list is empty");
    }
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_origins() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("https://app.example.com, http://localhost:5173").is_ok());
        assert!(cors_layer(" , ").is_err());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
