//! Router construction and request helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dayflow_api::db::{init_memory_pool, SqliteEventStore};
use dayflow_api::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use super::stubs::{ScriptedModel, StaticAuth};

pub const ALICE_TOKEN: &str = "token-alice";
pub const BOB_TOKEN: &str = "token-bob";

/// Router over an in-memory store with stub auth and models
pub struct TestApp {
    pub router: Router,
    pub text_model: Arc<ScriptedModel>,
}

impl TestApp {
    /// Groq stub only; Gemini routes answer 503
    pub async fn new(text_model: Arc<ScriptedModel>) -> Self {
        let state = Self::state(text_model.clone()).await;
        Self {
            router: build_router(state),
            text_model,
        }
    }

    /// With `gemini` serving both the pro and vision routes
    pub async fn with_gemini(text_model: Arc<ScriptedModel>, gemini: Arc<ScriptedModel>) -> Self {
        let state = Self::state(text_model.clone())
            .await
            .with_gemini(gemini.clone(), gemini);
        Self {
            router: build_router(state),
            text_model,
        }
    }

    async fn state(text_model: Arc<ScriptedModel>) -> AppState {
        let pool = init_memory_pool().await.expect("in-memory database");
        let auth = StaticAuth::new(&[(ALICE_TOKEN, "alice"), (BOB_TOKEN, "bob")]);
        AppState::new(
            Arc::new(auth),
            Arc::new(SqliteEventStore::new(pool)),
            text_model,
        )
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Status and JSON body (`Null` when the body is empty)
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, body)
}
