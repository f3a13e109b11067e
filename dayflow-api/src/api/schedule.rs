//! Schedule parsing endpoints
//!
//! - `parse-schedule` and its unauthenticated twin `test-parse` use the text model
//! - `parse-schedule-pro` and the image routes need Gemini and answer 503
//!   without it

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use dayflow_common::time::today;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::AppJson;
use super::validation::Validator;
use super::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::services::schedule_parser::{parse_with_text_model, parse_with_vision_model, ParsedEvent};
use crate::services::{ImageInput, TextModel, VisionModel};
use crate::AppState;

/// Body limit for routes carrying base64 images
pub const IMAGE_BODY_LIMIT: usize = 20 * 1024 * 1024;

pub const MAX_IMAGES: usize = 3;

#[derive(Debug, Deserialize)]
pub struct ParseScheduleRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseImageRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseImagesRequest {
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParsedSchedule {
    pub events: Vec<ParsedEvent>,
}

type ScheduleResponse = ApiResult<Json<ApiResponse<ParsedSchedule>>>;

/// Body whose rejection is deferred, so the Gemini check can answer first
type DeferredBody<T> = Result<AppJson<T>, ApiError>;

fn gemini_unavailable() -> ApiError {
    ApiError::ServiceUnavailable("Gemini API key is not configured".to_string())
}

fn pro_model(state: &AppState) -> ApiResult<Arc<dyn TextModel>> {
    state.pro_model.clone().ok_or_else(gemini_unavailable)
}

fn vision_model(state: &AppState) -> ApiResult<Arc<dyn VisionModel>> {
    state.vision_model.clone().ok_or_else(gemini_unavailable)
}

/// Prompt plus reference date (today when omitted)
fn validate_text_request(request: &ParseScheduleRequest) -> ApiResult<(String, NaiveDate)> {
    let mut v = Validator::new();
    let prompt = v.prompt("prompt", request.prompt.as_deref());
    let date = v.optional_date("date", request.date.as_deref());
    let (prompt, date) = v.finish(prompt.zip(date))?;
    Ok((prompt, date.unwrap_or_else(today)))
}

fn parse_image(v: &mut Validator, field: &str, raw: &str) -> Option<ImageInput> {
    match ImageInput::parse(raw) {
        Ok(image) => Some(image),
        Err(message) => {
            v.error(field, message);
            None
        }
    }
}

async fn parse_text(model: &dyn TextModel, request: ParseScheduleRequest) -> ScheduleResponse {
    let (prompt, date) = validate_text_request(&request)?;
    let events = parse_with_text_model(model, &prompt, date).await?;
    Ok(ApiResponse::ok(ParsedSchedule { events }))
}

/// POST /api/ai/parse-schedule
pub async fn parse_schedule(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseScheduleRequest>,
) -> ScheduleResponse {
    parse_text(state.text_model.as_ref(), request).await
}

/// POST /api/ai/test-parse (no auth)
pub async fn test_parse(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseScheduleRequest>,
) -> ScheduleResponse {
    tracing::debug!("Unauthenticated schedule parse");
    parse_text(state.text_model.as_ref(), request).await
}

/// POST /api/ai/parse-schedule-pro
pub async fn parse_schedule_pro(
    State(state): State<AppState>,
    body: DeferredBody<ParseScheduleRequest>,
) -> ScheduleResponse {
    let model = pro_model(&state)?;
    let AppJson(request) = body?;
    parse_text(model.as_ref(), request).await
}

/// POST /api/ai/parse-schedule-image
pub async fn parse_schedule_image(
    State(state): State<AppState>,
    body: DeferredBody<ParseImageRequest>,
) -> ScheduleResponse {
    let model = vision_model(&state)?;
    let AppJson(request) = body?;

    let mut v = Validator::new();
    let image = match request.image.as_deref() {
        Some(raw) => parse_image(&mut v, "image", raw),
        None => {
            v.error("image", "is required");
            None
        }
    };
    let prompt = v.optional_prompt("prompt", request.prompt.as_deref());
    let date = v.optional_date("date", request.date.as_deref());
    let ((image, prompt), date) = v.finish(image.zip(prompt).zip(date))?;

    let events = parse_with_vision_model(
        model.as_ref(),
        std::slice::from_ref(&image),
        prompt.as_deref(),
        date.unwrap_or_else(today),
    )
    .await?;
    Ok(ApiResponse::ok(ParsedSchedule { events }))
}

/// POST /api/ai/parse-schedule-images
pub async fn parse_schedule_images(
    State(state): State<AppState>,
    body: DeferredBody<ParseImagesRequest>,
) -> ScheduleResponse {
    let model = vision_model(&state)?;
    let AppJson(request) = body?;

    let mut v = Validator::new();
    let raw_images = request.images.unwrap_or_default();
    let images = if raw_images.is_empty() || raw_images.len() > MAX_IMAGES {
        v.error("images", format!("must contain 1 to {} images", MAX_IMAGES));
        None
    } else {
        raw_images
            .iter()
            .enumerate()
            .map(|(i, raw)| parse_image(&mut v, &format!("images[{}]", i), raw))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Option<Vec<_>>>()
    };
    let prompt = v.optional_prompt("prompt", request.prompt.as_deref());
    let date = v.optional_date("date", request.date.as_deref());
    let ((images, prompt), date) = v.finish(images.zip(prompt).zip(date))?;

    let events = parse_with_vision_model(
        model.as_ref(),
        &images,
        prompt.as_deref(),
        date.unwrap_or_else(today),
    )
    .await?;
    Ok(ApiResponse::ok(ParsedSchedule { events }))
}

/// Authenticated text routes
pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/parse-schedule", post(parse_schedule))
        .route("/ai/parse-schedule-pro", post(parse_schedule_pro))
}

/// Authenticated image routes with the larger body limit
pub fn image_schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/parse-schedule-image", post(parse_schedule_image))
        .route("/ai/parse-schedule-images", post(parse_schedule_images))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
}

pub fn public_schedule_routes() -> Router<AppState> {
    Router::new().route("/ai/test-parse", post(test_parse))
}
