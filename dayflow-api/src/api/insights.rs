//! Daily insights endpoint

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Deserialize;

use super::extract::AppJson;
use super::validation::Validator;
use super::ApiResponse;
use crate::error::ApiResult;
use crate::services::insights::{generate_day_insights, DayInsights};
use crate::services::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    #[serde(default)]
    pub date: Option<String>,
}

/// POST /api/ai/insights
pub async fn day_insights(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<InsightsRequest>,
) -> ApiResult<Json<ApiResponse<DayInsights>>> {
    let mut v = Validator::new();
    let date = v.date("date", request.date.as_deref());
    let date = v.finish(date)?;

    let insights = generate_day_insights(
        state.store.as_ref(),
        state.text_model.as_ref(),
        &user.id,
        date,
    )
    .await?;
    Ok(ApiResponse::ok(insights))
}

pub fn insights_routes() -> Router<AppState> {
    Router::new().route("/ai/insights", post(day_insights))
}
