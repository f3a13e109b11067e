//! Range analytics and single-task insight endpoints

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use super::extract::AppJson;
use super::validation::Validator;
use super::ApiResponse;
use crate::error::ApiResult;
use crate::services::range_report::{build_range_report, RangeReport};
use crate::services::task_insight::{task_insight, TaskDetails};
use crate::services::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInsightRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskInsightResponse {
    pub insight: String,
}

/// POST /api/ai/analytics
pub async fn range_analytics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<AnalyticsRequest>,
) -> ApiResult<Json<ApiResponse<RangeReport>>> {
    let mut v = Validator::new();
    let start = v.date("startDate", request.start_date.as_deref());
    let end = v.date("endDate", request.end_date.as_deref());
    let (start, end) = v.finish(start.zip(end))?;

    let report = build_range_report(
        state.store.as_ref(),
        state.text_model.as_ref(),
        &user.id,
        start,
        end,
    )
    .await?;
    Ok(ApiResponse::ok(report))
}

fn validate_task(request: TaskInsightRequest) -> ApiResult<TaskDetails> {
    let mut v = Validator::new();
    let title = v.title("title", request.title.as_deref());
    let start = v.start_time("startTime", request.start_time);
    let end = v.end_time("endTime", request.end_time);
    v.time_order("endTime", start, end);
    let (title, (start_time, end_time)) = v.finish(title.zip(start.zip(end)))?;

    Ok(TaskDetails {
        title,
        description: request.description,
        start_time,
        end_time,
        category: request.category,
    })
}

/// POST /api/ai/task-insight
pub async fn task_insight_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<TaskInsightRequest>,
) -> ApiResult<Json<ApiResponse<TaskInsightResponse>>> {
    let task = validate_task(request)?;
    let insight = task_insight(state.text_model.as_ref(), &task).await;
    Ok(ApiResponse::ok(TaskInsightResponse { insight }))
}

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/analytics", post(range_analytics))
        .route("/ai/task-insight", post(task_insight_handler))
}
