//! Event CRUD endpoints
//!
//! All operations are scoped to the authenticated caller. An id that is not
//! a UUID, does not exist, or belongs to someone else is a 404.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use dayflow_common::Event;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::AppJson;
use super::validation::{field_path, Validator};
use super::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::services::{AuthUser, EventQuery};
use crate::AppState;

/// Client-supplied event fields, used for both create and partial update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl EventInput {
    /// New event with a fresh id, or `None` after recording field errors
    fn into_new_event(self, v: &mut Validator, prefix: &str, now: DateTime<Utc>) -> Option<Event> {
        let title = v.title(&field_path(prefix, "title"), self.title.as_deref());
        let start = v.start_time(&field_path(prefix, "startTime"), self.start_time);
        let end = v.end_time(&field_path(prefix, "endTime"), self.end_time);
        let ordered = v.time_order(&field_path(prefix, "endTime"), start, end);
        let date = v.date(&field_path(prefix, "date"), self.date.as_deref());
        let color_ok = v.color_hex(&field_path(prefix, "colorHex"), self.color_hex.as_deref());

        let ((title, date), (start_time, end_time)) = title.zip(date).zip(start.zip(end))?;
        if !ordered || !color_ok {
            return None;
        }

        Some(Event {
            id: Uuid::new_v4().to_string(),
            title,
            description: self.description,
            start_time,
            end_time,
            date,
            emoji: self.emoji,
            color_hex: self.color_hex,
            category: self.category,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Overlay the supplied fields on an existing event
    ///
    /// Every supplied field is checked before giving up, and the time order
    /// is checked on the merged record.
    fn apply_to(self, mut event: Event, v: &mut Validator) -> Option<Event> {
        let title = self.title.as_deref().map(|t| v.title("title", Some(t)));
        let start = self.start_time.map(|h| v.start_time("startTime", Some(h)));
        let end = self.end_time.map(|h| v.end_time("endTime", Some(h)));
        let date = self.date.as_deref().map(|d| v.date("date", Some(d)));
        let color_ok = v.color_hex("colorHex", self.color_hex.as_deref());

        let merged_start = start.unwrap_or(Some(event.start_time));
        let merged_end = end.unwrap_or(Some(event.end_time));
        let ordered = v.time_order("endTime", merged_start, merged_end);

        if !v.is_valid() || !ordered || !color_ok {
            return None;
        }
        if let Some(title) = title.flatten() {
            event.title = title;
        }
        if let Some(date) = date.flatten() {
            event.date = date;
        }
        event.start_time = merged_start?;
        event.end_time = merged_end?;

        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(emoji) = self.emoji {
            event.emoji = Some(emoji);
        }
        if let Some(color_hex) = self.color_hex {
            event.color_hex = Some(color_hex);
        }
        if let Some(category) = self.category {
            event.category = Some(category);
        }
        Some(event)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub events: Vec<EventInput>,
    #[serde(default)]
    pub clear_existing: bool,
}

#[derive(Debug, Serialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct SingleEvent {
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub events: Vec<Event>,
    pub count: usize,
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Event {} not found", id))
}

/// Canonical UUID text, or a 404 for anything that cannot be an event id
fn parse_event_id(id: &str) -> ApiResult<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| not_found(id))
}

fn list_query(query: &ListQuery) -> ApiResult<EventQuery> {
    let mut v = Validator::new();
    if query.date.is_some() {
        let date = v.date("date", query.date.as_deref());
        return v.finish(date).map(EventQuery::OnDate);
    }
    if query.start_date.is_none() && query.end_date.is_none() {
        return Ok(EventQuery::All);
    }
    let start = v.date("startDate", query.start_date.as_deref());
    let end = v.date("endDate", query.end_date.as_deref());
    let (start, end) = v.finish(start.zip(end))?;
    Ok(EventQuery::Between(start, end))
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<EventList>>> {
    let query = list_query(&query)?;
    let events = state.store.list(&user.id, query).await?;
    tracing::debug!(user_id = %user.id, count = events.len(), "Listed events");
    Ok(ApiResponse::ok(EventList { events }))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<EventInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SingleEvent>>)> {
    let mut v = Validator::new();
    let event = input.into_new_event(&mut v, "", Utc::now());
    let event = v.finish(event)?;

    let event = state
        .store
        .insert(&user.id, vec![event])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Upstream("event store returned no rows".to_string()))?;

    tracing::info!(user_id = %user.id, event_id = %event.id, "Created event");
    Ok(ApiResponse::created(SingleEvent { event }))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<EventInput>,
) -> ApiResult<Json<ApiResponse<SingleEvent>>> {
    let id = parse_event_id(&id)?;
    let existing = state
        .store
        .get(&user.id, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let mut v = Validator::new();
    let merged = patch.apply_to(existing, &mut v);
    let mut event = v.finish(merged)?;
    event.updated_at = Some(Utc::now());

    let event = state
        .store
        .update(&user.id, event)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(user_id = %user.id, event_id = %event.id, "Updated event");
    Ok(ApiResponse::ok(SingleEvent { event }))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Deleted>>> {
    let id = parse_event_id(&id)?;
    if !state.store.delete(&user.id, &id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(user_id = %user.id, event_id = %id, "Deleted event");
    Ok(ApiResponse::ok(Deleted { deleted: 1 }))
}

/// DELETE /api/events
pub async fn delete_all_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<Deleted>>> {
    let deleted = state.store.delete_all(&user.id).await?;
    Ok(ApiResponse::ok(Deleted { deleted }))
}

/// POST /api/events/sync
pub async fn sync_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<SyncRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SyncResult>>)> {
    let now = Utc::now();
    let mut v = Validator::new();
    let mut parsed = Vec::with_capacity(request.events.len());
    for (index, input) in request.events.into_iter().enumerate() {
        parsed.push(input.into_new_event(&mut v, &format!("events[{}]", index), now));
    }
    let events = v.finish(parsed.into_iter().collect::<Option<Vec<Event>>>())?;

    if request.clear_existing {
        let cleared = state.store.delete_all(&user.id).await?;
        tracing::info!(user_id = %user.id, cleared, "Cleared events before sync");
    }

    let events = state.store.insert(&user.id, events).await?;
    let count = events.len();
    tracing::info!(user_id = %user.id, count, "Synced events");
    Ok(ApiResponse::created(SyncResult { events, count }))
}

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(list_events).post(create_event).delete(delete_all_events),
        )
        .route("/events/sync", post(sync_events))
        .route("/events/:id", put(update_event).delete(delete_event))
}
