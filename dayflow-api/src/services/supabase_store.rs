//! Supabase PostgREST event store
//!
//! Talks to `/rest/v1/events` with the service key. Ownership is enforced by
//! always filtering on `user_id`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dayflow_common::{Event, EventRow};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::event_store::{EventQuery, EventStore, StoreError};

const EVENTS_TABLE: &str = "events";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Mutable columns sent on PATCH
#[derive(Debug, Serialize)]
struct EventUpdate<'a> {
    title: &'a str,
    description: Option<&'a str>,
    start_time: f64,
    end_time: f64,
    date: NaiveDate,
    emoji: Option<&'a str>,
    color_hex: Option<&'a str>,
    category: Option<&'a str>,
    updated_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Event> for EventUpdate<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            title: &event.title,
            description: event.description.as_deref(),
            start_time: event.start_time,
            end_time: event.end_time,
            date: event.date,
            emoji: event.emoji.as_deref(),
            color_hex: event.color_hex.as_deref(),
            category: event.category.as_deref(),
            updated_at: event.updated_at,
        }
    }
}

pub struct SupabaseEventStore {
    http_client: reqwest::Client,
    table_url: String,
    service_key: String,
}

impl SupabaseEventStore {
    pub fn new(base_url: &str, service_key: String) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), EVENTS_TABLE),
            service_key,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, &self.table_url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send_rows<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// PostgREST filters for an owner plus a date window
fn list_filters(user_id: &str, query: EventQuery) -> Vec<(&'static str, String)> {
    let mut filters = vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", user_id)),
    ];
    match query.date_bounds() {
        (Some(from), Some(to)) if from == to => filters.push(("date", format!("eq.{}", from))),
        (from, to) => {
            if let Some(from) = from {
                filters.push(("date", format!("gte.{}", from)));
            }
            if let Some(to) = to {
                filters.push(("date", format!("lte.{}", to)));
            }
        }
    }
    filters.push(("order", "date.asc,start_time.asc".to_string()));
    filters
}

fn row_filters(user_id: &str, id: &str) -> [(&'static str, String); 2] {
    [("user_id", format!("eq.{}", user_id)), ("id", format!("eq.{}", id))]
}

#[async_trait]
impl EventStore for SupabaseEventStore {
    async fn list(&self, user_id: &str, query: EventQuery) -> Result<Vec<Event>, StoreError> {
        let rows: Vec<EventRow> = self
            .send_rows(
                self.request(reqwest::Method::GET)
                    .query(&list_filters(user_id, query)),
            )
            .await?;
        tracing::debug!(user_id, count = rows.len(), "Listed events");
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Event>, StoreError> {
        let rows: Vec<EventRow> = self
            .send_rows(
                self.request(reqwest::Method::GET)
                    .query(&[("select", "*"), ("limit", "1")])
                    .query(&row_filters(user_id, id)),
            )
            .await?;
        Ok(rows.into_iter().next().map(Event::from))
    }

    async fn insert(&self, user_id: &str, events: Vec<Event>) -> Result<Vec<Event>, StoreError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<EventRow> = events
            .into_iter()
            .map(|event| EventRow::from_event(event, user_id))
            .collect();

        let stored: Vec<EventRow> = self
            .send_rows(
                self.request(reqwest::Method::POST)
                    .header("Prefer", "return=representation")
                    .json(&rows),
            )
            .await?;
        Ok(stored.into_iter().map(Event::from).collect())
    }

    async fn update(&self, user_id: &str, event: Event) -> Result<Option<Event>, StoreError> {
        let rows: Vec<EventRow> = self
            .send_rows(
                self.request(reqwest::Method::PATCH)
                    .query(&row_filters(user_id, &event.id))
                    .header("Prefer", "return=representation")
                    .json(&EventUpdate::from(&event)),
            )
            .await?;
        Ok(rows.into_iter().next().map(Event::from))
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<bool, StoreError> {
        let rows: Vec<EventRow> = self
            .send_rows(
                self.request(reqwest::Method::DELETE)
                    .query(&row_filters(user_id, id))
                    .header("Prefer", "return=representation"),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, StoreError> {
        let rows: Vec<EventRow> = self
            .send_rows(
                self.request(reqwest::Method::DELETE)
                    .query(&[("user_id", format!("eq.{}", user_id))])
                    .header("Prefer", "return=representation"),
            )
            .await?;
        tracing::info!(user_id, deleted = rows.len(), "Deleted all events");
        Ok(rows.len() as u64)
    }
}
