//! Calendar event records
//!
//! Two shapes of the same record:
//! - [`Event`]: camelCase, what clients send and receive
//! - [`EventRow`]: snake_case, what the `events` table stores, plus the owner id
//!
//! Conversions go through [`EventRow::from_event`] and `From<EventRow> for Event`.
//! Every client-visible field survives a round trip unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Calendar event as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal hours, `9.5` = 09:30
    pub start_time: f64,
    /// Decimal hours; not required to exceed `start_time`
    pub end_time: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    /// Free-text label, matched case-insensitively by the analytics
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Minimal event, mostly for building fixtures
    pub fn new(title: impl Into<String>, start_time: f64, end_time: f64, date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: None,
            start_time,
            end_time,
            date,
            emoji: None,
            color_hex: None,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// `end_time - start_time`; negative when the event is inverted
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Lower-cased category, `"other"` when absent
    pub fn category_key(&self) -> String {
        self.category
            .as_deref()
            .unwrap_or("other")
            .to_lowercase()
    }
}

/// Default color for events that do not specify one
pub const DEFAULT_COLOR_HEX: &str = "#3B82F6";

/// Default emoji for events that do not specify one
pub const DEFAULT_EMOJI: &str = "📅";

/// `#RRGGBB`
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Row in the `events` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EventRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub date: NaiveDate,
    pub emoji: Option<String>,
    pub color_hex: Option<String>,
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventRow {
    /// Attach the owner and switch to storage naming
    pub fn from_event(event: Event, user_id: &str) -> Self {
        Self {
            id: event.id,
            user_id: user_id.to_string(),
            title: event.title,
            description: event.description,
            start_time: event.start_time,
            end_time: event.end_time,
            date: event.date,
            emoji: event.emoji,
            color_hex: event.color_hex,
            category: event.category,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            date: row.date,
            emoji: row.emoji,
            color_hex: row.color_hex,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
