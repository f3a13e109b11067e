//! Event storage abstraction
//!
//! Every operation is scoped to one owner. Rows owned by someone else behave
//! exactly like missing rows.

use async_trait::async_trait;
use chrono::NaiveDate;
use dayflow_common::Event;
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Upstream(format!("event store: {}", err))
    }
}

/// Which of a user's events to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventQuery {
    All,
    OnDate(NaiveDate),
    /// Inclusive on both ends
    Between(NaiveDate, NaiveDate),
}

impl EventQuery {
    /// Inclusive `(from, to)` date bounds; `None` means unbounded
    pub fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match *self {
            EventQuery::All => (None, None),
            EventQuery::OnDate(d) => (Some(d), Some(d)),
            EventQuery::Between(start, end) => (Some(start), Some(end)),
        }
    }
}

/// Persistent storage for calendar events
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events ordered by date, then start time
    async fn list(&self, user_id: &str, query: EventQuery) -> Result<Vec<Event>, StoreError>;

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Event>, StoreError>;

    /// Insert complete records (ids already assigned); returns them as stored
    async fn insert(&self, user_id: &str, events: Vec<Event>) -> Result<Vec<Event>, StoreError>;

    /// Replace the mutable fields of an existing record
    ///
    /// Returns `None` when the record does not exist for this owner.
    async fn update(&self, user_id: &str, event: Event) -> Result<Option<Event>, StoreError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, user_id: &str, id: &str) -> Result<bool, StoreError>;

    /// Number of rows removed
    async fn delete_all(&self, user_id: &str) -> Result<u64, StoreError>;
}
