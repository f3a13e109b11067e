//! SQLite-backed [`EventStore`]

use async_trait::async_trait;
use dayflow_common::{Event, EventRow};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::services::event_store::{EventQuery, EventStore, StoreError};

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, description, start_time, end_time, date, \
     emoji, color_hex, category, created_at, updated_at FROM events";

#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn list(&self, user_id: &str, query: EventQuery) -> Result<Vec<Event>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder.push(" WHERE user_id = ").push_bind(user_id);

        let (from, to) = query.date_bounds();
        if let Some(from) = from {
            builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = to {
            builder.push(" AND date <= ").push_bind(to);
        }
        builder.push(" ORDER BY date ASC, start_time ASC");

        let rows: Vec<EventRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Event>, StoreError> {
        let row: Option<EventRow> =
            sqlx::query_as(&format!("{} WHERE user_id = ? AND id = ?", SELECT_COLUMNS))
                .bind(user_id)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Event::from))
    }

    async fn insert(&self, user_id: &str, events: Vec<Event>) -> Result<Vec<Event>, StoreError> {
        let mut tx = self.pool.begin().await?;
        for event in &events {
            let row = EventRow::from_event(event.clone(), user_id);
            sqlx::query(
                r#"
                INSERT INTO events (
                    id, user_id, title, description, start_time, end_time, date,
                    emoji, color_hex, category, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.id)
            .bind(&row.user_id)
            .bind(&row.title)
            .bind(&row.description)
            .bind(row.start_time)
            .bind(row.end_time)
            .bind(row.date)
            .bind(&row.emoji)
            .bind(&row.color_hex)
            .bind(&row.category)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(events)
    }

    async fn update(&self, user_id: &str, event: Event) -> Result<Option<Event>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, start_time = ?, end_time = ?, date = ?,
                emoji = ?, color_hex = ?, category = ?, updated_at = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.date)
        .bind(&event.emoji)
        .bind(&event.color_hex)
        .bind(&event.category)
        .bind(event.updated_at)
        .bind(user_id)
        .bind(&event.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(user_id, &event.id).await
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
