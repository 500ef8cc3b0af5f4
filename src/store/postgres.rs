use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{EventStore, StoreError};
use crate::models::event::{EventDraft, EventPatch, EventRecord, EventRow};

const COLUMNS: &str =
    "id, user_id, title, start_at, end_at, description, priority, created_at, updated_at";

/// Events in one Postgres table, partitioned logically by `user_id`.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Successfully connected to database");
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        tracing::info!("Migrations run successfully");
        Ok(())
    }
}

fn to_record(row: EventRow) -> Result<EventRecord, StoreError> {
    let id = row.id.to_string();
    EventRecord::try_from(row).map_err(|e| StoreError::Corrupt {
        id,
        reason: e.to_string(),
    })
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn create(&self, user_id: &str, draft: EventDraft) -> Result<EventRecord, StoreError> {
        let sql = format!(
            "INSERT INTO events (id, user_id, title, start_at, end_at, description, priority) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&draft.title)
            .bind(&draft.start)
            .bind(&draft.end)
            .bind(&draft.description)
            .bind(draft.priority.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(event_id = %row.id, "event inserted");
        to_record(row)
    }

    async fn list_all(&self, user_id: &str) -> Result<Vec<EventRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM events WHERE user_id = $1 ORDER BY created_at, id",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(to_record).collect()
    }

    async fn update(&self, user_id: &str, event_id: &str, patch: EventPatch) -> Result<(), StoreError> {
        let id = Uuid::parse_str(event_id).map_err(|_| StoreError::NotFound(event_id.to_string()))?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE events SET updated_at = now()");
        if let Some(title) = patch.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(start) = patch.start {
            builder.push(", start_at = ").push_bind(start);
        }
        if let Some(end) = patch.end {
            builder.push(", end_at = ").push_bind(end);
        }
        if let Some(description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(priority) = patch.priority {
            builder.push(", priority = ").push_bind(priority.as_str());
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(user_id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(event_id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, event_id: &str) -> Result<(), StoreError> {
        let Ok(id) = Uuid::parse_str(event_id) else {
            return Ok(());
        };
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(event_id, rows = result.rows_affected(), "event delete issued");
        Ok(())
    }
}
