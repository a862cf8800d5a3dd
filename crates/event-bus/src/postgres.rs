use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    EventBusError, EventId, Result,
    log::{EventState, IntegrationEventLog, IntegrationEventLogEntry},
};

/// PostgreSQL-backed integration event log.
#[derive(Clone)]
pub struct PostgresIntegrationEventLog {
    pool: PgPool,
}

impl PostgresIntegrationEventLog {
    /// Creates a new PostgreSQL integration event log.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_entry(row: PgRow) -> Result<IntegrationEventLogEntry> {
        let state: String = row.try_get("state")?;
        let times_sent: i32 = row.try_get("times_sent")?;

        Ok(IntegrationEventLogEntry {
            event_id: EventId::from_uuid(row.try_get::<Uuid, _>("event_id")?),
            event_kind: row.try_get("event_kind")?,
            content: row.try_get("content")?,
            state: EventState::parse(&state)?,
            times_sent: u32::try_from(times_sent).unwrap_or_default(),
            creation_time: row.try_get("creation_time")?,
        })
    }

    async fn transition(&self, event_id: EventId, state: EventState) -> Result<()> {
        let increment = i32::from(state == EventState::InProgress);

        let result = sqlx::query(
            r#"
            UPDATE integration_event_log
            SET state = $2, times_sent = times_sent + $3
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.as_uuid())
        .bind(state.as_str())
        .bind(increment)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EventBusError::LogEntryNotFound(event_id));
        }
        Ok(())
    }
}

#[async_trait]
impl IntegrationEventLog for PostgresIntegrationEventLog {
    async fn save_event(&self, entry: IntegrationEventLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO integration_event_log (event_id, event_kind, content, state, times_sent, creation_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.event_id.as_uuid())
        .bind(&entry.event_kind)
        .bind(&entry.content)
        .bind(entry.state.as_str())
        .bind(i32::try_from(entry.times_sent).unwrap_or(i32::MAX))
        .bind(entry.creation_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_in_progress(&self, event_id: EventId) -> Result<()> {
        self.transition(event_id, EventState::InProgress).await
    }

    async fn mark_published(&self, event_id: EventId) -> Result<()> {
        self.transition(event_id, EventState::Published).await
    }

    async fn mark_failed(&self, event_id: EventId) -> Result<()> {
        self.transition(event_id, EventState::PublishedFailed).await
    }

    async fn pending(&self) -> Result<Vec<IntegrationEventLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, event_kind, content, state, times_sent, creation_time
            FROM integration_event_log
            WHERE state IN ('not_published', 'published_failed')
            ORDER BY creation_time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_entry).collect()
    }

    async fn get(&self, event_id: EventId) -> Result<Option<IntegrationEventLogEntry>> {
        let row = sqlx::query(
            r#"
            SELECT event_id, event_kind, content, state, times_sent, creation_time
            FROM integration_event_log
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_entry).transpose()
    }
}
