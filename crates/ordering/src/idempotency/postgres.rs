use async_trait::async_trait;
use common::RequestId;
use sqlx::PgPool;

use super::{ClientRequest, LedgerError, RequestLedger};

/// PostgreSQL-backed request ledger.
#[derive(Clone)]
pub struct PostgresRequestLedger {
    pool: PgPool,
}

impl PostgresRequestLedger {
    /// Creates a new PostgreSQL request ledger.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RequestLedger for PostgresRequestLedger {
    async fn exists(&self, id: RequestId) -> Result<bool, LedgerError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM client_requests WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn insert(&self, request: ClientRequest) -> Result<bool, LedgerError> {
        let result = sqlx::query(
            r#"
            INSERT INTO client_requests (id, name, time)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(&request.name)
        .bind(request.time)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
    async fn remove(&self, id: RequestId) -> Result<bool, LedgerError> {
        let result = sqlx::query("DELETE FROM client_requests WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
