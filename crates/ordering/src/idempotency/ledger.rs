use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::RequestId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// A client request id that has been accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub id: RequestId,
    /// Name of the command the request carried.
    pub name: String,
    pub time: DateTime<Utc>,
}

impl ClientRequest {
    pub fn new(id: RequestId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            time: Utc::now(),
        }
    }
}

/// Errors raised by a request ledger backend.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Storage of seen client request ids.
#[async_trait]
pub trait RequestLedger: Send + Sync {
    /// Returns true if a request with this id has been recorded.
    async fn exists(&self, id: RequestId) -> Result<bool, LedgerError>;

    /// Records a request unless one with the same id exists.
    ///
    /// The check and the write are one atomic step. Returns `false` if the
    /// id was already recorded, in which case nothing is written.
    async fn insert(&self, request: ClientRequest) -> Result<bool, LedgerError>;

    /// Forgets a recorded request. Returns `false` if the id was not recorded.
    async fn remove(&self, id: RequestId) -> Result<bool, LedgerError>;
}

/// In-memory request ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequestLedger {
    requests: Arc<Mutex<HashMap<RequestId, ClientRequest>>>,
}

impl InMemoryRequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded requests.
    pub async fn len(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.requests.lock().await.is_empty()
    }

    /// Returns the recorded request with this id.
    pub async fn get(&self, id: RequestId) -> Option<ClientRequest> {
        self.requests.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl RequestLedger for InMemoryRequestLedger {
    async fn exists(&self, id: RequestId) -> Result<bool, LedgerError> {
        Ok(self.requests.lock().await.contains_key(&id))
    }

    async fn insert(&self, request: ClientRequest) -> Result<bool, LedgerError> {
        let mut requests = self.requests.lock().await;
        if requests.contains_key(&request.id) {
            return Ok(false);
        }
        requests.insert(request.id, request);
        Ok(true)
    }

    async fn remove(&self, id: RequestId) -> Result<bool, LedgerError> {
        Ok(self.requests.lock().await.remove(&id).is_some())
    }
}
