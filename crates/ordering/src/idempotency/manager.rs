use std::sync::Arc;

use common::RequestId;

use crate::command::Command;
use crate::error::{OrderingError, Result};

use super::{ClientRequest, RequestLedger};

/// Records client requests in a [`RequestLedger`].
#[derive(Clone)]
pub struct RequestManager {
    ledger: Arc<dyn RequestLedger>,
}

impl RequestManager {
    pub fn new(ledger: Arc<dyn RequestLedger>) -> Self {
        Self { ledger }
    }

    /// Returns true if a request with this id has been recorded.
    pub async fn exists(&self, id: RequestId) -> Result<bool> {
        Ok(self.ledger.exists(id).await?)
    }

    /// Records a request for command type `C`.
    ///
    /// Fails with [`OrderingError::DuplicateRequest`] if the id is already
    /// recorded, including when another caller records it first.
    pub async fn create_request_for_command<C: Command>(&self, id: RequestId) -> Result<()> {
        if self.exists(id).await? {
            return Err(OrderingError::DuplicateRequest(id));
        }

        if !self.ledger.insert(ClientRequest::new(id, C::NAME)).await? {
            return Err(OrderingError::DuplicateRequest(id));
        }

        tracing::debug!(request_id = %id, command = C::NAME, "client request recorded");
        Ok(())
    }

    /// Forgets a recorded request so the same id can be submitted again.
    pub async fn forget(&self, id: RequestId) -> Result<()> {
        if self.ledger.remove(id).await? {
            tracing::debug!(request_id = %id, "client request forgotten");
        }
        Ok(())
    }
}
