use std::sync::Arc;

use crate::command::{CommandHandler, CommandOutcome, IdempotentCommand, IdentifiedCommand};
use crate::error::{OrderingError, Result};

use super::RequestManager;

/// Runs a command at most once per client request id.
///
/// A request id that has been seen before, or that another caller records
/// first, yields [`CommandOutcome::Duplicate`] with the command's duplicate
/// result. Otherwise the request is recorded and the command dispatched.
/// If dispatch fails the record is removed again, so the caller can retry
/// with the same id, and the error is returned.
pub struct IdentifiedCommandHandler<C: IdempotentCommand> {
    requests: RequestManager,
    inner: Arc<dyn CommandHandler<C>>,
}

impl<C: IdempotentCommand> IdentifiedCommandHandler<C> {
    pub fn new(requests: RequestManager, inner: Arc<dyn CommandHandler<C>>) -> Self {
        Self { requests, inner }
    }

    #[tracing::instrument(skip(self, identified), fields(command = C::NAME, request_id = %identified.request_id))]
    pub async fn dispatch(
        &self,
        identified: IdentifiedCommand<C>,
    ) -> Result<CommandOutcome<C::Output>> {
        let request_id = identified.request_id;

        if self.requests.exists(request_id).await? {
            return Ok(Self::duplicate());
        }

        match self
            .requests
            .create_request_for_command::<C>(request_id)
            .await
        {
            Ok(()) => {}
            Err(OrderingError::DuplicateRequest(_)) => return Ok(Self::duplicate()),
            Err(err) => return Err(err),
        }

        tracing::info!("dispatching command");
        match self.inner.handle(identified.command).await {
            Ok(output) => Ok(CommandOutcome::Executed(output)),
            Err(err) => {
                tracing::warn!(error = %err, "command failed, releasing request id");
                if let Err(forget_err) = self.requests.forget(request_id).await {
                    tracing::error!(error = %forget_err, "failed to release request id");
                }
                Err(err)
            }
        }
    }

    fn duplicate() -> CommandOutcome<C::Output> {
        metrics::counter!("duplicate_requests_total", "command" => C::NAME).increment(1);
        tracing::info!("request already processed, skipping command");
        CommandOutcome::Duplicate(C::duplicate_result())
    }
}
