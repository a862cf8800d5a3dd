//! Command traits and the identified-command envelope.

use std::fmt;

use async_trait::async_trait;
use common::RequestId;

use crate::error::Result;

/// A request to change state, handled by exactly one handler.
pub trait Command: fmt::Debug + Send + Sync + 'static {
    /// The value a successful handler returns.
    type Output: Send + 'static;

    /// Command type name, used in logs, metrics and the request ledger.
    const NAME: &'static str;
}

/// Handles one command type.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> Result<C::Output>;
}

/// A command that may be wrapped in an [`IdentifiedCommand`].
pub trait IdempotentCommand: Command {
    /// The result reported when the request was already processed.
    fn duplicate_result() -> Self::Output;
}

/// A command paired with the caller-supplied request id that deduplicates it.
#[derive(Debug, Clone)]
pub struct IdentifiedCommand<C> {
    pub command: C,
    pub request_id: RequestId,
}

impl<C> IdentifiedCommand<C> {
    pub fn new(command: C, request_id: RequestId) -> Self {
        Self {
            command,
            request_id,
        }
    }
}

/// Outcome of dispatching an identified command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome<R> {
    /// The command ran and produced this result.
    Executed(R),

    /// The request id had been seen before; the command did not run.
    Duplicate(R),
}

impl<R> CommandOutcome<R> {
    /// Returns the result regardless of whether the command ran.
    pub fn into_inner(self) -> R {
        match self {
            CommandOutcome::Executed(r) | CommandOutcome::Duplicate(r) => r,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, CommandOutcome::Duplicate(_))
    }
}
