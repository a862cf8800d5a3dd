//! Ordering application error types.

use common::{AggregateId, RequestId};
use domain::{BuyerError, DomainError, OrderError, RepositoryError};
use event_bus::EventBusError;
use thiserror::Error;

use crate::idempotency::LedgerError;
use crate::validation::ValidationFailure;

/// Errors that can occur while processing commands and saga steps.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// One or more validators rejected a command.
    #[error("Command {command} failed validation: {}", join_failures(.failures))]
    Validation {
        command: &'static str,
        failures: Vec<ValidationFailure>,
    },

    /// A request with this id has already been recorded.
    #[error("Request with id {0} already exists")]
    DuplicateRequest(RequestId),

    /// The order a saga step refers to is not stored.
    #[error("Order not found: {0}")]
    OrderNotFound(AggregateId),

    /// A domain invariant was violated.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// A repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Publishing an event failed.
    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    /// The request ledger could not be read or written.
    #[error("Request ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<OrderError> for OrderingError {
    fn from(err: OrderError) -> Self {
        OrderingError::Domain(err.into())
    }
}

impl From<BuyerError> for OrderingError {
    fn from(err: BuyerError) -> Self {
        OrderingError::Domain(err.into())
    }
}

fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience type alias for ordering results.
pub type Result<T> = std::result::Result<T, OrderingError>;
