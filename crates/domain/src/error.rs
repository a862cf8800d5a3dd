//! Domain error types.

use thiserror::Error;

use crate::buyer::BuyerError;
use crate::order::OrderError;
use crate::repository::RepositoryError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An order invariant was violated.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A buyer or payment method invariant was violated.
    #[error("Buyer error: {0}")]
    Buyer(#[from] BuyerError),

    /// A repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
