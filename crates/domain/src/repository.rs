//! Persistence capabilities the application layer relies on.
//!
//! Adding or updating an aggregate stages it; nothing is dispatched until
//! [`UnitOfWork::save_entities`] commits. Committing drains the ledgers of
//! the staged aggregates and publishes their events in recorded order.

use async_trait::async_trait;
use common::AggregateId;
use event_bus::EventBusError;
use thiserror::Error;

use crate::{Buyer, Order};

/// Errors that can occur in a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The aggregate is not stored.
    #[error("{aggregate_type} not found: {id}")]
    NotFound {
        aggregate_type: &'static str,
        id: String,
    },

    /// An aggregate with the same id is already stored.
    #[error("{aggregate_type} already exists: {id}")]
    AlreadyExists {
        aggregate_type: &'static str,
        id: String,
    },

    /// A domain event handler failed while the commit was dispatching.
    #[error("Domain event dispatch failed: {0}")]
    Dispatch(#[from] EventBusError),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Commit boundary of a repository.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commits staged aggregates and dispatches their domain events.
    ///
    /// Returns `true` once everything staged has been committed.
    async fn save_entities(&self) -> RepositoryResult<bool>;
}

/// Storage for orders.
#[async_trait]
pub trait OrderRepository: UnitOfWork {
    async fn add(&self, order: Order) -> RepositoryResult<Order>;

    async fn update(&self, order: Order) -> RepositoryResult<()>;

    async fn get(&self, order_id: AggregateId) -> RepositoryResult<Option<Order>>;
}

/// Storage for buyers, looked up by external identity.
#[async_trait]
pub trait BuyerRepository: UnitOfWork {
    async fn find(&self, identity: &str) -> RepositoryResult<Option<Buyer>>;

    async fn add(&self, buyer: Buyer) -> RepositoryResult<Buyer>;

    async fn update(&self, buyer: Buyer) -> RepositoryResult<Buyer>;
}
