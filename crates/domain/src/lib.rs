//! Domain layer of the ordering service.
//!
//! This crate provides:
//! - the aggregate root trait and the pending domain event ledger
//! - the Order aggregate with its address and order lines
//! - the Buyer aggregate with its payment methods
//! - the repository and unit-of-work capabilities

pub mod aggregate;
pub mod buyer;
pub mod error;
pub mod order;
pub mod repository;

pub use aggregate::{AggregateRoot, DomainEvent, DomainEvents};
pub use buyer::{
    Buyer, BuyerAndPaymentMethodVerifiedDomainEvent, BuyerError, BuyerEvent, CardDetails,
    CardType, PaymentMethod,
};
pub use common::{AggregateId, Money, PaymentMethodId, ProductId};
pub use error::DomainError;
pub use order::{
    Address, Order, OrderError, OrderEvent, OrderItem, OrderStartedDomainEvent, OrderStatus,
};
pub use repository::{
    BuyerRepository, OrderRepository, RepositoryError, RepositoryResult, UnitOfWork,
};
