//! Ordering service application layer.
//!
//! This crate provides:
//! - commands and their handlers, run through a logging and validation
//!   pipeline
//! - request deduplication for identified commands
//! - the checkout saga: integration and domain event handlers that take an
//!   accepted checkout to a submitted order with a verified buyer
//! - the integration event service and in-memory repositories

pub mod command;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod idempotency;
pub mod infrastructure;
pub mod integration;
pub mod pipeline;
pub mod saga;
pub mod validation;

pub use command::{
    Command, CommandHandler, CommandOutcome, IdempotentCommand, IdentifiedCommand,
};
pub use commands::{CreateOrderCommand, OrderItemDto};
pub use error::{OrderingError, Result};
pub use handlers::CreateOrderCommandHandler;
pub use idempotency::{
    ClientRequest, IdentifiedCommandHandler, InMemoryRequestLedger, LedgerError,
    PostgresRequestLedger, RequestLedger, RequestManager,
};
pub use infrastructure::{InMemoryBuyerRepository, InMemoryOrderRepository, InMemoryRepository};
pub use integration::{
    OrderStatusChangedToSubmittedIntegrationEvent, OrderingIntegrationEventService,
    UserCheckoutAcceptedIntegrationEventHandler,
};
pub use pipeline::{LoggingBehavior, Next, Pipeline, PipelineBehavior, ValidationBehavior};
pub use saga::{
    UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler,
    ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler,
};
pub use validation::{CreateOrderCommandValidator, ValidationFailure, Validator};
