//! Basket service: stores customer baskets and clears them once ordering
//! has picked up a checkout.

pub mod error;
pub mod handlers;
pub mod repository;

pub use error::{BasketError, Result};
pub use handlers::OrderStartedIntegrationEventHandler;
pub use repository::{BasketRepository, InMemoryBasketRepository};
