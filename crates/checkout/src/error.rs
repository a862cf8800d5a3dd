//! Errors surfaced by the checkout application.

use basket::BasketError;
use event_bus::EventBusError;
use ordering::LedgerError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The customer has nothing in their basket.
    #[error("Basket for customer {0} is empty")]
    EmptyBasket(String),

    #[error("Basket error: {0}")]
    Basket(#[from] BasketError),

    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    #[error("Request ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
