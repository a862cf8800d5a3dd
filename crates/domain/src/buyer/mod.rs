//! Buyer aggregate and its payment methods.

mod aggregate;
mod events;
mod payment_method;

pub use aggregate::Buyer;
pub use events::{BuyerAndPaymentMethodVerifiedDomainEvent, BuyerEvent};
pub use payment_method::{CardDetails, CardType, PaymentMethod};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during buyer operations.
#[derive(Debug, Error)]
pub enum BuyerError {
    /// Buyer identity must not be blank.
    #[error("Buyer identity is required")]
    IdentityRequired,

    /// Buyer name must not be blank.
    #[error("Buyer name is required")]
    NameRequired,

    /// Card number must not be blank.
    #[error("Card number is required")]
    CardNumberRequired,

    /// Security number must not be blank.
    #[error("Card security number is required")]
    SecurityNumberRequired,

    /// Card holder name must not be blank.
    #[error("Card holder name is required")]
    CardHolderNameRequired,

    /// The card expired before the payment method was created.
    #[error("Card expired at {expiration}")]
    CardExpired { expiration: DateTime<Utc> },
}
