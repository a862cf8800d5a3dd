//! Order aggregate and related types.

mod aggregate;
mod events;
mod value_objects;

pub use aggregate::Order;
pub use events::{OrderEvent, OrderStartedDomainEvent};
pub use value_objects::{Address, OrderItem, OrderStatus};

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Invalid number of units.
    #[error("Invalid number of units: {units} (must be greater than 0)")]
    InvalidUnits { units: u32 },

    /// Negative discount.
    #[error("Invalid discount: {discount} (must not be negative)")]
    InvalidDiscount { discount: i64 },

    /// Discount larger than the line total.
    #[error("Discount {discount} exceeds order line total {total}")]
    DiscountExceedsTotal { discount: i64, total: i64 },

    /// Line or order total does not fit in the amount range.
    #[error("Amount overflow: {units} units at unit price {unit_price}")]
    AmountOverflow { unit_price: i64, units: u32 },
}
