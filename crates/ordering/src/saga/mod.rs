//! Domain event handlers that carry a started order through buyer
//! verification.

mod update_order;
mod validate_or_add_buyer;

pub use update_order::UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler;
pub use validate_or_add_buyer::ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler;
