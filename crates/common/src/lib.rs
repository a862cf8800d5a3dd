//! Types shared by every service taking part in checkout.

pub mod basket;
pub mod money;
pub mod types;

pub use basket::{BasketItem, CustomerBasket};
pub use money::Money;
pub use types::{AggregateId, EventId, PaymentMethodId, ProductId, RequestId};
