//! Buyer domain events.

use common::{AggregateId, PaymentMethodId};
use event_bus::{DynEvent, Event, EventKind};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events recorded by the buyer aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BuyerEvent {
    /// A payment method was verified or added for an order.
    PaymentMethodVerified(BuyerAndPaymentMethodVerifiedDomainEvent),
}

impl DomainEvent for BuyerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BuyerEvent::PaymentMethodVerified(_) => {
                BuyerAndPaymentMethodVerifiedDomainEvent::KIND.name()
            }
        }
    }

    fn as_dyn(&self) -> &dyn DynEvent {
        match self {
            BuyerEvent::PaymentMethodVerified(e) => e,
        }
    }
}

/// The buyer and the payment method chosen for an order are known.
///
/// Carries the ids as they were when the event was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerAndPaymentMethodVerifiedDomainEvent {
    pub buyer_id: AggregateId,
    pub buyer_identity: String,
    pub buyer_name: String,
    pub payment_method_id: PaymentMethodId,
    pub order_id: AggregateId,
}

impl Event for BuyerAndPaymentMethodVerifiedDomainEvent {
    const KIND: EventKind = EventKind::domain("BuyerAndPaymentMethodVerifiedDomainEvent");
}
