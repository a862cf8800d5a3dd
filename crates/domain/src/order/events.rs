//! Order domain events.

use common::AggregateId;
use event_bus::{DynEvent, Event, EventKind};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::buyer::CardDetails;

use super::OrderStatus;

/// Events recorded by the order aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was created from a checkout.
    Started(OrderStartedDomainEvent),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Started(_) => OrderStartedDomainEvent::KIND.name(),
        }
    }

    fn as_dyn(&self) -> &dyn DynEvent {
        match self {
            OrderEvent::Started(e) => e,
        }
    }
}

/// An order was created and needs its buyer and payment method resolved.
///
/// Carries a snapshot of the order id and status plus the checkout's user
/// and card data, not a reference to the order itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStartedDomainEvent {
    pub order_id: AggregateId,
    pub order_status: OrderStatus,
    pub user_id: String,
    pub user_name: String,
    /// Card type id from checkout; zero when none was supplied.
    pub card_type_id: i32,
    pub card: CardDetails,
}

impl Event for OrderStartedDomainEvent {
    const KIND: EventKind = EventKind::domain("OrderStartedDomainEvent");
}
