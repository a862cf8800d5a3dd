use chrono::{DateTime, Utc};
use common::{AggregateId, EventId};
use domain::OrderStatus;
use event_bus::{Event, EventKind, IntegrationEvent};
use serde::{Deserialize, Serialize};

/// An order has been submitted and its buyer is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedToSubmittedIntegrationEvent {
    pub id: EventId,
    pub creation_date: DateTime<Utc>,
    pub order_id: AggregateId,
    pub order_status: OrderStatus,
    pub buyer_name: String,
}

impl OrderStatusChangedToSubmittedIntegrationEvent {
    pub fn new(
        order_id: AggregateId,
        order_status: OrderStatus,
        buyer_name: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            creation_date: Utc::now(),
            order_id,
            order_status,
            buyer_name: buyer_name.into(),
        }
    }
}

impl Event for OrderStatusChangedToSubmittedIntegrationEvent {
    const KIND: EventKind = EventKind::integration("OrderStatusChangedToSubmittedIntegrationEvent");
}

impl IntegrationEvent for OrderStatusChangedToSubmittedIntegrationEvent {
    fn id(&self) -> EventId {
        self.id
    }

    fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}
