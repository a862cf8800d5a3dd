//! Integration events exchanged between the basket and ordering services.

use chrono::{DateTime, Utc};
use common::{CustomerBasket, RequestId};
use serde::{Deserialize, Serialize};

use crate::{Event, EventId, EventKind};

/// An event that crosses a service boundary.
///
/// Integration events carry a unique id and a creation timestamp, and are
/// serializable so they can be recorded in the integration event log.
pub trait IntegrationEvent: Event + Serialize {
    /// Returns the unique event id.
    fn id(&self) -> EventId;

    /// Returns when the event was created.
    fn creation_date(&self) -> DateTime<Utc>;
}

/// Raised by the basket service when a customer checks out.
///
/// Carries the shipping address, payment card, the buyer's basket and the
/// client-supplied request id used to deduplicate order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCheckoutAcceptedIntegrationEvent {
    pub id: EventId,
    pub creation_date: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    pub city: String,
    pub street: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub card_number: String,
    pub card_holder_name: String,
    pub card_expiration: DateTime<Utc>,
    pub card_security_number: String,
    pub card_type_id: i32,
    pub buyer: String,
    pub request_id: RequestId,
    pub basket: CustomerBasket,
}

impl Event for UserCheckoutAcceptedIntegrationEvent {
    const KIND: EventKind = EventKind::integration("UserCheckoutAcceptedIntegrationEvent");
}

impl IntegrationEvent for UserCheckoutAcceptedIntegrationEvent {
    fn id(&self) -> EventId {
        self.id
    }

    fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}

/// Raised by the ordering service once it has accepted a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStartedIntegrationEvent {
    pub id: EventId,
    pub creation_date: DateTime<Utc>,
    pub user_id: String,
}

impl OrderStartedIntegrationEvent {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            creation_date: Utc::now(),
            user_id: user_id.into(),
        }
    }
}

impl Event for OrderStartedIntegrationEvent {
    const KIND: EventKind = EventKind::integration("OrderStartedIntegrationEvent");
}

impl IntegrationEvent for OrderStartedIntegrationEvent {
    fn id(&self) -> EventId {
        self.id
    }

    fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventFamily;

    #[test]
    fn order_started_gets_fresh_id_per_instance() {
        let a = OrderStartedIntegrationEvent::new("1");
        let b = OrderStartedIntegrationEvent::new("1");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.user_id, "1");
    }

    #[test]
    fn integration_kinds_are_in_integration_family() {
        assert_eq!(
            OrderStartedIntegrationEvent::KIND.family(),
            EventFamily::Integration
        );
        assert_eq!(
            UserCheckoutAcceptedIntegrationEvent::KIND.name(),
            "UserCheckoutAcceptedIntegrationEvent"
        );
    }

    #[test]
    fn order_started_serializes_user_id() {
        let event = OrderStartedIntegrationEvent::new("42");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["user_id"], "42");
        assert_eq!(json["id"], event.id.to_string());
    }
}
