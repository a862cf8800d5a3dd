use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain::{AggregateRoot, Buyer, BuyerRepository, CardType, OrderStartedDomainEvent};
use event_bus::EventHandler;

use crate::error::OrderingError;
use crate::integration::{
    OrderStatusChangedToSubmittedIntegrationEvent, OrderingIntegrationEventService,
};

/// Resolves the buyer and payment method for a started order.
///
/// Looks the buyer up by user id, creating it if needed, and verifies or
/// adds the checkout card. Committing the buyer dispatches its
/// verified event. Afterwards the order is announced as submitted.
pub struct ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler {
    buyers: Arc<dyn BuyerRepository>,
    integration_events: OrderingIntegrationEventService,
}

impl ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler {
    pub fn new(
        buyers: Arc<dyn BuyerRepository>,
        integration_events: OrderingIntegrationEventService,
    ) -> Self {
        Self {
            buyers,
            integration_events,
        }
    }
}

#[async_trait]
impl EventHandler for ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler {
    type Event = OrderStartedDomainEvent;
    type Error = OrderingError;

    fn name(&self) -> &'static str {
        "ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler"
    }

    #[tracing::instrument(skip(self, event), fields(order_id = %event.order_id, user_id = %event.user_id))]
    async fn handle(&self, event: &OrderStartedDomainEvent) -> Result<(), OrderingError> {
        // A checkout without a known card type is charged as Amex.
        let card_type = CardType::from_id(event.card_type_id).unwrap_or_default();

        let (mut buyer, existing) = match self.buyers.find(&event.user_id).await? {
            Some(buyer) => (buyer, true),
            None => (Buyer::new(&event.user_id, &event.user_name)?, false),
        };

        buyer.verify_or_add_payment_method(
            card_type,
            format!("Payment Method on {}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
            &event.card,
            event.order_id,
        )?;

        let buyer = if existing {
            self.buyers.update(buyer).await?
        } else {
            self.buyers.add(buyer).await?
        };
        self.buyers.save_entities().await?;

        tracing::info!(buyer_id = %buyer.id(), existing, "buyer verified for order");

        self.integration_events
            .publish_through_event_bus(&OrderStatusChangedToSubmittedIntegrationEvent::new(
                event.order_id,
                event.order_status,
                buyer.name(),
            ))
            .await
    }
}
