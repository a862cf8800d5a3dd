use std::sync::Arc;

use async_trait::async_trait;
use domain::{BuyerAndPaymentMethodVerifiedDomainEvent, OrderRepository};
use event_bus::EventHandler;

use crate::error::OrderingError;

/// Links a verified buyer and payment method to their order.
pub struct UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler {
    orders: Arc<dyn OrderRepository>,
}

impl UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl EventHandler for UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler {
    type Event = BuyerAndPaymentMethodVerifiedDomainEvent;
    type Error = OrderingError;

    fn name(&self) -> &'static str {
        "UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler"
    }

    #[tracing::instrument(skip(self, event), fields(order_id = %event.order_id, buyer_id = %event.buyer_id))]
    async fn handle(
        &self,
        event: &BuyerAndPaymentMethodVerifiedDomainEvent,
    ) -> Result<(), OrderingError> {
        let mut order = self
            .orders
            .get(event.order_id)
            .await?
            .ok_or(OrderingError::OrderNotFound(event.order_id))?;

        order.set_buyer_id(event.buyer_id);
        order.set_payment_method_id(event.payment_method_id);

        self.orders.update(order).await?;
        self.orders.save_entities().await?;

        tracing::info!(
            payment_method_id = %event.payment_method_id,
            "order updated with buyer and payment method"
        );
        Ok(())
    }
}
