//! Integration event handlers of the basket service.

use std::sync::Arc;

use async_trait::async_trait;
use event_bus::{EventHandler, OrderStartedIntegrationEvent};

use crate::{BasketError, BasketRepository};

/// Deletes the customer's basket once ordering has started the order.
pub struct OrderStartedIntegrationEventHandler {
    baskets: Arc<dyn BasketRepository>,
}

impl OrderStartedIntegrationEventHandler {
    pub fn new(baskets: Arc<dyn BasketRepository>) -> Self {
        Self { baskets }
    }
}

#[async_trait]
impl EventHandler for OrderStartedIntegrationEventHandler {
    type Event = OrderStartedIntegrationEvent;
    type Error = BasketError;

    fn name(&self) -> &'static str {
        "OrderStartedIntegrationEventHandler"
    }

    #[tracing::instrument(skip(self, event), fields(user_id = %event.user_id, event_id = %event.id))]
    async fn handle(&self, event: &OrderStartedIntegrationEvent) -> Result<(), BasketError> {
        if self.baskets.delete(&event.user_id).await? {
            metrics::counter!("baskets_deleted_total").increment(1);
            tracing::info!("basket deleted");
        } else {
            tracing::debug!("no basket to delete");
        }
        Ok(())
    }
}
