use std::sync::Arc;

use async_trait::async_trait;
use event_bus::{
    EventHandler, IntegrationEvent, OrderStartedIntegrationEvent,
    UserCheckoutAcceptedIntegrationEvent,
};

use crate::command::{CommandOutcome, IdentifiedCommand};
use crate::commands::CreateOrderCommand;
use crate::error::OrderingError;
use crate::idempotency::IdentifiedCommandHandler;

use super::OrderingIntegrationEventService;

/// Starts an order for every accepted checkout.
///
/// Announces the order start first, then dispatches a create-order command
/// identified by the checkout's request id. A checkout without a request id
/// cannot be deduplicated and creates no order.
pub struct UserCheckoutAcceptedIntegrationEventHandler {
    integration_events: OrderingIntegrationEventService,
    create_order: Arc<IdentifiedCommandHandler<CreateOrderCommand>>,
}

impl UserCheckoutAcceptedIntegrationEventHandler {
    pub fn new(
        integration_events: OrderingIntegrationEventService,
        create_order: Arc<IdentifiedCommandHandler<CreateOrderCommand>>,
    ) -> Self {
        Self {
            integration_events,
            create_order,
        }
    }
}

#[async_trait]
impl EventHandler for UserCheckoutAcceptedIntegrationEventHandler {
    type Event = UserCheckoutAcceptedIntegrationEvent;
    type Error = OrderingError;

    fn name(&self) -> &'static str {
        "UserCheckoutAcceptedIntegrationEventHandler"
    }

    #[tracing::instrument(
        skip(self, event),
        fields(event_id = %event.id(), user_id = %event.user_id, request_id = %event.request_id)
    )]
    async fn handle(&self, event: &UserCheckoutAcceptedIntegrationEvent) -> Result<(), OrderingError> {
        self.integration_events
            .publish_through_event_bus(&OrderStartedIntegrationEvent::new(&event.user_id))
            .await?;

        if event.request_id.is_nil() {
            tracing::warn!("checkout has no request id, no order created");
            return Ok(());
        }

        let command = IdentifiedCommand::new(CreateOrderCommand::from(event), event.request_id);
        match self.create_order.dispatch(command).await {
            Ok(CommandOutcome::Executed(created)) => {
                tracing::info!(created, "create order command executed");
                Ok(())
            }
            Ok(CommandOutcome::Duplicate(_)) => {
                tracing::info!("checkout already processed");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "create order command failed");
                Err(err)
            }
        }
    }
}
