//! Command handlers.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{Address, AggregateRoot, CardDetails, Order, OrderItem, OrderRepository};

use crate::command::CommandHandler;
use crate::commands::CreateOrderCommand;
use crate::error::Result;

/// Builds an order from a checkout and commits it.
///
/// Committing dispatches the order's started event, which drives buyer
/// verification before this handler returns.
pub struct CreateOrderCommandHandler {
    orders: Arc<dyn OrderRepository>,
}

impl CreateOrderCommandHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl CommandHandler<CreateOrderCommand> for CreateOrderCommandHandler {
    async fn handle(&self, command: CreateOrderCommand) -> Result<bool> {
        let address = Address::new(
            command.street,
            command.city,
            command.state,
            command.country,
            command.zip_code,
        );
        let card = CardDetails {
            number: command.card_number,
            security_number: command.card_security_number,
            holder_name: command.card_holder_name,
            expiration: command.card_expiration,
        };

        let mut order = Order::new(
            command.user_id,
            command.user_name,
            address,
            command.card_type_id,
            card,
        );

        for item in command.order_items {
            order.add_order_item(OrderItem::new(
                item.product_id,
                item.product_name,
                item.unit_price,
                item.discount,
                item.picture_url,
                item.units,
            )?)?;
        }

        let order = self.orders.add(order).await?;
        tracing::info!(order_id = %order.id(), items = order.items().len(), total = %order.total(), "order created");

        Ok(self.orders.save_entities().await?)
    }
}
