//! Commands handled by the ordering service.

use chrono::{DateTime, Utc};
use common::{BasketItem, Money, ProductId};
use event_bus::UserCheckoutAcceptedIntegrationEvent;
use serde::{Deserialize, Serialize};

use crate::command::{Command, IdempotentCommand};

/// An order line as submitted with a create-order command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDto {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub discount: Money,
    pub units: u32,
    pub picture_url: String,
}

impl From<&BasketItem> for OrderItemDto {
    fn from(item: &BasketItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            unit_price: item.unit_price,
            discount: Money::zero(),
            units: item.quantity,
            picture_url: item.picture_url.clone(),
        }
    }
}

/// Creates an order from a customer's checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    pub order_items: Vec<OrderItemDto>,
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
}

impl Command for CreateOrderCommand {
    type Output = bool;

    const NAME: &'static str = "CreateOrderCommand";
}

impl IdempotentCommand for CreateOrderCommand {
    /// A repeated checkout is reported as a success; the order already exists.
    fn duplicate_result() -> bool {
        true
    }
}

impl From<&UserCheckoutAcceptedIntegrationEvent> for CreateOrderCommand {
    fn from(event: &UserCheckoutAcceptedIntegrationEvent) -> Self {
        Self {
            order_items: event.basket.items.iter().map(OrderItemDto::from).collect(),
            user_id: event.user_id.clone(),
            user_name: event.user_name.clone(),
            city: event.city.clone(),
            street: event.street.clone(),
            state: event.state.clone(),
            country: event.country.clone(),
            zip_code: event.zip_code.clone(),
            card_number: event.card_number.clone(),
            card_holder_name: event.card_holder_name.clone(),
            card_expiration: event.card_expiration,
            card_security_number: event.card_security_number.clone(),
            card_type_id: event.card_type_id,
        }
    }
}
