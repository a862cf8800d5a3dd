//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AggregateId, Money, PaymentMethodId};

use crate::aggregate::{AggregateRoot, DomainEvents};
use crate::buyer::CardDetails;

use super::{Address, OrderError, OrderEvent, OrderItem, OrderStartedDomainEvent, OrderStatus};

/// Order aggregate root.
///
/// Buyer and payment method references stay empty until the buyer has been
/// verified for this order.
#[derive(Debug, Clone)]
pub struct Order {
    id: AggregateId,
    buyer_id: Option<AggregateId>,
    payment_method_id: Option<PaymentMethodId>,
    address: Address,
    items: Vec<OrderItem>,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    description: Option<String>,
    events: DomainEvents<OrderEvent>,
}

impl AggregateRoot for Order {
    type Event = OrderEvent;

    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn domain_events(&self) -> &DomainEvents<OrderEvent> {
        &self.events
    }

    fn take_domain_events(&mut self) -> Vec<OrderEvent> {
        self.events.take()
    }
}

// Query methods
impl Order {
    pub fn buyer_id(&self) -> Option<AggregateId> {
        self.buyer_id
    }

    pub fn payment_method_id(&self) -> Option<PaymentMethodId> {
        self.payment_method_id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Returns the order lines in the order they were first added.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the sum of unit price times units over all lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }
}

// Behavior methods
impl Order {
    /// Creates a submitted order and records an [`OrderStartedDomainEvent`].
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        address: Address,
        card_type_id: i32,
        card: CardDetails,
    ) -> Self {
        let mut order = Self {
            id: AggregateId::new(),
            buyer_id: None,
            payment_method_id: None,
            address,
            items: Vec::new(),
            status: OrderStatus::Submitted,
            order_date: Utc::now(),
            description: None,
            events: DomainEvents::default(),
        };

        order
            .events
            .record(OrderEvent::Started(OrderStartedDomainEvent {
                order_id: order.id,
                order_status: order.status,
                user_id: user_id.into(),
                user_name: user_name.into(),
                card_type_id,
                card,
            }));

        order
    }

    /// Adds a line, merging it into an existing line for the same product.
    ///
    /// A merged line keeps the larger of the two discounts and sums units.
    /// Fails with [`OrderError::AmountOverflow`] and leaves the order
    /// unchanged if the line or order total would overflow.
    pub fn add_order_item(&mut self, item: OrderItem) -> Result<(), OrderError> {
        let current_total = self.total();
        let existing = self
            .items
            .iter_mut()
            .find(|existing| existing.product_id() == item.product_id());

        let unit_price = existing
            .as_ref()
            .map_or(item.unit_price(), |existing| existing.unit_price());
        let overflow = || OrderError::AmountOverflow {
            unit_price: unit_price.cents(),
            units: item.units(),
        };
        unit_price
            .checked_multiply(item.units())
            .and_then(|added| current_total.checked_add(added))
            .ok_or_else(overflow)?;

        match existing {
            Some(existing) => {
                existing.add_units(item.units())?;
                if item.discount() > existing.discount() {
                    existing.set_new_discount(item.discount())?;
                }
                Ok(())
            }
            None => {
                self.items.push(item);
                Ok(())
            }
        }
    }

    pub fn set_buyer_id(&mut self, buyer_id: AggregateId) {
        self.buyer_id = Some(buyer_id);
    }

    pub fn set_payment_method_id(&mut self, payment_method_id: PaymentMethodId) {
        self.payment_method_id = Some(payment_method_id);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }
}
