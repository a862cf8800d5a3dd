//! Buyer aggregate implementation.

use common::AggregateId;

use crate::aggregate::{AggregateRoot, DomainEvents};

use super::{
    BuyerAndPaymentMethodVerifiedDomainEvent, BuyerError, BuyerEvent, CardDetails, CardType,
    PaymentMethod,
};

/// Buyer aggregate root.
///
/// A buyer is identified externally by the user id of the customer and
/// owns the payment methods used for that customer's orders.
#[derive(Debug, Clone)]
pub struct Buyer {
    id: AggregateId,
    identity: String,
    name: String,
    payment_methods: Vec<PaymentMethod>,
    events: DomainEvents<BuyerEvent>,
}

impl AggregateRoot for Buyer {
    type Event = BuyerEvent;

    fn aggregate_type() -> &'static str {
        "Buyer"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn domain_events(&self) -> &DomainEvents<BuyerEvent> {
        &self.events
    }

    fn take_domain_events(&mut self) -> Vec<BuyerEvent> {
        self.events.take()
    }
}

impl Buyer {
    /// Creates a buyer with no payment methods.
    pub fn new(identity: impl Into<String>, name: impl Into<String>) -> Result<Self, BuyerError> {
        let identity = identity.into();
        let name = name.into();

        if identity.trim().is_empty() {
            return Err(BuyerError::IdentityRequired);
        }
        if name.trim().is_empty() {
            return Err(BuyerError::NameRequired);
        }

        Ok(Self {
            id: AggregateId::new(),
            identity,
            name,
            payment_methods: Vec::new(),
            events: DomainEvents::default(),
        })
    }

    /// Returns the external user id.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// Returns the payment method matching the card, adding it if the buyer
    /// does not have it yet.
    ///
    /// Either way a [`BuyerAndPaymentMethodVerifiedDomainEvent`] is recorded
    /// for `order_id`. Calling this again with the same card type, number
    /// and expiration never adds a second method.
    pub fn verify_or_add_payment_method(
        &mut self,
        card_type: CardType,
        alias: impl Into<String>,
        card: &CardDetails,
        order_id: AggregateId,
    ) -> Result<&PaymentMethod, BuyerError> {
        let existing = self
            .payment_methods
            .iter()
            .position(|p| p.is_equal_to(card_type, &card.number, card.expiration));

        let index = match existing {
            Some(index) => index,
            None => {
                let payment = PaymentMethod::new(card_type, alias, card)?;
                self.payment_methods.push(payment);
                self.payment_methods.len() - 1
            }
        };

        let payment_method_id = self.payment_methods[index].id();
        self.events.record(BuyerEvent::PaymentMethodVerified(
            BuyerAndPaymentMethodVerifiedDomainEvent {
                buyer_id: self.id,
                buyer_identity: self.identity.clone(),
                buyer_name: self.name.clone(),
                payment_method_id,
                order_id,
            },
        ));

        Ok(&self.payment_methods[index])
    }
}
