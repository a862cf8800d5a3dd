use chrono::{DateTime, Utc};
use common::PaymentMethodId;
use serde::{Deserialize, Serialize};

use super::BuyerError;

/// Card brand of a payment method.
///
/// Numeric ids are the ones carried by checkout events. `Amex` is used when
/// a checkout does not name a card type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    #[default]
    Amex = 1,
    Visa = 2,
    MasterCard = 3,
}

impl CardType {
    /// Returns the numeric card type id.
    pub fn id(&self) -> i32 {
        *self as i32
    }

    /// Resolves a numeric card type id.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(CardType::Amex),
            2 => Some(CardType::Visa),
            3 => Some(CardType::MasterCard),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardType::Amex => "Amex",
            CardType::Visa => "Visa",
            CardType::MasterCard => "MasterCard",
        }
    }
}

/// Card data as submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub security_number: String,
    pub holder_name: String,
    pub expiration: DateTime<Utc>,
}

/// A verified card owned by a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    id: PaymentMethodId,
    card_type: CardType,
    alias: String,
    card_number: String,
    security_number: String,
    card_holder_name: String,
    expiration: DateTime<Utc>,
}

impl PaymentMethod {
    /// Creates a payment method, rejecting blank card data and expired cards.
    pub fn new(
        card_type: CardType,
        alias: impl Into<String>,
        card: &CardDetails,
    ) -> Result<Self, BuyerError> {
        if card.number.trim().is_empty() {
            return Err(BuyerError::CardNumberRequired);
        }
        if card.security_number.trim().is_empty() {
            return Err(BuyerError::SecurityNumberRequired);
        }
        if card.holder_name.trim().is_empty() {
            return Err(BuyerError::CardHolderNameRequired);
        }
        if card.expiration < Utc::now() {
            return Err(BuyerError::CardExpired {
                expiration: card.expiration,
            });
        }

        Ok(Self {
            id: PaymentMethodId::new(),
            card_type,
            alias: alias.into(),
            card_number: card.number.clone(),
            security_number: card.security_number.clone(),
            card_holder_name: card.holder_name.clone(),
            expiration: card.expiration,
        })
    }

    pub fn id(&self) -> PaymentMethodId {
        self.id
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn card_holder_name(&self) -> &str {
        &self.card_holder_name
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    /// Returns true if this method is the given card.
    ///
    /// Security number, holder name and alias are not part of a payment
    /// method's identity.
    pub fn is_equal_to(
        &self,
        card_type: CardType,
        card_number: &str,
        expiration: DateTime<Utc>,
    ) -> bool {
        self.card_type == card_type
            && self.card_number == card_number
            && self.expiration == expiration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn card() -> CardDetails {
        CardDetails {
            number: "4111111111111111".to_string(),
            security_number: "123".to_string(),
            holder_name: "A B".to_string(),
            expiration: Utc::now() + Duration::days(365),
        }
    }

    #[test]
    fn card_type_ids() {
        assert_eq!(CardType::from_id(2), Some(CardType::Visa));
        assert_eq!(CardType::from_id(0), None);
        assert_eq!(CardType::MasterCard.id(), 3);
        assert_eq!(CardType::default(), CardType::Amex);
    }

    #[test]
    fn blank_card_data_is_rejected() {
        let mut c = card();
        c.number = " ".to_string();
        assert!(matches!(
            PaymentMethod::new(CardType::Visa, "x", &c),
            Err(BuyerError::CardNumberRequired)
        ));

        let mut c = card();
        c.security_number = String::new();
        assert!(matches!(
            PaymentMethod::new(CardType::Visa, "x", &c),
            Err(BuyerError::SecurityNumberRequired)
        ));

        let mut c = card();
        c.holder_name = String::new();
        assert!(matches!(
            PaymentMethod::new(CardType::Visa, "x", &c),
            Err(BuyerError::CardHolderNameRequired)
        ));
    }

    #[test]
    fn expired_card_is_rejected() {
        let mut c = card();
        c.expiration = Utc::now() - Duration::days(1);
        assert!(matches!(
            PaymentMethod::new(CardType::Visa, "x", &c),
            Err(BuyerError::CardExpired { .. })
        ));
    }

    #[test]
    fn equality_ignores_security_number_and_alias() {
        let c = card();
        let method = PaymentMethod::new(CardType::Visa, "work", &c).unwrap();

        assert!(method.is_equal_to(CardType::Visa, &c.number, c.expiration));
        assert!(!method.is_equal_to(CardType::Amex, &c.number, c.expiration));
        assert!(!method.is_equal_to(CardType::Visa, "5500000000000004", c.expiration));
    }
}
