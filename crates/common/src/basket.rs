//! Basket contents as they travel between the basket and ordering services.

use serde::{Deserialize, Serialize};

use crate::{Money, ProductId};

/// One product line in a customer's basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    pub id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub old_unit_price: Money,
    pub quantity: u32,
    pub picture_url: String,
}

/// A customer's shopping basket, keyed by buyer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBasket {
    pub buyer_id: String,
    pub items: Vec<BasketItem>,
}

impl CustomerBasket {
    /// Creates an empty basket for a customer.
    pub fn new(buyer_id: impl Into<String>) -> Self {
        Self {
            buyer_id: buyer_id.into(),
            items: Vec::new(),
        }
    }

    /// Appends an item and returns the basket.
    pub fn with_item(mut self, item: BasketItem) -> Self {
        self.items.push(item);
        self
    }

    /// Returns true if the basket holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_basket_is_empty() {
        let basket = CustomerBasket::new("1");
        assert_eq!(basket.buyer_id, "1");
        assert!(basket.is_empty());
    }

    #[test]
    fn with_item_appends_in_order() {
        let item = |id: &str| BasketItem {
            id: id.to_string(),
            product_id: ProductId::new(id),
            product_name: "Jacket".to_string(),
            unit_price: Money::from_cents(100),
            old_unit_price: Money::from_cents(100),
            quantity: 1,
            picture_url: "1.jpg".to_string(),
        };

        let basket = CustomerBasket::new("1").with_item(item("a")).with_item(item("b"));

        let ids: Vec<_> = basket.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
