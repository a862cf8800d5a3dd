//! Basket repository trait and the in-memory adapter.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerBasket;
use tokio::sync::RwLock;

use crate::{BasketError, Result};

/// Storage for customer baskets, keyed by buyer id.
#[async_trait]
pub trait BasketRepository: Send + Sync {
    /// Returns the customer's basket, or an empty one if nothing is stored.
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket>;

    /// Returns the ids of every customer with a stored basket.
    async fn users(&self) -> Result<Vec<String>>;

    /// Replaces the stored basket for `basket.buyer_id` and returns it.
    async fn update(&self, basket: CustomerBasket) -> Result<CustomerBasket>;

    /// Deletes a basket. Returns false if there was none.
    async fn delete(&self, customer_id: &str) -> Result<bool>;
}

/// In-memory basket repository.
#[derive(Clone, Default)]
pub struct InMemoryBasketRepository {
    baskets: Arc<RwLock<HashMap<String, CustomerBasket>>>,
}

impl InMemoryBasketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a basket is stored for the customer.
    pub async fn contains(&self, customer_id: &str) -> bool {
        self.baskets.read().await.contains_key(customer_id)
    }

    pub async fn len(&self) -> usize {
        self.baskets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.baskets.read().await.is_empty()
    }
}

#[async_trait]
impl BasketRepository for InMemoryBasketRepository {
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket> {
        let baskets = self.baskets.read().await;
        Ok(baskets
            .get(customer_id)
            .cloned()
            .unwrap_or_else(|| CustomerBasket::new(customer_id)))
    }

    async fn users(&self) -> Result<Vec<String>> {
        let mut users: Vec<_> = self.baskets.read().await.keys().cloned().collect();
        users.sort();
        Ok(users)
    }

    async fn update(&self, basket: CustomerBasket) -> Result<CustomerBasket> {
        if basket.buyer_id.is_empty() {
            return Err(BasketError::BuyerIdRequired);
        }

        tracing::debug!(buyer_id = %basket.buyer_id, items = basket.items.len(), "basket updated");
        self.baskets
            .write()
            .await
            .insert(basket.buyer_id.clone(), basket.clone());
        Ok(basket)
    }

    async fn delete(&self, customer_id: &str) -> Result<bool> {
        Ok(self.baskets.write().await.remove(customer_id).is_some())
    }
}
