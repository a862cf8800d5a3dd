//! In-memory repositories that dispatch domain events on commit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{
    AggregateRoot, Buyer, BuyerRepository, DomainEvent, Order, OrderRepository, RepositoryError,
    RepositoryResult, UnitOfWork,
};
use event_bus::EventBus;
use tokio::sync::RwLock;

struct Store<A> {
    entities: HashMap<AggregateId, A>,
    staged: Vec<AggregateId>,
}

impl<A> Default for Store<A> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            staged: Vec::new(),
        }
    }
}

/// In-memory repository for one aggregate type.
///
/// `add` and `update` stage the aggregate. `save_entities` drains the
/// ledgers of the staged aggregates under the lock, releases it, and then
/// publishes the drained events in order, so handlers triggered by the
/// commit may use this repository again.
pub struct InMemoryRepository<A: AggregateRoot> {
    store: Arc<RwLock<Store<A>>>,
    bus: EventBus,
}

impl<A: AggregateRoot> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bus: self.bus.clone(),
        }
    }
}

/// In-memory order repository.
pub type InMemoryOrderRepository = InMemoryRepository<Order>;

/// In-memory buyer repository.
pub type InMemoryBuyerRepository = InMemoryRepository<Buyer>;

impl<A: AggregateRoot> InMemoryRepository<A> {
    /// Creates an empty repository publishing to `bus`.
    pub fn new(bus: EventBus) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            bus,
        }
    }

    /// Returns the number of stored aggregates.
    pub async fn len(&self) -> usize {
        self.store.read().await.entities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entities.is_empty()
    }

    /// Returns a copy of every stored aggregate.
    pub async fn all(&self) -> Vec<A> {
        self.store.read().await.entities.values().cloned().collect()
    }

    async fn stage_new(&self, aggregate: A) -> RepositoryResult<A> {
        let id = aggregate.id();
        let mut store = self.store.write().await;
        if store.entities.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists {
                aggregate_type: A::aggregate_type(),
                id: id.to_string(),
            });
        }

        tracing::debug!(aggregate_type = A::aggregate_type(), %id, "adding aggregate");
        store.entities.insert(id, aggregate.clone());
        store.staged.push(id);
        Ok(aggregate)
    }

    async fn stage_existing(&self, aggregate: A) -> RepositoryResult<A> {
        let id = aggregate.id();
        let mut store = self.store.write().await;
        if !store.entities.contains_key(&id) {
            return Err(RepositoryError::NotFound {
                aggregate_type: A::aggregate_type(),
                id: id.to_string(),
            });
        }

        tracing::debug!(aggregate_type = A::aggregate_type(), %id, "updating aggregate");
        store.entities.insert(id, aggregate.clone());
        store.staged.push(id);
        Ok(aggregate)
    }

    async fn load(&self, id: AggregateId) -> Option<A> {
        self.store.read().await.entities.get(&id).cloned()
    }
}

#[async_trait]
impl<A: AggregateRoot> UnitOfWork for InMemoryRepository<A> {
    async fn save_entities(&self) -> RepositoryResult<bool> {
        let mut events: Vec<A::Event> = Vec::new();
        {
            let mut store = self.store.write().await;
            let staged = std::mem::take(&mut store.staged);
            for id in staged {
                if let Some(aggregate) = store.entities.get_mut(&id) {
                    events.extend(aggregate.take_domain_events());
                }
            }
        }

        tracing::debug!(
            aggregate_type = A::aggregate_type(),
            events = events.len(),
            "committing and dispatching domain events"
        );

        for event in &events {
            self.bus.publish_dyn(event.as_dyn()).await?;
        }

        Ok(true)
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository<Order> {
    async fn add(&self, order: Order) -> RepositoryResult<Order> {
        self.stage_new(order).await
    }

    async fn update(&self, order: Order) -> RepositoryResult<()> {
        self.stage_existing(order).await.map(|_| ())
    }

    async fn get(&self, order_id: AggregateId) -> RepositoryResult<Option<Order>> {
        Ok(self.load(order_id).await)
    }
}

#[async_trait]
impl BuyerRepository for InMemoryRepository<Buyer> {
    async fn find(&self, identity: &str) -> RepositoryResult<Option<Buyer>> {
        let store = self.store.read().await;
        Ok(store
            .entities
            .values()
            .find(|buyer| buyer.identity() == identity)
            .cloned())
    }

    async fn add(&self, buyer: Buyer) -> RepositoryResult<Buyer> {
        self.stage_new(buyer).await
    }

    async fn update(&self, buyer: Buyer) -> RepositoryResult<Buyer> {
        self.stage_existing(buyer).await
    }
}
