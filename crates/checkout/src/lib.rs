//! Checkout application: the basket and ordering services sharing one
//! in-process event bus.
//!
//! [`CheckoutApp`] subscribes every saga handler in the order the checkout
//! flow needs them and exposes the basket-side entry point,
//! [`CheckoutApp::checkout`], which turns a stored basket into a
//! `UserCheckoutAcceptedIntegrationEvent`.

pub mod config;
pub mod error;

use std::sync::Arc;

use basket::{BasketRepository, InMemoryBasketRepository, OrderStartedIntegrationEventHandler};
use chrono::Utc;
use common::{EventId, RequestId};
use domain::{Address, CardDetails, CardType};
use event_bus::{
    DeliveryMode, EventBus, InMemoryIntegrationEventLog, IntegrationEventLog,
    PostgresIntegrationEventLog, UserCheckoutAcceptedIntegrationEvent,
};
use ordering::{
    CreateOrderCommand, CreateOrderCommandHandler, CreateOrderCommandValidator,
    IdentifiedCommandHandler, InMemoryBuyerRepository, InMemoryOrderRepository,
    InMemoryRequestLedger, OrderingIntegrationEventService, Pipeline, PostgresRequestLedger,
    RequestLedger, RequestManager, UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler,
    UserCheckoutAcceptedIntegrationEventHandler,
    ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler, Validator,
};

pub use config::{Config, ConfigError, LogFormat};
pub use error::{CheckoutError, Result};

/// Storage behind the request ledger and the integration event log.
#[derive(Clone)]
pub struct Backends {
    pub ledger: Arc<dyn RequestLedger>,
    pub event_log: Arc<dyn IntegrationEventLog>,
}

impl Backends {
    /// Keeps requests and logged events in memory.
    pub fn in_memory() -> Self {
        Self {
            ledger: Arc::new(InMemoryRequestLedger::new()),
            event_log: Arc::new(InMemoryIntegrationEventLog::new()),
        }
    }

    /// Connects to PostgreSQL and applies pending migrations.
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let event_log = PostgresIntegrationEventLog::new(pool.clone());
        event_log.run_migrations().await?;

        Ok(Self {
            ledger: Arc::new(PostgresRequestLedger::new(pool)),
            event_log: Arc::new(event_log),
        })
    }

    /// Picks PostgreSQL when a database URL is configured.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match &config.database_url {
            Some(url) => {
                tracing::info!("using PostgreSQL request ledger and integration event log");
                Self::postgres(url).await
            }
            None => {
                tracing::info!("using in-memory request ledger and integration event log");
                Ok(Self::in_memory())
            }
        }
    }
}

/// What the customer submits at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub user_name: String,
    pub address: Address,
    pub card_type: CardType,
    pub card: CardDetails,
}

/// Basket and ordering services wired to one bus.
pub struct CheckoutApp {
    bus: EventBus,
    baskets: InMemoryBasketRepository,
    orders: InMemoryOrderRepository,
    buyers: InMemoryBuyerRepository,
    integration: OrderingIntegrationEventService,
}

impl CheckoutApp {
    /// Builds the services and subscribes their handlers.
    pub async fn new(mode: DeliveryMode, backends: Backends) -> Self {
        let bus = EventBus::with_delivery_mode(mode);
        let baskets = InMemoryBasketRepository::new();
        let orders = InMemoryOrderRepository::new(bus.clone());
        let buyers = InMemoryBuyerRepository::new(bus.clone());
        let integration = OrderingIntegrationEventService::new(bus.clone(), backends.event_log);

        let validators: Vec<Arc<dyn Validator<CreateOrderCommand>>> =
            vec![Arc::new(CreateOrderCommandValidator)];
        let pipeline = Pipeline::<CreateOrderCommand>::new(
            Arc::new(CreateOrderCommandHandler::new(Arc::new(orders.clone()))),
            validators,
        );
        let create_order: Arc<IdentifiedCommandHandler<CreateOrderCommand>> =
            Arc::new(IdentifiedCommandHandler::new(
                RequestManager::new(backends.ledger),
                Arc::new(pipeline),
            ));

        bus.subscribe(OrderStartedIntegrationEventHandler::new(Arc::new(
            baskets.clone(),
        )))
        .await;
        bus.subscribe(UserCheckoutAcceptedIntegrationEventHandler::new(
            integration.clone(),
            create_order,
        ))
        .await;
        bus.subscribe(
            ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler::new(
                Arc::new(buyers.clone()),
                integration.clone(),
            ),
        )
        .await;
        bus.subscribe(
            UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler::new(Arc::new(
                orders.clone(),
            )),
        )
        .await;

        tracing::info!(
            delivery_mode = mode.as_str(),
            subscriptions = bus.subscription_count().await,
            "checkout services wired"
        );

        Self {
            bus,
            baskets,
            orders,
            buyers,
            integration,
        }
    }

    /// Builds the app from configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let backends = Backends::from_config(config).await?;
        Ok(Self::new(config.delivery_mode, backends).await)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn baskets(&self) -> &InMemoryBasketRepository {
        &self.baskets
    }

    pub fn orders(&self) -> &InMemoryOrderRepository {
        &self.orders
    }

    pub fn buyers(&self) -> &InMemoryBuyerRepository {
        &self.buyers
    }

    pub fn integration(&self) -> &OrderingIntegrationEventService {
        &self.integration
    }

    /// Checks out the customer's stored basket.
    ///
    /// Publishes a `UserCheckoutAcceptedIntegrationEvent` under a fresh
    /// request id and returns that id once every handler has run.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<RequestId> {
        let basket = self.baskets.get(&request.user_id).await?;
        if basket.is_empty() {
            return Err(CheckoutError::EmptyBasket(request.user_id));
        }

        let request_id = RequestId::new();
        let event = UserCheckoutAcceptedIntegrationEvent {
            id: EventId::new(),
            creation_date: Utc::now(),
            buyer: request.user_id.clone(),
            user_id: request.user_id,
            user_name: request.user_name,
            city: request.address.city,
            street: request.address.street,
            state: request.address.state,
            country: request.address.country,
            zip_code: request.address.zip_code,
            card_number: request.card.number,
            card_holder_name: request.card.holder_name,
            card_expiration: request.card.expiration,
            card_security_number: request.card.security_number,
            card_type_id: request.card_type.id(),
            request_id,
            basket,
        };

        tracing::info!(%request_id, "basket checked out, sending checkout accepted event");
        self.bus.publish(&event).await?;
        metrics::counter!("checkouts_total").increment(1);

        Ok(request_id)
    }
}
