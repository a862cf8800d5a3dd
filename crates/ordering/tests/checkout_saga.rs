//! Integration tests for the checkout saga.
//!
//! Each test wires the ordering handlers to one event bus with in-memory
//! repositories, a request ledger and an integration event log, then
//! publishes checkout events the way the basket service would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use common::{BasketItem, CustomerBasket, EventId, Money, ProductId, RequestId};
use domain::{
    AggregateId, BuyerAndPaymentMethodVerifiedDomainEvent, BuyerRepository, PaymentMethodId,
};
use event_bus::{
    EventBus, EventBusError, EventHandler, EventState, InMemoryIntegrationEventLog,
    UserCheckoutAcceptedIntegrationEvent,
};
use futures_util::future::join_all;
use ordering::{
    CommandHandler, CreateOrderCommand, CreateOrderCommandHandler, CreateOrderCommandValidator,
    IdentifiedCommandHandler, InMemoryBuyerRepository, InMemoryOrderRepository,
    InMemoryRequestLedger, OrderStatusChangedToSubmittedIntegrationEvent, OrderingError,
    OrderingIntegrationEventService, Pipeline, RequestManager,
    UpdateOrderWhenBuyerAndPaymentMethodVerifiedDomainEventHandler,
    UserCheckoutAcceptedIntegrationEventHandler,
    ValidateOrAddBuyerAggregateWhenOrderStartedDomainEventHandler, Validator,
};

type Submitted = Arc<Mutex<Vec<OrderStatusChangedToSubmittedIntegrationEvent>>>;

struct RecordSubmitted(Submitted);

#[async_trait]
impl EventHandler for RecordSubmitted {
    type Event = OrderStatusChangedToSubmittedIntegrationEvent;
    type Error = std::convert::Infallible;

    async fn handle(
        &self,
        event: &OrderStatusChangedToSubmittedIntegrationEvent,
    ) -> Result<(), Self::Error> {
        self.0.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct Harness {
    bus: EventBus,
    orders: InMemoryOrderRepository,
    buyers: InMemoryBuyerRepository,
    log: InMemoryIntegrationEventLog,
    ledger: InMemoryRequestLedger,
    submitted: Submitted,
}

impl Harness {
    async fn new() -> Self {
        let bus = EventBus::new();
        let orders = InMemoryOrderRepository::new(bus.clone());
        let buyers = InMemoryBuyerRepository::new(bus.clone());
        let log = InMemoryIntegrationEventLog::new();
        let ledger = InMemoryRequestLedger::new();
        let submitted = Submitted::default();

        let integration = OrderingIntegrationEventService::new(bus.clone(), Arc::new(log.clone()));

        let validators: Vec<Arc<dyn Validator<CreateOrderCommand>>> =
            vec![Arc::new(CreateOrderCommandValidator)];
        let pipeline = Pipeline::<CreateOrderCommand>::new(
            Arc::new(CreateOrderCommandHandler::new(Arc::new(orders.clone()))),
            validators,
        );
        let create_order: Arc<IdentifiedCommandHandler<CreateOrderCommand>> =
            Arc::new(IdentifiedCommandHandler::new(
                RequestManager::new(Arc::new(ledger.clone())),
                Arc::new(pipeline),
            ));

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
        bus.subscribe(RecordSubmitted(Arc::clone(&submitted))).await;

        Self {
            bus,
            orders,
            buyers,
            log,
            ledger,
            submitted,
        }
    }
}

fn checkout(user_id: &str, request_id: RequestId) -> UserCheckoutAcceptedIntegrationEvent {
    let basket = CustomerBasket::new(user_id)
        .with_item(BasketItem {
            id: "1".to_string(),
            product_id: ProductId::new("1"),
            product_name: ".NET Bot Black Hoodie".to_string(),
            unit_price: Money::from_cents(1950),
            old_unit_price: Money::from_cents(1950),
            quantity: 2,
            picture_url: "1.png".to_string(),
        })
        .with_item(BasketItem {
            id: "2".to_string(),
            product_id: ProductId::new("2"),
            product_name: ".NET Black & White Mug".to_string(),
            unit_price: Money::from_cents(850),
            old_unit_price: Money::from_cents(850),
            quantity: 1,
            picture_url: "2.png".to_string(),
        });

    UserCheckoutAcceptedIntegrationEvent {
        id: EventId::new(),
        creation_date: Utc::now(),
        user_id: user_id.to_string(),
        user_name: "Jane Doe".to_string(),
        city: "Redmond".to_string(),
        street: "15703 NE 61st Ct".to_string(),
        state: "WA".to_string(),
        country: "U.S.".to_string(),
        zip_code: "98052".to_string(),
        card_number: "4012888888881881".to_string(),
        card_holder_name: "Jane Doe".to_string(),
        card_expiration: Utc.with_ymd_and_hms(2099, 12, 31, 0, 0, 0).unwrap(),
        card_security_number: "535".to_string(),
        card_type_id: 2,
        buyer: user_id.to_string(),
        request_id,
        basket,
    }
}

mod happy_path {
    use super::*;
    use domain::AggregateRoot;

    #[tokio::test]
    async fn checkout_creates_order_with_verified_buyer() {
        let h = Harness::new().await;

        h.bus.publish(&checkout("user-1", RequestId::new())).await.unwrap();

        let orders = h.orders.all().await;
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total(), Money::from_cents(4750));

        let buyer = h.buyers.find("user-1").await.unwrap().unwrap();
        assert_eq!(buyer.name(), "Jane Doe");
        assert_eq!(buyer.payment_methods().len(), 1);
        assert_eq!(order.buyer_id(), Some(buyer.id()));
        assert_eq!(order.payment_method_id(), Some(buyer.payment_methods()[0].id()));
    }

    #[tokio::test]
    async fn submitted_event_carries_buyer_name() {
        let h = Harness::new().await;

        h.bus.publish(&checkout("user-1", RequestId::new())).await.unwrap();

        let submitted = h.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].buyer_name, "Jane Doe");
        assert_eq!(submitted[0].order_status.as_str(), "submitted");
    }

    #[tokio::test]
    async fn integration_events_are_logged_as_published() {
        let h = Harness::new().await;

        h.bus.publish(&checkout("user-1", RequestId::new())).await.unwrap();

        let kinds: Vec<_> = h
            .log
            .entries()
            .await
            .into_iter()
            .map(|e| {
                assert_eq!(e.state, EventState::Published);
                e.event_kind
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "OrderStartedIntegrationEvent",
                "OrderStatusChangedToSubmittedIntegrationEvent"
            ]
        );
    }

    #[tokio::test]
    async fn returning_buyer_reuses_buyer_and_payment_method() {
        let h = Harness::new().await;

        h.bus.publish(&checkout("user-1", RequestId::new())).await.unwrap();
        h.bus.publish(&checkout("user-1", RequestId::new())).await.unwrap();

        assert_eq!(h.orders.len().await, 2);
        assert_eq!(h.buyers.len().await, 1);
        let buyer = h.buyers.find("user-1").await.unwrap().unwrap();
        assert_eq!(buyer.payment_methods().len(), 1);
        for order in h.orders.all().await {
            assert_eq!(order.buyer_id(), Some(buyer.id()));
        }
    }
}

mod idempotency {
    use super::*;

    #[tokio::test]
    async fn duplicate_checkout_creates_one_order() {
        let h = Harness::new().await;
        let request_id = RequestId::new();

        h.bus.publish(&checkout("user-1", request_id)).await.unwrap();
        h.bus.publish(&checkout("user-1", request_id)).await.unwrap();

        assert_eq!(h.orders.len().await, 1);
        assert_eq!(h.ledger.len().await, 1);
        assert_eq!(
            h.ledger.get(request_id).await.unwrap().name,
            "CreateOrderCommand"
        );
    }

    #[tokio::test]
    async fn checkout_without_request_id_creates_no_order() {
        let h = Harness::new().await;

        h.bus.publish(&checkout("user-1", RequestId::nil())).await.unwrap();

        assert!(h.orders.is_empty().await);
        assert!(h.ledger.is_empty().await);
        // The order start is still announced.
        assert_eq!(h.log.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_requests_with_same_id_record_once() {
        let ledger = InMemoryRequestLedger::new();
        let manager = RequestManager::new(Arc::new(ledger.clone()));
        let id = RequestId::new();

        let results = join_all(
            (0..16).map(|_| manager.create_request_for_command::<CreateOrderCommand>(id)),
        )
        .await;

        let recorded = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(OrderingError::DuplicateRequest(_))))
            .count();
        assert_eq!(recorded, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(ledger.len().await, 1);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn invalid_checkout_surfaces_validation_error() {
        let h = Harness::new().await;
        let mut event = checkout("user-1", RequestId::new());
        event.basket.items.clear();
        event.city = String::new();

        let err = h.bus.publish(&event).await.unwrap_err();

        let EventBusError::Handler { handler, source, .. } = err else {
            panic!("expected a handler error");
        };
        assert_eq!(handler, "UserCheckoutAcceptedIntegrationEventHandler");
        match source.downcast_ref::<OrderingError>() {
            Some(OrderingError::Validation { command, failures }) => {
                assert_eq!(*command, "CreateOrderCommand");
                let fields: Vec<_> = failures.iter().map(|f| f.field).collect();
                assert_eq!(fields, ["city", "order_items"]);
            }
            other => panic!("unexpected source: {other:?}"),
        }
        assert!(h.orders.is_empty().await);
    }

    #[tokio::test]
    async fn rejected_checkout_can_be_resubmitted_with_same_request_id() {
        let h = Harness::new().await;
        let request_id = RequestId::new();
        let mut invalid = checkout("user-1", request_id);
        invalid.basket.items.clear();

        assert!(h.bus.publish(&invalid).await.is_err());
        assert!(h.ledger.is_empty().await);

        h.bus.publish(&checkout("user-1", request_id)).await.unwrap();

        assert_eq!(h.orders.len().await, 1);
        assert!(h.ledger.get(request_id).await.is_some());
    }

    #[derive(Default)]
    struct CountingHandler(AtomicUsize);

    #[async_trait]
    impl CommandHandler<CreateOrderCommand> for CountingHandler {
        async fn handle(&self, _command: CreateOrderCommand) -> ordering::Result<bool> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    #[tokio::test]
    async fn validation_failures_stop_the_command_before_its_handler() {
        let inner = Arc::new(CountingHandler::default());
        let validators: Vec<Arc<dyn Validator<CreateOrderCommand>>> =
            vec![Arc::new(CreateOrderCommandValidator)];
        let pipeline = Pipeline::<CreateOrderCommand>::new(inner.clone(), validators);

        let mut command = CreateOrderCommand::from(&checkout("user-1", RequestId::new()));
        command.card_number = "12345678".to_string();
        command.order_items.clear();

        let err = pipeline.handle(command).await.unwrap_err();

        let OrderingError::Validation { failures, .. } = err else {
            panic!("expected a validation error, got {err:?}");
        };
        let fields: Vec<_> = failures.iter().map(|f| f.field).collect();
        assert!(failures.len() >= 2);
        assert!(fields.contains(&"card_number"));
        assert!(fields.contains(&"order_items"));
        assert_eq!(inner.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn verified_event_for_unknown_order_fails() {
        let h = Harness::new().await;
        let order_id = AggregateId::new();

        let err = h
            .bus
            .publish(&BuyerAndPaymentMethodVerifiedDomainEvent {
                buyer_id: AggregateId::new(),
                buyer_identity: "user-1".to_string(),
                buyer_name: "Jane Doe".to_string(),
                payment_method_id: PaymentMethodId::new(),
                order_id,
            })
            .await
            .unwrap_err();

        let EventBusError::Handler { source, .. } = err else {
            panic!("expected a handler error");
        };
        assert!(matches!(
            source.downcast_ref::<OrderingError>(),
            Some(OrderingError::OrderNotFound(id)) if *id == order_id
        ));
    }

    #[tokio::test]
    async fn create_order_handler_rejects_invalid_lines() {
        let h = Harness::new().await;
        let mut command = CreateOrderCommand::from(&checkout("user-1", RequestId::new()));
        command.order_items[0].units = 0;

        let handler = CreateOrderCommandHandler::new(Arc::new(h.orders.clone()));
        let err = handler.handle(command).await.unwrap_err();

        assert!(matches!(err, OrderingError::Domain(_)));
        assert!(h.orders.is_empty().await);
    }
}
