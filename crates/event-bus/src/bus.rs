//! The event bus registry and delivery loop.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::handler::{Erased, ErasedHandler};
use crate::{DynEvent, Event, EventBusError, EventHandler, EventKind, Result};

/// How `publish` reacts to a failing handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Stop at the first failing handler and return its error. Handlers
    /// subscribed after it are not invoked for this publish call.
    #[default]
    Strict,

    /// Invoke every matching handler and report all failures together.
    BestEffort,
}

impl DeliveryMode {
    /// Returns the configuration name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Strict => "strict",
            DeliveryMode::BestEffort => "best-effort",
        }
    }
}

struct Subscription {
    kind: EventKind,
    handler: Arc<dyn ErasedHandler>,
}

/// In-process publish/subscribe registry.
///
/// Cloning the bus yields another handle to the same registry. Delivery is
/// sequential and follows subscription order. There is no retry, no
/// persistence and no unsubscribe: an event published before a handler
/// subscribes is never seen by that handler.
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
    mode: DeliveryMode,
}

impl EventBus {
    /// Creates a bus with strict delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus with the given delivery mode.
    pub fn with_delivery_mode(mode: DeliveryMode) -> Self {
        Self {
            subscriptions: Arc::default(),
            mode,
        }
    }

    /// Returns the delivery mode.
    pub fn delivery_mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Registers a handler for its declared event type.
    pub async fn subscribe<H: EventHandler>(&self, handler: H) {
        let kind = <H::Event as Event>::KIND;
        tracing::debug!(%kind, handler = handler.name(), "handler subscribed");

        self.subscriptions.write().await.push(Subscription {
            kind,
            handler: Arc::new(Erased(handler)),
        });
    }

    /// Publishes an event to every handler subscribed to its kind.
    pub async fn publish<E: Event>(&self, event: &E) -> Result<()> {
        self.publish_dyn(event).await
    }

    /// Publishes an event whose concrete type has been erased.
    #[tracing::instrument(skip(self, event), fields(kind = %event.kind()))]
    pub async fn publish_dyn(&self, event: &dyn DynEvent) -> Result<()> {
        let kind = event.kind();

        // Snapshot the matching handlers so none of them runs under the lock.
        let handlers: Vec<Arc<dyn ErasedHandler>> = self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        metrics::counter!("event_bus_published_total", "kind" => kind.name()).increment(1);

        if handlers.is_empty() {
            tracing::debug!("no handlers subscribed");
            return Ok(());
        }

        let mut failures = Vec::new();
        for handler in handlers {
            tracing::debug!(handler = handler.name(), "delivering event");
            if let Err(err) = handler.handle(event).await {
                metrics::counter!("event_bus_handler_failures_total", "kind" => kind.name())
                    .increment(1);
                tracing::warn!(handler = handler.name(), error = %err, "event handler failed");

                match self.mode {
                    DeliveryMode::Strict => return Err(err),
                    DeliveryMode::BestEffort => failures.push(err),
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EventBusError::DeliveryFailed { kind, failures })
        }
    }

    /// Returns the total number of subscriptions.
    pub async fn subscription_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Returns the names of the handlers subscribed to a kind, in delivery order.
    pub async fn handlers_for(&self, kind: EventKind) -> Vec<&'static str> {
        self.subscriptions
            .read()
            .await
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.handler.name())
            .collect()
    }
}
