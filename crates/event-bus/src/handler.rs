//! Event handler trait and its type-erased form.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{DynEvent, Event, EventBusError};

/// Processes events of exactly one type.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// The event type this handler subscribes to.
    type Event: Event;

    /// The error this handler reports when it cannot process an event.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the handler name used in logs and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Handles one event, running to completion or failing.
    async fn handle(&self, event: &Self::Event) -> Result<(), Self::Error>;
}

#[async_trait]
impl<H: EventHandler> EventHandler for Arc<H> {
    type Event = H::Event;
    type Error = H::Error;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn handle(&self, event: &Self::Event) -> Result<(), Self::Error> {
        (**self).handle(event).await
    }
}

/// A handler whose event type has been resolved at subscription time.
#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &dyn DynEvent) -> Result<(), EventBusError>;
}

pub(crate) struct Erased<H>(pub(crate) H);

#[async_trait]
impl<H: EventHandler> ErasedHandler for Erased<H> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    async fn handle(&self, event: &dyn DynEvent) -> Result<(), EventBusError> {
        let kind = <H::Event as Event>::KIND;
        let typed = event.as_any().downcast_ref::<H::Event>().ok_or(
            EventBusError::KindMismatch {
                expected: kind,
                handler: self.0.name(),
            },
        )?;

        self.0
            .handle(typed)
            .await
            .map_err(|e| EventBusError::Handler {
                kind,
                handler: self.0.name(),
                source: Box::new(e),
            })
    }
}
