//! In-process publish/subscribe for domain and integration events.
//!
//! The bus is an explicitly constructed, cloneable handle. Handlers declare
//! the single event type they process; the event kind is resolved when the
//! handler subscribes, and `publish` delivers to matching handlers in
//! subscription order, one at a time.

pub mod bus;
pub mod error;
pub mod event;
pub mod handler;
pub mod integration;
pub mod log;
pub mod memory;
pub mod postgres;

pub use bus::{DeliveryMode, EventBus};
pub use common::EventId;
pub use error::{BoxError, EventBusError, Result};
pub use event::{DynEvent, Event, EventFamily, EventKind};
pub use handler::EventHandler;
pub use integration::{
    IntegrationEvent, OrderStartedIntegrationEvent, UserCheckoutAcceptedIntegrationEvent,
};
pub use log::{EventState, IntegrationEventLog, IntegrationEventLogEntry};
pub use memory::InMemoryIntegrationEventLog;
pub use postgres::PostgresIntegrationEventLog;
