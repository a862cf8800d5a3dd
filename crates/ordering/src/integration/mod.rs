//! Integration events published by the ordering service, the service that
//! logs and publishes them, and the handler for incoming checkouts.

mod checkout;
mod events;
mod service;

pub use checkout::UserCheckoutAcceptedIntegrationEventHandler;
pub use events::OrderStatusChangedToSubmittedIntegrationEvent;
pub use service::OrderingIntegrationEventService;
