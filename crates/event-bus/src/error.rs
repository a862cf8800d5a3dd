use thiserror::Error;

use crate::{EventId, EventKind};

/// Boxed error returned by a failing event handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when publishing events or recording them in the log.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// A subscribed handler returned an error while processing an event.
    #[error("Handler '{handler}' failed to process {kind}: {source}")]
    Handler {
        kind: EventKind,
        handler: &'static str,
        #[source]
        source: BoxError,
    },

    /// A handler received an event whose concrete type differs from the one
    /// it subscribed to. Two event types declared the same kind.
    #[error("Handler '{handler}' subscribed to {expected} received a different event type")]
    KindMismatch {
        expected: EventKind,
        handler: &'static str,
    },

    /// One or more handlers failed during best-effort delivery.
    #[error("{} handler(s) failed to process {kind}", .failures.len())]
    DeliveryFailed {
        kind: EventKind,
        failures: Vec<EventBusError>,
    },

    /// The integration event log has no entry with this id.
    #[error("Integration event not found in log: {0}")]
    LogEntryNotFound(EventId),

    /// A stored log entry carries an unknown state.
    #[error("Unknown integration event state: {0}")]
    InvalidState(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EventBusError {
    /// Returns the names of the handlers that failed, in delivery order.
    pub fn failed_handlers(&self) -> Vec<&'static str> {
        match self {
            EventBusError::Handler { handler, .. } | EventBusError::KindMismatch { handler, .. } => {
                vec![*handler]
            }
            EventBusError::DeliveryFailed { failures, .. } => {
                failures.iter().flat_map(|f| f.failed_handlers()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Result type for event bus operations.
pub type Result<T> = std::result::Result<T, EventBusError>;
