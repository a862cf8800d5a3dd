//! Integration event log: the record of what was published and how it went.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EventBusError, EventId, IntegrationEvent, Result};

/// Publication state of a logged integration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventState {
    NotPublished,
    InProgress,
    Published,
    PublishedFailed,
}

impl EventState {
    /// Returns the stored representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::NotPublished => "not_published",
            EventState::InProgress => "in_progress",
            EventState::Published => "published",
            EventState::PublishedFailed => "published_failed",
        }
    }

    /// Parses a stored state.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "not_published" => Ok(EventState::NotPublished),
            "in_progress" => Ok(EventState::InProgress),
            "published" => Ok(EventState::Published),
            "published_failed" => Ok(EventState::PublishedFailed),
            other => Err(EventBusError::InvalidState(other.to_string())),
        }
    }

    /// Returns true if an event in this state still has to be published.
    pub fn is_pending(&self) -> bool {
        matches!(self, EventState::NotPublished | EventState::PublishedFailed)
    }
}

/// One integration event as recorded in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationEventLogEntry {
    pub event_id: EventId,
    pub event_kind: String,
    pub content: serde_json::Value,
    pub state: EventState,
    pub times_sent: u32,
    pub creation_time: DateTime<Utc>,
}

impl IntegrationEventLogEntry {
    /// Captures an integration event in the `NotPublished` state.
    pub fn new<E: IntegrationEvent>(event: &E) -> Result<Self> {
        Ok(Self {
            event_id: event.id(),
            event_kind: E::KIND.name().to_string(),
            content: serde_json::to_value(event)?,
            state: EventState::NotPublished,
            times_sent: 0,
            creation_time: event.creation_date(),
        })
    }
}

/// Storage for integration event log entries.
#[async_trait]
pub trait IntegrationEventLog: Send + Sync {
    /// Records an event as not yet published.
    async fn save_event(&self, entry: IntegrationEventLogEntry) -> Result<()>;

    /// Moves an entry to `InProgress` and counts the attempt.
    async fn mark_in_progress(&self, event_id: EventId) -> Result<()>;

    /// Moves an entry to `Published`.
    async fn mark_published(&self, event_id: EventId) -> Result<()>;

    /// Moves an entry to `PublishedFailed`.
    async fn mark_failed(&self, event_id: EventId) -> Result<()>;

    /// Returns entries still to be published, oldest first.
    async fn pending(&self) -> Result<Vec<IntegrationEventLogEntry>>;

    /// Returns a single entry.
    async fn get(&self, event_id: EventId) -> Result<Option<IntegrationEventLogEntry>>;
}
