use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EventBusError, EventId, Result,
    log::{EventState, IntegrationEventLog, IntegrationEventLogEntry},
};

/// In-memory integration event log, used by tests and the demo binary.
#[derive(Clone, Default)]
pub struct InMemoryIntegrationEventLog {
    entries: Arc<RwLock<Vec<IntegrationEventLogEntry>>>,
}

impl InMemoryIntegrationEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of logged entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing has been logged.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns every entry in insertion order.
    pub async fn entries(&self) -> Vec<IntegrationEventLogEntry> {
        self.entries.read().await.clone()
    }

    async fn transition(&self, event_id: EventId, state: EventState) -> Result<()> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.event_id == event_id)
            .ok_or(EventBusError::LogEntryNotFound(event_id))?;

        entry.state = state;
        if state == EventState::InProgress {
            entry.times_sent += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl IntegrationEventLog for InMemoryIntegrationEventLog {
    async fn save_event(&self, entry: IntegrationEventLogEntry) -> Result<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn mark_in_progress(&self, event_id: EventId) -> Result<()> {
        self.transition(event_id, EventState::InProgress).await
    }

    async fn mark_published(&self, event_id: EventId) -> Result<()> {
        self.transition(event_id, EventState::Published).await
    }

    async fn mark_failed(&self, event_id: EventId) -> Result<()> {
        self.transition(event_id, EventState::PublishedFailed).await
    }

    async fn pending(&self) -> Result<Vec<IntegrationEventLogEntry>> {
        let entries = self.entries.read().await;
        let mut pending: Vec<_> = entries
            .iter()
            .filter(|e| e.state.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|e| e.creation_time);
        Ok(pending)
    }

    async fn get(&self, event_id: EventId) -> Result<Option<IntegrationEventLogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.event_id == event_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderStartedIntegrationEvent;

    fn entry(user: &str) -> IntegrationEventLogEntry {
        IntegrationEventLogEntry::new(&OrderStartedIntegrationEvent::new(user)).unwrap()
    }

    #[tokio::test]
    async fn in_progress_counts_attempts() {
        let log = InMemoryIntegrationEventLog::new();
        let e = entry("1");
        let id = e.event_id;
        log.save_event(e).await.unwrap();

        log.mark_in_progress(id).await.unwrap();
        log.mark_failed(id).await.unwrap();
        log.mark_in_progress(id).await.unwrap();
        log.mark_published(id).await.unwrap();

        let stored = log.get(id).await.unwrap().unwrap();
        assert_eq!(stored.state, EventState::Published);
        assert_eq!(stored.times_sent, 2);
    }

    #[tokio::test]
    async fn pending_excludes_published_and_in_progress() {
        let log = InMemoryIntegrationEventLog::new();
        let (a, b, c) = (entry("a"), entry("b"), entry("c"));
        let (a_id, b_id, c_id) = (a.event_id, b.event_id, c.event_id);
        for e in [a, b, c] {
            log.save_event(e).await.unwrap();
        }

        log.mark_in_progress(a_id).await.unwrap();
        log.mark_published(a_id).await.unwrap();
        log.mark_in_progress(b_id).await.unwrap();
        log.mark_failed(c_id).await.unwrap();

        let pending = log.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].event_id, c_id);
        assert_eq!(log.len().await, 3);
    }

    #[tokio::test]
    async fn unknown_entry_is_reported() {
        let log = InMemoryIntegrationEventLog::new();
        let missing = EventId::new();

        let err = log.mark_published(missing).await.unwrap_err();

        assert!(matches!(err, EventBusError::LogEntryNotFound(id) if id == missing));
        assert!(log.get(missing).await.unwrap().is_none());
    }
}
