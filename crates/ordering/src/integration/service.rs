use std::sync::Arc;

use event_bus::{EventBus, IntegrationEvent, IntegrationEventLog, IntegrationEventLogEntry};

use crate::error::Result;

/// Publishes integration events, recording each attempt in the log.
///
/// Every event is saved as `NotPublished`, moved to `InProgress`, and
/// published on the bus. It ends as `Published`, or as `PublishedFailed`
/// when a subscriber fails, in which case the bus error is returned.
#[derive(Clone)]
pub struct OrderingIntegrationEventService {
    bus: EventBus,
    log: Arc<dyn IntegrationEventLog>,
}

impl OrderingIntegrationEventService {
    pub fn new(bus: EventBus, log: Arc<dyn IntegrationEventLog>) -> Self {
        Self { bus, log }
    }

    #[tracing::instrument(skip(self, event), fields(kind = %E::KIND, event_id = %event.id()))]
    pub async fn publish_through_event_bus<E: IntegrationEvent>(&self, event: &E) -> Result<()> {
        let entry = IntegrationEventLogEntry::new(event)?;
        let event_id = entry.event_id;

        self.log.save_event(entry).await?;
        self.log.mark_in_progress(event_id).await?;

        match self.bus.publish(event).await {
            Ok(()) => {
                self.log.mark_published(event_id).await?;
                tracing::info!("integration event published");
                Ok(())
            }
            Err(err) => {
                metrics::counter!("integration_events_failed_total", "kind" => E::KIND.name())
                    .increment(1);
                tracing::error!(error = %err, "publishing integration event failed");
                self.log.mark_failed(event_id).await?;
                Err(err.into())
            }
        }
    }

    /// Returns logged events that were never published or failed to publish.
    pub async fn pending_events(&self) -> Result<Vec<IntegrationEventLogEntry>> {
        Ok(self.log.pending().await?)
    }
}
