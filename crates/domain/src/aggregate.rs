//! Aggregate root trait and the pending domain event ledger.

use std::fmt;

use common::AggregateId;
use event_bus::DynEvent;

/// Trait for domain events.
///
/// Domain events represent facts that have happened inside one aggregate.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: fmt::Debug + Clone + Send + Sync + 'static {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the event in the form the event bus publishes.
    fn as_dyn(&self) -> &dyn DynEvent;
}

/// Insertion-ordered ledger of domain events an aggregate has recorded but
/// not yet dispatched.
///
/// Only the owning aggregate appends to it. The component that commits the
/// aggregate drains it with [`DomainEvents::take`] right before publishing.
#[derive(Debug, Clone)]
pub struct DomainEvents<E> {
    pending: Vec<E>,
}

impl<E> Default for DomainEvents<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<E: DomainEvent> DomainEvents<E> {
    pub(crate) fn record(&mut self, event: E) {
        tracing::trace!(event_type = event.event_type(), "domain event recorded");
        self.pending.push(event);
    }

    /// Returns the pending events in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.pending.iter()
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if there are no pending events.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every pending event, leaving the ledger empty.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }
}

/// Trait for aggregate roots.
///
/// An aggregate root is the consistency boundary for a cluster of domain
/// objects. Its behavior methods change state and record the matching
/// domain events; it never publishes them itself.
pub trait AggregateRoot: Clone + Send + Sync + 'static {
    /// The type of events this aggregate records.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> AggregateId;

    /// Returns the ledger of events not yet dispatched.
    fn domain_events(&self) -> &DomainEvents<Self::Event>;

    /// Drains the ledger. Called once per commit, before dispatch.
    fn take_domain_events(&mut self) -> Vec<Self::Event>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_bus::{Event, EventKind};

    #[derive(Debug, Clone)]
    struct Counted(u32);

    impl Event for Counted {
        const KIND: EventKind = EventKind::domain("Counted");
    }

    impl DomainEvent for Counted {
        fn event_type(&self) -> &'static str {
            Self::KIND.name()
        }

        fn as_dyn(&self) -> &dyn DynEvent {
            self
        }
    }

    #[test]
    fn test_ledger_keeps_insertion_order() {
        let mut ledger = DomainEvents::default();
        ledger.record(Counted(1));
        ledger.record(Counted(2));

        let seen: Vec<u32> = ledger.iter().map(|e| e.0).collect();
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_take_clears_the_ledger() {
        let mut ledger = DomainEvents::default();
        ledger.record(Counted(1));

        let drained = ledger.take();

        assert_eq!(drained.len(), 1);
        assert!(ledger.is_empty());
        assert!(ledger.take().is_empty());
    }

    #[test]
    fn test_as_dyn_exposes_kind() {
        let event = Counted(3);
        assert_eq!(event.as_dyn().kind(), Counted::KIND);
        assert_eq!(event.event_type(), "Counted");
    }
}
