//! Event kinds and the event capability traits.

use std::any::Any;
use std::fmt;

use serde::Serialize;

/// The two families of events carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventFamily {
    /// Raised by an aggregate, dispatched after its state is committed.
    Domain,

    /// Crosses aggregate or service boundaries.
    Integration,
}

/// Explicit identifier of an event type.
///
/// Handlers are matched against published events by kind, never by
/// inspecting the runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventKind {
    name: &'static str,
    family: EventFamily,
}

impl EventKind {
    /// Declares a domain event kind.
    pub const fn domain(name: &'static str) -> Self {
        Self {
            name,
            family: EventFamily::Domain,
        }
    }

    /// Declares an integration event kind.
    pub const fn integration(name: &'static str) -> Self {
        Self {
            name,
            family: EventFamily::Integration,
        }
    }

    /// Returns the kind name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the event family.
    pub fn family(&self) -> EventFamily {
        self.family
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An immutable fact delivered through the bus.
///
/// Each event type declares a unique kind. Events should be named in past
/// tense.
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// The kind every value of this type is published under.
    const KIND: EventKind;
}

/// Object-safe view of an [`Event`], used where the concrete type is erased.
pub trait DynEvent: fmt::Debug + Send + Sync {
    /// Returns the kind of the underlying event.
    fn kind(&self) -> EventKind;

    /// Returns the event as `Any` for downcasting to its concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<E: Event> DynEvent for E {
    fn kind(&self) -> EventKind {
        E::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
