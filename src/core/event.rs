//! Events delivered to a state machine by its host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a concrete transition in the machine's transition table.
///
/// Wildcard and list registrations are expanded before they get an id, so every
/// id names exactly one `(from, trigger, to)` edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub usize);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one armed timer.
///
/// The generation is bumped every time a state is entered, so a token handed
/// out before a state change never equals a token armed after it, even for the
/// same transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub transition: TransitionId,
    pub generation: u64,
}

/// Something the host observed and wants the machine to react to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// An entity in the external store changed value.
    EntityChanged {
        entity: String,
        old: String,
        new: String,
    },

    /// A delay scheduled through [`Host::run_in`](crate::machine::Host::run_in) elapsed.
    TimerExpired(TimerToken),
}

impl Event {
    /// Convenience constructor for entity changes.
    pub fn entity_changed(
        entity: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self::EntityChanged {
            entity: entity.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// Short name of the event kind for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::EntityChanged { .. } => "entity_changed",
            Self::TimerExpired(_) => "timer_expired",
        }
    }

    /// The entity this event is about, if any.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::EntityChanged { entity, .. } => Some(entity),
            Self::TimerExpired(_) => None,
        }
    }
}
