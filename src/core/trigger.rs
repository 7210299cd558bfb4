//! Trigger conditions that authorize transitions.
//!
//! A trigger is a closed set of condition kinds, each evaluated against one
//! incoming [`Event`]. Evaluation is pure: arming and cancelling timers is the
//! timer manager's job and happens on state entry, never inside `matches`.

use super::event::{Event, TransitionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Conventional value of a boolean entity that is switched on.
pub const ON: &str = "on";

/// Condition that authorizes a transition.
///
/// # Example
///
/// ```rust
/// use autostate::core::{Event, Trigger, TransitionId};
///
/// let trigger = Trigger::state_eq("device_tracker.phone", "home");
/// let id = TransitionId(0);
///
/// assert!(trigger.matches(id, &Event::entity_changed("device_tracker.phone", "not_home", "home")));
/// assert!(!trigger.matches(id, &Event::entity_changed("device_tracker.phone", "home", "work")));
/// assert!(!trigger.matches(id, &Event::entity_changed("device_tracker.other", "not_home", "home")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Entity's new value equals `value`.
    StateEq { entity: String, value: String },

    /// Entity's new value differs from `value`.
    StateNeq { entity: String, value: String },

    /// Entity switched to [`ON`].
    StateOn { entity: String },

    /// Entity switched to anything other than [`ON`].
    StateOff { entity: String },

    /// The transition's source state has been occupied for this long.
    Timeout(Duration),
}

impl Trigger {
    pub fn state_eq(entity: impl Into<String>, value: impl Into<String>) -> Self {
        Self::StateEq {
            entity: entity.into(),
            value: value.into(),
        }
    }

    pub fn state_neq(entity: impl Into<String>, value: impl Into<String>) -> Self {
        Self::StateNeq {
            entity: entity.into(),
            value: value.into(),
        }
    }

    pub fn state_on(entity: impl Into<String>) -> Self {
        Self::StateOn {
            entity: entity.into(),
        }
    }

    pub fn state_off(entity: impl Into<String>) -> Self {
        Self::StateOff {
            entity: entity.into(),
        }
    }

    pub fn timeout(delay: Duration) -> Self {
        Self::Timeout(delay)
    }

    pub fn timeout_secs(secs: u64) -> Self {
        Self::Timeout(Duration::from_secs(secs))
    }

    /// Entity watched by this trigger. `None` for timeouts.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::StateEq { entity, .. }
            | Self::StateNeq { entity, .. }
            | Self::StateOn { entity }
            | Self::StateOff { entity } => Some(entity),
            Self::Timeout(_) => None,
        }
    }

    /// Delay of a timeout trigger. `None` for entity triggers.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Timeout(delay) => Some(*delay),
            _ => None,
        }
    }

    /// Check whether `event` satisfies this trigger.
    ///
    /// `id` is the transition this trigger belongs to. A timer expiry only
    /// matches when it was armed for that exact transition.
    pub fn matches(&self, id: TransitionId, event: &Event) -> bool {
        match (self, event) {
            (Self::Timeout(_), Event::TimerExpired(token)) => token.transition == id,
            (Self::Timeout(_), Event::EntityChanged { .. }) => false,
            (_, Event::TimerExpired(_)) => false,
            (trigger, Event::EntityChanged { entity, new, .. }) => {
                trigger.entity() == Some(entity.as_str()) && trigger.holds(Some(new.as_str()))
            }
        }
    }

    /// Check whether the entity condition is already true for `current`.
    ///
    /// An entity missing from the store counts as differing from every value.
    /// Timeouts never hold.
    pub fn holds(&self, current: Option<&str>) -> bool {
        match self {
            Self::StateEq { value, .. } => current == Some(value.as_str()),
            Self::StateNeq { value, .. } => current != Some(value.as_str()),
            Self::StateOn { .. } => current == Some(ON),
            Self::StateOff { .. } => current != Some(ON),
            Self::Timeout(_) => false,
        }
    }
}

/// Human readable label, used for graph edges and history records.
impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateEq { entity, value } => write!(f, "{entity} == {value}"),
            Self::StateNeq { entity, value } => write!(f, "{entity} != {value}"),
            Self::StateOn { entity } => write!(f, "{entity}"),
            Self::StateOff { entity } => write!(f, "!{entity}"),
            Self::Timeout(delay) => write!(f, "timeout {} s", delay.as_secs_f64()),
        }
    }
}
