//! Core State trait for state machine states.
//!
//! States form a closed set fixed when the machine is built. Each state has an
//! external string form, which is what gets written to the mirrored entity and
//! what the graph export prints.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: States are copied into transitions and history records
/// - `PartialEq`: States are compared by identity when selecting transitions
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: History records are serializable
///
/// # Example
///
/// ```rust
/// use autostate::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Presence {
///     Home,
///     Leaving,
///     Away,
/// }
///
/// impl State for Presence {
///     fn name(&self) -> &str {
///         match self {
///             Self::Home => "HOME",
///             Self::Leaving => "LEAVING",
///             Self::Away => "AWAY",
///         }
///     }
///
///     fn all() -> &'static [Self] {
///         &[Self::Home, Self::Leaving, Self::Away]
///     }
/// }
///
/// assert_eq!(Presence::from_name("AWAY"), Some(Presence::Away));
/// assert_eq!(Presence::from_name("away"), None);
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// External string form of the state.
    ///
    /// Used as the mirrored entity value and as the node name in graphs.
    fn name(&self) -> &str;

    /// Every declared state, in declaration order.
    ///
    /// The first entry is the fallback initial state.
    fn all() -> &'static [Self];

    /// Parse the external string form back into a declared state.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().find(|s| s.name() == name).cloned()
    }
}
