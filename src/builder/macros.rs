//! Macros for ergonomic state machine construction.

/// Generate a state enum and its `State` implementation.
///
/// The variant name is the external string form, and declaration order is
/// the order of `State::all()`.
///
/// # Example
///
/// ```
/// use autostate::core::State;
/// use autostate::state_enum;
///
/// state_enum! {
///     pub enum Presence {
///         Home,
///         Leaving,
///         Away,
///     }
/// }
///
/// assert_eq!(Presence::Leaving.name(), "Leaving");
/// assert_eq!(Presence::all().first(), Some(&Presence::Home));
/// assert_eq!(Presence::from_name("Away"), Some(Presence::Away));
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }
    };
}
