//! Macros for declaring state and trigger enums.

/// Generate a `State` implementation for a fieldless enum.
///
/// The enum derives everything the engine needs, including `Copy`.
///
/// # Example
///
/// ```
/// use substate::state_enum;
/// use substate::core::State;
///
/// state_enum! {
///     pub enum ShipmentState {
///         Draft,
///         Initialized,
///         Manifested,
///     }
/// }
///
/// assert_eq!(ShipmentState::Manifested.name(), "Manifested");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a `Trigger` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use substate::trigger_enum;
/// use substate::core::Trigger;
///
/// trigger_enum! {
///     pub enum ShipmentTrigger {
///         ProcessingRequested,
///         ShipmentCancellationRequested,
///     }
/// }
///
/// assert_eq!(
///     ShipmentTrigger::ProcessingRequested.name(),
///     "ProcessingRequested"
/// );
/// ```
#[macro_export]
macro_rules! trigger_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Trigger for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
