use thiserror::Error;

/// Errors raised by dispatcher entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// An event arrived before the adapter handed over the trigger map
    #[error("Input trigger map not set before the first event")]
    NoInputMap,

    /// An event arrived before the adapter handed over the behavior map
    #[error("Behavior map not set before the first event")]
    NoBehaviorMap,
}
