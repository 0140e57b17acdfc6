use thiserror::Error;

/// Errors produced while reading a trigger string like `"shift ctrl W"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerParseError {
    #[error("Empty trigger string")]
    Empty,

    #[error("Unknown token '{token}' in trigger '{input}'")]
    UnknownToken { token: String, input: String },

    #[error("Trigger '{0}' has no key, button or scroll to activate it")]
    NoActivator(String),
}
