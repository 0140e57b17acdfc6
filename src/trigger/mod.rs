//! Trigger algebra
//!
//! Converts "what has to be held" into a single comparable value:
//!
//! - [`mask`] - canonical bit layout and raw platform flags
//! - [`key`] - key vocabulary shared by all adapters
//! - [`input_trigger`] - the [`InputTrigger`] value, its matching rules and string grammar

pub mod error;
pub mod input_trigger;
pub mod key;
pub mod mask;

pub use error::TriggerParseError;
pub use input_trigger::InputTrigger;
pub use key::KeyCode;
pub use mask::{RawModifiers, TriggerMask};
