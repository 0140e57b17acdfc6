//! Event dispatch
//!
//! ```text
//! platform adapter ──► Dispatcher ──► mask (masking) ──► match against LookupCache lists
//!                          │                                      │
//!                          │ held keys, modifiers, active drags   ▼
//!                          └──────────────────────────────► click / drag / scroll behaviors
//! ```
//!
//! The [`LookupCache`] is shared with the controller poller, which reads the gamepad list
//! from its own thread.

pub mod dispatcher;
pub mod error;
pub mod events;
pub mod lookup;
pub mod masking;
pub mod modifiers;

pub use dispatcher::{Dispatcher, DispatcherSettings, DEFAULT_DOUBLE_CLICK_INTERVAL_MS};
pub use error::DispatchError;
pub use events::{KeyEvent, PointerEvent, WheelEvent};
pub use lookup::{BindingTables, LookupCache};
pub use modifiers::ModifierState;
