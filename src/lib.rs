//! Input trigger matching and behavior dispatch
//!
//! Applications register named behaviors and bind them to triggers ("shift W",
//! "double-click button1", "scroll"). A platform adapter feeds window events to a
//! [`dispatch::Dispatcher`], which keeps track of held keys and modifiers and invokes every
//! behavior whose trigger matches. Gamepads are polled on their own thread by
//! [`controller::ControllerPoller`] and share the same bindings.
//!
//! ```text
//! InputHandler ──► InputTriggerMap + BehaviorMap
//!      │                      │
//!      ├─ attach() ──► Adapter ──► Dispatcher ──► click / drag / scroll
//!      │                              │
//!      └──────────────────────► LookupCache ──► ControllerPoller ──► gamepad
//! ```

pub mod behavior;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod input_handler;
pub mod platform;
pub mod trigger;

pub use behavior::{Behavior, BehaviorMap, InputTriggerMap};
pub use config::InputConfig;
pub use dispatch::{DispatchError, Dispatcher};
pub use input_handler::{InputHandler, NamedBinding};
pub use trigger::InputTrigger;
