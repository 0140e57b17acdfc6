//! Controller subsystem for gamepad input
//!
//! 1. [`backend`] - source of raw device notifications, [`gilrs_backend`] for real pads
//! 2. [`poller`] - heartbeat thread that thresholds values and drives gamepad behaviors
//! 3. [`axis_state`] - last value per component, shared with the application
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► ControllerBackend ──► PollLoop ──► GamepadBehavior::axis_event
//!                                      │
//!                                      ├──► held gamepad keys ──► gamepad click bindings
//!                                      │
//!                                      └──► ControllerAxisState
//! ```
//!
//! Only the first attached device is polled. Gamepad behaviors run on the poller thread.

pub mod axis_state;
pub mod backend;
pub mod component;
pub mod gilrs_backend;
pub mod poller;

pub use axis_state::ControllerAxisState;
pub use backend::{BackendError, ControllerBackend};
pub use component::{Axis, ComponentId, ControllerEvent, DeviceId};
pub use gilrs_backend::GilrsBackend;
pub use poller::{ControllerPoller, DeviceState, PollLoop, PollerError, PollerSettings};
