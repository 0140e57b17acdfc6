//! Controller poller
//!
//! Background thread that polls one controller at a fixed heartbeat and feeds gamepad
//! behaviors. The thread handle follows a typestate lifecycle:
//!
//! ```text
//! ControllerPoller<Configured> ──start()──► ControllerPoller<Running> ──shutdown()──► ControllerPoller<Stopped>
//! ```
//!
//! Each heartbeat runs one [`PollLoop::step`]:
//!
//! 1. drain backend events, attach or detach the active device
//! 2. threshold analog values and store them in [`ControllerAxisState`], track buttons and
//!    hat directions as held gamepad keys
//! 3. forward every raw value to gamepad behaviors listening on that component, click
//!    gamepad click bindings matching the held gamepad keys
//! 4. re-send every analog component still deflected past the sustain deadzone

use super::axis_state::ControllerAxisState;
use super::backend::ControllerBackend;
use super::component::{Axis, ComponentId, ControllerEvent, DeviceId};
use crate::dispatch::{BindingTables, LookupCache};
use crate::trigger::{KeyCode, TriggerMask};
use chrono::Local;
use serde::{Deserialize, Serialize};
use statum::{machine, state};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

// Digital button and hat levels for gamepad clicks
const BUTTON_PRESS: f32 = 0.9;
const BUTTON_RELEASE: f32 = 0.1;
const POV_PRESS: f32 = 0.05;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Sleep between two polls in milliseconds
    pub heartbeat_ms: u64,

    /// Analog values below this are stored as released
    pub down_threshold: f32,

    /// Analog values beyond this keep firing every heartbeat
    pub sustain_deadzone: f32,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            heartbeat_ms: 5,
            down_threshold: 0.5,
            sustain_deadzone: 0.02,
        }
    }
}

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("Poller has no controller backend")]
    MissingBackend,

    #[error("A controller poller is already running")]
    AlreadyRunning,

    #[error("Failed to spawn poller thread: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("Poller thread panicked")]
    ThreadPanicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Polling(DeviceId),
}

/// One heartbeat worth of controller handling, without the thread around it
pub struct PollLoop {
    backend: Box<dyn ControllerBackend>,
    bindings: Arc<LookupCache>,
    axes: ControllerAxisState,
    settings: PollerSettings,
    device: DeviceState,
    gamepad_keys: BTreeSet<KeyCode>,
}

impl PollLoop {
    pub fn new(
        backend: Box<dyn ControllerBackend>,
        bindings: Arc<LookupCache>,
        axes: ControllerAxisState,
        settings: PollerSettings,
    ) -> Self {
        Self {
            backend,
            bindings,
            axes,
            settings,
            device: DeviceState::Idle,
            gamepad_keys: BTreeSet::new(),
        }
    }

    pub fn device(&self) -> DeviceState {
        self.device
    }

    /// Polls once and delivers the results, returns the number of backend events seen
    pub fn step(&mut self) -> usize {
        // A failing backend means the device is gone
        let events = match self.backend.poll() {
            Ok(events) => events,
            Err(e) => {
                if let DeviceState::Polling(device) = self.device {
                    warn!("Lost controller {}: {}", device, e);
                    self.detach();
                }
                return 0;
            }
        };

        // Behaviors are only delivered once both maps exist; device tracking goes on anyway
        let tables = match self.bindings.update() {
            Ok(tables) => Some(tables),
            Err(e) => {
                trace!("Gamepad behaviors unavailable: {}", e);
                None
            }
        };

        // Fresh events first
        let seen = events.len();
        for event in events {
            self.handle(event, tables.as_deref());
        }

        // Then re-send whatever is still deflected
        if let (DeviceState::Polling(_), Some(tables)) = (self.device, tables.as_deref()) {
            for (component, value) in self.axes.held(self.settings.sustain_deadzone) {
                trace!("Sustaining {} at {}", component, value);
                deliver(tables, component, value);
            }
        }

        seen
    }

    fn handle(&mut self, event: ControllerEvent, tables: Option<&BindingTables>) {
        match event {
            ControllerEvent::Attached { device, name } => match self.device {
                DeviceState::Idle => {
                    info!("Polling controller {} ({})", device, name);
                    self.device = DeviceState::Polling(device);
                }
                DeviceState::Polling(active) => {
                    debug!(
                        "Ignoring controller {} ({}), already polling {}",
                        device, name, active
                    );
                }
            },
            ControllerEvent::Detached { device } => {
                if self.device == DeviceState::Polling(device) {
                    info!("Controller {} detached", device);
                    self.detach();
                }
            }
            ControllerEvent::Changed {
                device,
                component,
                value,
            } => {
                if self.device != DeviceState::Polling(device) {
                    return;
                }

                // Only the stored state is thresholded
                if component.is_analog() {
                    if value.abs() < self.settings.down_threshold {
                        trace!("{} under threshold, releasing", component);
                        self.axes.zero(component);
                    } else {
                        self.axes.set(component, value);
                    }
                } else {
                    self.axes.set(component, value);
                    self.track_gamepad_key(component, value);
                }

                if let Some(tables) = tables {
                    deliver(tables, component, value);
                    self.click_gamepad(tables);
                }
            }
        }
    }

    fn track_gamepad_key(&mut self, component: ComponentId, value: f32) {
        match component {
            ComponentId::Axis(Axis::Pov) => {
                // The hat points in one direction at a time
                for key in ComponentId::pov_keys() {
                    self.gamepad_keys.remove(&key);
                }
                if value > POV_PRESS {
                    if let Some(key) = component.gamepad_key(value) {
                        self.gamepad_keys.insert(key);
                    }
                }
            }
            ComponentId::Button(_) => {
                let Some(key) = component.gamepad_key(value) else {
                    return;
                };
                if value < BUTTON_RELEASE {
                    self.gamepad_keys.remove(&key);
                } else if value > BUTTON_PRESS {
                    self.gamepad_keys.insert(key);
                }
            }
            ComponentId::Axis(_) => {}
        }
    }

    fn click_gamepad(&self, tables: &BindingTables) {
        for entry in &tables.gamepad_clicks {
            if entry.trigger.matches(TriggerMask::empty(), &self.gamepad_keys) {
                trace!("Gamepad click on '{}'", entry.trigger);
                entry.behavior.click(0, 0);
            }
        }
    }

    /// Keys currently held through controller buttons and the hat
    pub fn gamepad_keys(&self) -> &BTreeSet<KeyCode> {
        &self.gamepad_keys
    }

    fn detach(&mut self) {
        self.device = DeviceState::Idle;
        self.axes.clear();
        self.gamepad_keys.clear();
    }
}

fn deliver(tables: &BindingTables, component: ComponentId, value: f32) {
    for entry in &tables.gamepads {
        if entry.behavior.axes().contains(&component) {
            entry.behavior.axis_event(component, value);
        }
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum PollerLifecycle {
    Configured,
    Running,
    Stopped,
}

/// Owner of the poller thread
#[machine]
pub struct ControllerPoller<S: PollerLifecycle> {
    settings: PollerSettings,
    bindings: Arc<LookupCache>,
    axes: ControllerAxisState,
    backend: Option<Box<dyn ControllerBackend>>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl<S: PollerLifecycle> ControllerPoller<S> {
    pub fn settings(&self) -> &PollerSettings {
        &self.settings
    }

    /// Live view of the last polled values
    pub fn axes(&self) -> ControllerAxisState {
        self.axes.clone()
    }
}

impl ControllerPoller<Configured> {
    pub fn create(
        settings: PollerSettings,
        bindings: Arc<LookupCache>,
        backend: Box<dyn ControllerBackend>,
    ) -> Self {
        debug!("Creating controller poller with settings: {:?}", settings);
        // Axis state starts empty, the thread handle is set on start
        Self::new(
            settings,
            bindings,
            ControllerAxisState::new(),
            Some(backend),
            CancellationToken::new(),
            None, // thread
        )
    }

    pub fn start(mut self) -> Result<ControllerPoller<Running>, PollerError> {
        // The backend moves into the loop, a second start has nothing to run
        let backend = self.backend.take().ok_or(PollerError::MissingBackend)?;
        let mut poll_loop = PollLoop::new(
            backend,
            self.bindings.clone(),
            self.axes.clone(),
            self.settings.clone(),
        );
        let heartbeat = Duration::from_millis(self.settings.heartbeat_ms);
        let cancel = self.cancel.clone();

        let thread = std::thread::Builder::new()
            .name("controller-poller".into())
            .spawn(move || {
                info!("Starting controller poll loop, heartbeat {:?}", heartbeat);

                // Stats for periodic logging
                let mut event_count = 0;
                let mut last_log_time = Local::now();
                let log_interval = chrono::Duration::seconds(10);

                // Cancellation is checked once per heartbeat
                while !cancel.is_cancelled() {
                    event_count += poll_loop.step();

                    // Log stats every 10 seconds
                    let now = Local::now();
                    if now - last_log_time > log_interval {
                        debug!(
                            "Controller poller stats: {} events in last {} seconds, device {:?}",
                            event_count,
                            log_interval.num_seconds(),
                            poll_loop.device()
                        );
                        event_count = 0;
                        last_log_time = now;
                    }

                    std::thread::sleep(heartbeat);
                }

                info!("Controller poll loop stopped");
            })?;

        self.thread = Some(thread);
        Ok(self.transition())
    }
}

impl ControllerPoller<Running> {
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |thread| thread.is_finished())
    }

    /// Stops the loop and waits for the thread to exit
    pub fn shutdown(mut self) -> Result<ControllerPoller<Stopped>, PollerError> {
        info!("Shutting down controller poller");
        self.cancel.cancel();

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Controller poller thread panicked");
                return Err(PollerError::ThreadPanicked);
            }
        }

        Ok(self.transition())
    }
}
