//! Application-facing entry point
//!
//! Owns the two binding maps, applies configuration and hands out adapters whose
//! dispatchers already share those maps. Bindings may change at any time; dispatchers pick
//! the changes up on their next event.
//!
//! The handler also owns the controller poller. [`InputHandler::close`] (or dropping the
//! handler) stops and joins its thread.

use crate::behavior::{Behavior, BehaviorMap, InputTriggerMap};
use crate::config::{BindingConfig, InputConfig};
use crate::controller::{
    ControllerAxisState, ControllerBackend, ControllerPoller, PollerError, PollerSettings,
};
use crate::controller::poller::Running;
use crate::dispatch::{Dispatcher, DispatcherSettings};
use crate::platform::{check_attach, AdapterError, PlatformAdapter, WindowKind};
use crate::trigger::{InputTrigger, TriggerParseError};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A behavior bundled with its default triggers
pub struct NamedBinding {
    pub name: String,
    pub behavior: Behavior,
    pub triggers: Vec<InputTrigger>,
}

impl NamedBinding {
    pub fn new(name: impl Into<String>, behavior: Behavior, triggers: Vec<InputTrigger>) -> Self {
        Self {
            name: name.into(),
            behavior,
            triggers,
        }
    }
}

pub struct InputHandler {
    settings: DispatcherSettings,
    controller_settings: PollerSettings,
    input_map: Arc<InputTriggerMap>,
    behaviors: Arc<BehaviorMap>,
    poller: Mutex<Option<ControllerPoller<Running>>>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(DispatcherSettings::default())
    }
}

impl InputHandler {
    pub fn new(settings: DispatcherSettings) -> Self {
        Self {
            settings,
            controller_settings: PollerSettings::default(),
            input_map: Arc::new(InputTriggerMap::new()),
            behaviors: Arc::new(BehaviorMap::new()),
            poller: Mutex::new(None),
        }
    }

    /// Handler with the dispatcher settings, controller settings and bindings of `config`
    pub fn from_config(config: &InputConfig) -> Result<Self, TriggerParseError> {
        let mut handler = Self::new(config.dispatcher.clone());
        handler.controller_settings = config.controller.clone();
        handler.apply_config(config)?;
        Ok(handler)
    }

    pub fn input_map(&self) -> Arc<InputTriggerMap> {
        self.input_map.clone()
    }

    pub fn behavior_map(&self) -> Arc<BehaviorMap> {
        self.behaviors.clone()
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    pub fn controller_settings(&self) -> &PollerSettings {
        &self.controller_settings
    }

    pub fn add_behavior(&self, name: impl Into<String>, behavior: Behavior) -> Option<Behavior> {
        let name = name.into();
        debug!("Registering {:?} behavior '{}'", behavior.kind(), name);
        self.behaviors.put(name, behavior)
    }

    pub fn remove_behavior(&self, name: &str) -> Option<Behavior> {
        self.behaviors.remove(name)
    }

    pub fn behavior(&self, name: &str) -> Option<Behavior> {
        self.behaviors.get(name)
    }

    pub fn all_behaviors(&self) -> Vec<String> {
        let mut names = self.behaviors.keys();
        names.sort();
        names
    }

    /// Binds `name` to every trigger in `triggers`
    ///
    /// All strings are parsed before anything is bound, so a bad trigger leaves the map
    /// untouched. The behavior does not have to be registered yet.
    pub fn add_key_binding(&self, name: &str, triggers: &[&str]) -> Result<(), TriggerParseError> {
        let parsed = triggers
            .iter()
            .map(|text| text.parse::<InputTrigger>())
            .collect::<Result<Vec<_>, _>>()?;

        for trigger in parsed {
            self.input_map.put(trigger, name);
        }
        Ok(())
    }

    pub fn bind(&self, name: &str, trigger: InputTrigger) {
        self.input_map.put(trigger, name);
    }

    /// Removes every trigger bound to `name`
    pub fn remove_key_binding(&self, name: &str) -> Vec<InputTrigger> {
        self.input_map.remove_behavior(name)
    }

    pub fn key_bindings(&self, name: &str) -> HashSet<InputTrigger> {
        self.input_map.triggers_for(name).into_iter().collect()
    }

    pub fn all_bindings(&self) -> HashMap<InputTrigger, BTreeSet<String>> {
        self.input_map.all_bindings()
    }

    pub fn register(&self, binding: NamedBinding) {
        for trigger in binding.triggers {
            self.input_map.put(trigger, binding.name.as_str());
        }
        self.add_behavior(binding.name, binding.behavior);
    }

    pub fn unregister(&self, name: &str) -> Option<Behavior> {
        self.remove_key_binding(name);
        self.remove_behavior(name)
    }

    pub fn apply_config(&self, config: &InputConfig) -> Result<(), TriggerParseError> {
        for binding in &config.bindings {
            let triggers: Vec<&str> = binding.triggers.iter().map(String::as_str).collect();
            self.add_key_binding(&binding.behavior, &triggers)?;
        }
        info!("Applied {} binding entries", config.bindings.len());
        Ok(())
    }

    /// Current bindings as config entries, sorted by behavior name
    pub fn describe(&self) -> Vec<BindingConfig> {
        let mut by_name: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (trigger, names) in self.input_map.all_bindings() {
            for name in names {
                by_name.entry(name).or_default().insert(trigger.to_string());
            }
        }

        by_name
            .into_iter()
            .map(|(behavior, triggers)| BindingConfig {
                behavior,
                triggers: triggers.into_iter().collect(),
            })
            .collect()
    }

    /// Creates an adapter for `window` whose dispatcher shares this handler's maps
    pub fn attach<A: PlatformAdapter>(&self, window: WindowKind) -> Result<A, AdapterError> {
        check_attach(A::KIND, window)?;

        let dispatcher = Dispatcher::new(self.settings.clone(), A::host_double_click_interval());
        dispatcher.set_input_map(self.input_map.clone());
        dispatcher.set_behavior_map(self.behaviors.clone());

        info!("Attached {} adapter to {} window", A::KIND, window);
        Ok(A::with_dispatcher(dispatcher))
    }

    /// Starts polling `backend` for the bindings of `dispatcher`
    ///
    /// Only one poller runs per handler. The returned state is a live view of the polled
    /// values.
    pub fn start_controller(
        &self,
        dispatcher: &Dispatcher,
        backend: Box<dyn ControllerBackend>,
    ) -> Result<ControllerAxisState, PollerError> {
        let mut slot = self.poller.lock();
        if slot.is_some() {
            return Err(PollerError::AlreadyRunning);
        }

        let poller = ControllerPoller::create(
            self.controller_settings.clone(),
            dispatcher.lookup(),
            backend,
        )
        .start()?;
        let axes = poller.axes();
        *slot = Some(poller);
        Ok(axes)
    }

    pub fn controller_running(&self) -> bool {
        self.poller.lock().is_some()
    }

    /// Stops the controller poller and waits for its thread
    pub fn close(&self) -> Result<(), PollerError> {
        // Take it out first so the lock is not held while joining
        let poller = self.poller.lock().take();
        if let Some(poller) = poller {
            poller.shutdown()?;
        }
        Ok(())
    }
}

impl Drop for InputHandler {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Controller poller did not stop cleanly: {}", e);
        }
    }
}
