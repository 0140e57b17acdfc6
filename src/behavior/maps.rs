//! Mutable binding maps with modification counters
//!
//! Both maps are owned by the application and shared with dispatchers through `Arc`.
//! Every mutation bumps the map's counter; the dispatcher compares counters to decide
//! whether its lookup lists are stale. Counters only ever grow.

use super::Behavior;
use crate::trigger::InputTrigger;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Trigger to behavior-name bindings
#[derive(Debug, Default)]
pub struct InputTriggerMap {
    bindings: RwLock<HashMap<InputTrigger, BTreeSet<String>>>,
    mod_count: AtomicU64,
}

impl InputTriggerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mod_count(&self) -> u64 {
        self.mod_count.load(Ordering::Acquire)
    }

    fn touch(&self) {
        self.mod_count.fetch_add(1, Ordering::AcqRel);
    }

    pub fn put(&self, trigger: InputTrigger, behavior_name: impl Into<String>) {
        let behavior_name = behavior_name.into();
        trace!("Binding '{}' to '{}'", trigger, behavior_name);
        self.bindings
            .write()
            .entry(trigger)
            .or_default()
            .insert(behavior_name);
        self.touch();
    }

    /// Removes one binding, returns whether it existed
    pub fn remove(&self, trigger: &InputTrigger, behavior_name: &str) -> bool {
        let removed = {
            let mut bindings = self.bindings.write();
            let removed = match bindings.get_mut(trigger) {
                Some(names) => names.remove(behavior_name),
                None => false,
            };
            if bindings.get(trigger).is_some_and(|names| names.is_empty()) {
                bindings.remove(trigger);
            }
            removed
        };

        if removed {
            self.touch();
        }
        removed
    }

    /// Removes every binding of `behavior_name`, returns the triggers it had
    pub fn remove_behavior(&self, behavior_name: &str) -> Vec<InputTrigger> {
        let removed: Vec<InputTrigger> = {
            let mut bindings = self.bindings.write();
            let removed = bindings
                .iter_mut()
                .filter_map(|(trigger, names)| names.remove(behavior_name).then(|| trigger.clone()))
                .collect();
            bindings.retain(|_, names| !names.is_empty());
            removed
        };

        if !removed.is_empty() {
            self.touch();
        }
        removed
    }

    pub fn get(&self, trigger: &InputTrigger) -> BTreeSet<String> {
        self.bindings.read().get(trigger).cloned().unwrap_or_default()
    }

    /// Triggers bound to `behavior_name`
    pub fn triggers_for(&self, behavior_name: &str) -> Vec<InputTrigger> {
        self.bindings
            .read()
            .iter()
            .filter(|(_, names)| names.contains(behavior_name))
            .map(|(trigger, _)| trigger.clone())
            .collect()
    }

    /// Copy of all bindings
    pub fn all_bindings(&self) -> HashMap<InputTrigger, BTreeSet<String>> {
        self.bindings.read().clone()
    }

    pub fn clear(&self) {
        self.bindings.write().clear();
        self.touch();
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

/// Behavior name to behavior instance
#[derive(Debug, Default)]
pub struct BehaviorMap {
    behaviors: RwLock<HashMap<String, Behavior>>,
    mod_count: AtomicU64,
}

impl BehaviorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mod_count(&self) -> u64 {
        self.mod_count.load(Ordering::Acquire)
    }

    /// Inserts or replaces a behavior, returns the previous one
    pub fn put(&self, name: impl Into<String>, behavior: Behavior) -> Option<Behavior> {
        let name = name.into();
        trace!("Registering {:?} as '{}'", behavior, name);
        let previous = self.behaviors.write().insert(name, behavior);
        self.mod_count.fetch_add(1, Ordering::AcqRel);
        previous
    }

    pub fn remove(&self, name: &str) -> Option<Behavior> {
        let removed = self.behaviors.write().remove(name);
        if removed.is_some() {
            self.mod_count.fetch_add(1, Ordering::AcqRel);
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<Behavior> {
        self.behaviors.read().get(name).cloned()
    }

    /// Copy of the registered names, unordered
    pub fn keys(&self) -> Vec<String> {
        self.behaviors.read().keys().cloned().collect()
    }

    pub fn clear(&self) {
        self.behaviors.write().clear();
        self.mod_count.fetch_add(1, Ordering::AcqRel);
    }

    pub fn len(&self) -> usize {
        self.behaviors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.read().is_empty()
    }
}
