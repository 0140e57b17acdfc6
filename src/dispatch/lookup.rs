//! Derived lookup lists, rebuilt when either binding map changes
//!
//! The cache is shared between the dispatcher on the UI thread and the controller poller
//! thread. A rebuild is one critical section: the map handles, the last seen counters and
//! the published tables change together, and readers always see a complete set of lists.

use super::error::DispatchError;
use crate::behavior::{
    Behavior, BehaviorEntry, BehaviorMap, ClickEntry, DragEntry, GamepadEntry, InputTriggerMap,
    ScrollEntry,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, trace};

/// Behavior entries sorted by kind and by what activates them
#[derive(Debug, Default)]
pub struct BindingTables {
    pub key_drags: Vec<Arc<DragEntry>>,
    pub button_drags: Vec<Arc<DragEntry>>,
    pub key_clicks: Vec<Arc<ClickEntry>>,
    pub button_clicks: Vec<Arc<ClickEntry>>,
    pub scrolls: Vec<Arc<ScrollEntry>>,
    pub gamepads: Vec<Arc<GamepadEntry>>,
    pub gamepad_clicks: Vec<Arc<ClickEntry>>,
}

impl BindingTables {
    fn build(input_map: &InputTriggerMap, behaviors: &BehaviorMap) -> Self {
        let mut tables = BindingTables::default();

        for (trigger, names) in input_map.all_bindings() {
            for name in names {
                let Some(behavior) = behaviors.get(&name) else {
                    trace!("No behavior named '{}', skipping '{}'", name, trigger);
                    continue;
                };

                let key_based = trigger.is_key_triggered();
                match behavior {
                    Behavior::Drag(drag) => {
                        let entry = Arc::new(BehaviorEntry::new(trigger.clone(), drag));
                        if key_based {
                            tables.key_drags.push(entry);
                        } else {
                            tables.button_drags.push(entry);
                        }
                    }
                    Behavior::Click(click) => {
                        let entry = Arc::new(BehaviorEntry::new(trigger.clone(), click));
                        if key_based {
                            tables.key_clicks.push(entry);
                        } else {
                            tables.button_clicks.push(entry);
                        }
                    }
                    Behavior::Scroll(scroll) => {
                        tables
                            .scrolls
                            .push(Arc::new(BehaviorEntry::new(trigger.clone(), scroll)));
                    }
                    Behavior::Gamepad(gamepad) => {
                        tables
                            .gamepads
                            .push(Arc::new(BehaviorEntry::new(trigger.clone(), gamepad)));
                    }
                    Behavior::GamepadClick(click) => {
                        tables
                            .gamepad_clicks
                            .push(Arc::new(BehaviorEntry::new(trigger.clone(), click)));
                    }
                }
            }
        }

        tables
    }

    pub fn len(&self) -> usize {
        self.key_drags.len()
            + self.button_drags.len()
            + self.key_clicks.len()
            + self.button_clicks.len()
            + self.scrolls.len()
            + self.gamepads.len()
            + self.gamepad_clicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct SyncState {
    input_map: Option<Arc<InputTriggerMap>>,
    behavior_map: Option<Arc<BehaviorMap>>,
    input_seen: Option<u64>,
    behavior_seen: Option<u64>,
    rebuilds: u64,
}

/// Lookup lists derived from one trigger map and one behavior map
#[derive(Debug, Default)]
pub struct LookupCache {
    sync: Mutex<SyncState>,
    tables: RwLock<Arc<BindingTables>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the trigger map; the next update rebuilds unconditionally
    pub fn set_input_map(&self, map: Arc<InputTriggerMap>) {
        let mut sync = self.sync.lock();
        sync.input_map = Some(map);
        sync.input_seen = None;
    }

    /// Replaces the behavior map; the next update rebuilds unconditionally
    pub fn set_behavior_map(&self, map: Arc<BehaviorMap>) {
        let mut sync = self.sync.lock();
        sync.behavior_map = Some(map);
        sync.behavior_seen = None;
    }

    pub fn input_map(&self) -> Option<Arc<InputTriggerMap>> {
        self.sync.lock().input_map.clone()
    }

    pub fn behavior_map(&self) -> Option<Arc<BehaviorMap>> {
        self.sync.lock().behavior_map.clone()
    }

    /// Brings the lookup lists in line with both maps
    ///
    /// Rebuilds only when a counter moved since the last rebuild. Two threads calling
    /// this concurrently never both rebuild for the same counter values.
    pub fn update(&self) -> Result<Arc<BindingTables>, DispatchError> {
        let mut sync = self.sync.lock();
        let input_map = sync.input_map.clone().ok_or(DispatchError::NoInputMap)?;
        let behavior_map = sync
            .behavior_map
            .clone()
            .ok_or(DispatchError::NoBehaviorMap)?;

        let input_count = input_map.mod_count();
        let behavior_count = behavior_map.mod_count();
        if sync.input_seen == Some(input_count) && sync.behavior_seen == Some(behavior_count) {
            return Ok(self.tables.read().clone());
        }

        let tables = Arc::new(BindingTables::build(&input_map, &behavior_map));
        debug!(
            "Rebuilt lookup lists: {} key drags, {} button drags, {} key clicks, {} button clicks, {} scrolls, {} gamepad, {} gamepad clicks",
            tables.key_drags.len(),
            tables.button_drags.len(),
            tables.key_clicks.len(),
            tables.button_clicks.len(),
            tables.scrolls.len(),
            tables.gamepads.len(),
            tables.gamepad_clicks.len()
        );

        *self.tables.write() = tables.clone();
        sync.input_seen = Some(input_count);
        sync.behavior_seen = Some(behavior_count);
        sync.rebuilds += 1;

        Ok(tables)
    }

    /// Last published lists, possibly stale
    pub fn tables(&self) -> Arc<BindingTables> {
        self.tables.read().clone()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.sync.lock().rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::DragBehavior;
    use crate::controller::component::{Axis, ComponentId};
    use crate::trigger::InputTrigger;

    struct NoopDrag;

    impl DragBehavior for NoopDrag {
        fn init(&self, _x: i32, _y: i32) {}
        fn drag(&self, _x: i32, _y: i32) {}
        fn end(&self, _x: i32, _y: i32) {}
    }

    fn trigger(text: &str) -> InputTrigger {
        text.parse().unwrap()
    }

    fn populated() -> (Arc<InputTriggerMap>, Arc<BehaviorMap>) {
        let input_map = Arc::new(InputTriggerMap::new());
        let behaviors = Arc::new(BehaviorMap::new());

        behaviors.put("look", Behavior::drag(NoopDrag));
        behaviors.put("jump", Behavior::click(|_: i32, _: i32| {}));
        behaviors.put("zoom", Behavior::scroll(|_: f64, _: bool, _: i32, _: i32| {}));
        behaviors.put(
            "stick",
            Behavior::gamepad_fn(vec![ComponentId::Axis(Axis::X)], |_, _| {}),
        );
        behaviors.put("confirm", Behavior::gamepad_click(|_: i32, _: i32| {}));

        input_map.put(trigger("button1"), "look");
        input_map.put(trigger("M"), "look");
        input_map.put(trigger("space"), "jump");
        input_map.put(trigger("button3"), "jump");
        input_map.put(trigger("scroll"), "zoom");
        input_map.put(trigger("G"), "stick");
        input_map.put(trigger("0"), "confirm");
        input_map.put(trigger("Q"), "missing");

        (input_map, behaviors)
    }

    #[test]
    fn update_without_maps_fails() {
        let cache = LookupCache::new();
        assert_eq!(cache.update().unwrap_err(), DispatchError::NoInputMap);

        cache.set_input_map(Arc::new(InputTriggerMap::new()));
        assert_eq!(cache.update().unwrap_err(), DispatchError::NoBehaviorMap);
    }

    #[test]
    fn entries_are_partitioned_by_kind_and_activation() {
        let (input_map, behaviors) = populated();
        let cache = LookupCache::new();
        cache.set_input_map(input_map);
        cache.set_behavior_map(behaviors);

        let tables = cache.update().unwrap();
        assert_eq!(tables.key_drags.len(), 1);
        assert_eq!(tables.button_drags.len(), 1);
        assert_eq!(tables.key_clicks.len(), 1);
        assert_eq!(tables.button_clicks.len(), 1);
        assert_eq!(tables.scrolls.len(), 1);
        assert_eq!(tables.gamepads.len(), 1);
        assert_eq!(tables.gamepad_clicks.len(), 1);
        assert_eq!(tables.len(), 7);
    }

    #[test]
    fn rebuilds_only_when_counters_move() {
        let (input_map, behaviors) = populated();
        let cache = LookupCache::new();
        cache.set_input_map(input_map.clone());
        cache.set_behavior_map(behaviors.clone());

        cache.update().unwrap();
        cache.update().unwrap();
        assert_eq!(cache.rebuild_count(), 1);

        input_map.put(trigger("K"), "jump");
        let tables = cache.update().unwrap();
        assert_eq!(cache.rebuild_count(), 2);
        assert_eq!(tables.key_clicks.len(), 2);

        behaviors.remove("jump");
        let tables = cache.update().unwrap();
        assert_eq!(cache.rebuild_count(), 3);
        assert!(tables.key_clicks.is_empty());
        assert!(tables.button_clicks.is_empty());
    }

    #[test]
    fn replacing_a_map_forces_a_rebuild() {
        let (input_map, behaviors) = populated();
        let cache = LookupCache::new();
        cache.set_input_map(input_map.clone());
        cache.set_behavior_map(behaviors);
        cache.update().unwrap();

        cache.set_input_map(input_map);
        cache.update().unwrap();
        assert_eq!(cache.rebuild_count(), 2);
    }
}
