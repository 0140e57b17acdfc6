use super::error::DispatchError;
use super::events::{KeyEvent, PointerEvent, WheelEvent};
use super::lookup::{BindingTables, LookupCache};
use super::masking::{event_mask, EventSource};
use super::modifiers::ModifierState;
use crate::behavior::{BehaviorMap, DragEntry, InputTriggerMap};
use crate::trigger::{InputTrigger, KeyCode, RawModifiers, TriggerMask};
use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

pub const DEFAULT_DOUBLE_CLICK_INTERVAL_MS: u64 = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherSettings {
    /// Overrides the host's multi-click interval for key double-presses
    pub double_click_interval_ms: Option<u64>,

    /// Correct exact-value button flag combinations some hosts report for
    /// meta and alt clicks
    pub platform_quirks: bool,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            double_click_interval_ms: None,
            platform_quirks: true,
        }
    }
}

impl DispatcherSettings {
    /// Configured override, then the host hint, then the built-in default
    pub fn resolve_double_click_interval(&self, host: Option<Duration>) -> TimeDelta {
        let interval = self
            .double_click_interval_ms
            .map(Duration::from_millis)
            .or(host)
            .unwrap_or(Duration::from_millis(DEFAULT_DOUBLE_CLICK_INTERVAL_MS));

        TimeDelta::from_std(interval)
            .unwrap_or(TimeDelta::milliseconds(DEFAULT_DOUBLE_CLICK_INTERVAL_MS as i64))
    }
}

/// Turns raw window events into behavior invocations
///
/// One dispatcher per window, driven from that window's event thread. Every entry point
/// first syncs the lookup lists with the binding maps and fails with [`DispatchError`]
/// when either map was never set.
pub struct Dispatcher {
    settings: DispatcherSettings,
    lookup: Arc<LookupCache>,
    modifiers: ModifierState,
    pressed_keys: BTreeSet<KeyCode>,
    key_press_times: HashMap<KeyCode, DateTime<Local>>,
    active_button_drags: Vec<Arc<DragEntry>>,
    active_key_drags: Vec<Arc<DragEntry>>,
    mouse_x: i32,
    mouse_y: i32,
    double_click_interval: TimeDelta,
}

impl Dispatcher {
    pub fn new(settings: DispatcherSettings, host_double_click: Option<Duration>) -> Self {
        Self::with_modifier_state(settings, host_double_click, ModifierState::default())
    }

    pub fn with_modifier_state(
        settings: DispatcherSettings,
        host_double_click: Option<Duration>,
        modifiers: ModifierState,
    ) -> Self {
        let double_click_interval = settings.resolve_double_click_interval(host_double_click);
        debug!(
            "Dispatcher created, double-click interval {} ms",
            double_click_interval.num_milliseconds()
        );

        Self {
            settings,
            lookup: Arc::new(LookupCache::new()),
            modifiers,
            pressed_keys: BTreeSet::new(),
            key_press_times: HashMap::new(),
            active_button_drags: Vec::new(),
            active_key_drags: Vec::new(),
            mouse_x: 0,
            mouse_y: 0,
            double_click_interval,
        }
    }

    pub fn set_input_map(&self, map: Arc<InputTriggerMap>) {
        self.lookup.set_input_map(map);
    }

    pub fn set_behavior_map(&self, map: Arc<BehaviorMap>) {
        self.lookup.set_behavior_map(map);
    }

    /// Lookup lists shared with the controller poller
    pub fn lookup(&self) -> Arc<LookupCache> {
        self.lookup.clone()
    }

    pub fn update(&self) -> Result<Arc<BindingTables>, DispatchError> {
        self.lookup.update()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.lookup.rebuild_count()
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    pub fn double_click_interval(&self) -> TimeDelta {
        self.double_click_interval
    }

    pub fn cursor(&self) -> (i32, i32) {
        (self.mouse_x, self.mouse_y)
    }

    pub fn pressed_keys(&self) -> &BTreeSet<KeyCode> {
        &self.pressed_keys
    }

    pub fn modifier_state(&self) -> &ModifierState {
        &self.modifiers
    }

    pub fn active_drag_count(&self) -> usize {
        self.active_button_drags.len() + self.active_key_drags.len()
    }

    fn mask(&self, source: EventSource, raw: RawModifiers, click_count: u32) -> TriggerMask {
        event_mask(
            source,
            raw,
            click_count,
            &self.modifiers,
            self.settings.platform_quirks,
        )
    }

    fn move_cursor(&mut self, x: i32, y: i32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    fn drag_active(&self, x: i32, y: i32) {
        for entry in self
            .active_button_drags
            .iter()
            .chain(self.active_key_drags.iter())
        {
            entry.behavior.drag(x, y);
        }
    }

    pub fn mouse_moved(&mut self, event: &PointerEvent) -> Result<(), DispatchError> {
        self.update()?;
        self.move_cursor(event.x, event.y);
        self.drag_active(event.x, event.y);
        Ok(())
    }

    pub fn mouse_dragged(&mut self, event: &PointerEvent) -> Result<(), DispatchError> {
        self.update()?;
        self.move_cursor(event.x, event.y);
        self.drag_active(event.x, event.y);
        Ok(())
    }

    /// Starts matching button drags and fires matching button clicks
    ///
    /// A multi-click also fires the clicks bound to the plain button.
    pub fn mouse_pressed(&mut self, event: &PointerEvent) -> Result<(), DispatchError> {
        let tables = self.update()?;
        self.move_cursor(event.x, event.y);

        // Platform click count decides the double-click bit
        let mask = self.mask(EventSource::Pointer, event.modifiers, event.click_count);
        let single_mask = mask.difference(TriggerMask::DOUBLE_CLICK);
        trace!("Pointer pressed at {},{} with {:?}", event.x, event.y, mask);

        for entry in &tables.button_drags {
            if entry.trigger.matches(mask, &self.pressed_keys)
                && !self
                    .active_button_drags
                    .iter()
                    .any(|active| active.same_binding(entry))
            {
                entry.behavior.init(event.x, event.y);
                self.active_button_drags.push(entry.clone());
            }
        }

        // Clicks that ignore double-click still fire on a multi-click
        for entry in &tables.button_clicks {
            if entry.trigger.matches(mask, &self.pressed_keys)
                || entry.trigger.matches(single_mask, &self.pressed_keys)
            {
                entry.behavior.click(event.x, event.y);
            }
        }

        Ok(())
    }

    /// Ends button drags whose trigger is no longer held
    pub fn mouse_released(&mut self, event: &PointerEvent) -> Result<(), DispatchError> {
        self.update()?;
        self.move_cursor(event.x, event.y);

        let mask = self.mask(EventSource::Pointer, event.modifiers, 1);
        let pressed_keys = &self.pressed_keys;
        self.active_button_drags.retain(|entry| {
            if entry.trigger.matches_subset(mask, pressed_keys) {
                true
            } else {
                entry.behavior.end(event.x, event.y);
                false
            }
        });

        Ok(())
    }

    /// Clicks fire on press, so this only keeps the lookup lists current
    pub fn mouse_clicked(&mut self, _event: &PointerEvent) -> Result<(), DispatchError> {
        self.update()?;
        Ok(())
    }

    pub fn mouse_wheel_moved(&mut self, event: &WheelEvent) -> Result<(), DispatchError> {
        let tables = self.update()?;
        let mask = self.mask(EventSource::Wheel, event.modifiers, 1);

        // Hosts report horizontal wheels as a shift-flagged vertical scroll. The flag only
        // counts when shift is not actually held.
        let shift_means_horizontal =
            event.modifiers.contains(RawModifiers::SHIFT) && !self.modifiers.shift();
        let horizontal_delta = event.delta_y == 0.0 && event.delta_x != 0.0;
        let is_horizontal = shift_means_horizontal || horizontal_delta;
        let amount = if is_horizontal && event.delta_x != 0.0 {
            event.delta_x
        } else {
            event.delta_y
        };

        for entry in &tables.scrolls {
            if entry.trigger.matches(mask, &self.pressed_keys) {
                entry
                    .behavior
                    .scroll(amount, is_horizontal, event.x, event.y);
            }
        }

        Ok(())
    }

    /// Records the key, then starts key drags and fires key clicks at the cursor
    ///
    /// Pressing the same key again within the double-click interval also matches
    /// double-click triggers. Held keys that repeat do not count as presses.
    pub fn key_pressed(&mut self, event: &KeyEvent) -> Result<(), DispatchError> {
        let tables = self.update()?;

        // Modifiers are tracked state, never triggers of their own
        if event.key.is_modifier() {
            self.modifiers.press(event.key);
            return Ok(());
        }

        // Key repeat does not count as a new press
        let mut double_press = false;
        if self.pressed_keys.insert(event.key) {
            if let Some(last) = self.key_press_times.get(&event.key) {
                double_press = event.when.signed_duration_since(*last) < self.double_click_interval;
            }
            self.key_press_times.insert(event.key, event.when);
        }

        // A double press may also match bindings with the double-click bit
        let mask = self.mask(EventSource::Key, event.modifiers, 1);
        let double_mask = mask | TriggerMask::DOUBLE_CLICK;
        let pressed_keys = &self.pressed_keys;
        let activates = |trigger: &InputTrigger| {
            trigger.matches(mask, pressed_keys)
                || (double_press && trigger.matches(double_mask, pressed_keys))
        };
        trace!(
            "Key {} pressed, held {:?}, double press {}",
            event.key,
            pressed_keys,
            double_press
        );

        // Start drags that are not running yet
        let (x, y) = (self.mouse_x, self.mouse_y);
        let mut started = Vec::new();
        for entry in &tables.key_drags {
            if activates(&entry.trigger)
                && !self
                    .active_key_drags
                    .iter()
                    .any(|active| active.same_binding(entry))
            {
                entry.behavior.init(x, y);
                started.push(entry.clone());
            }
        }

        for entry in &tables.key_clicks {
            if activates(&entry.trigger) {
                entry.behavior.click(x, y);
            }
        }

        self.active_key_drags.extend(started);
        Ok(())
    }

    /// Forgets the key and ends key drags whose trigger is no longer held
    pub fn key_released(&mut self, event: &KeyEvent) -> Result<(), DispatchError> {
        self.update()?;

        if event.key.is_modifier() {
            self.modifiers.release(event.key);
            return Ok(());
        }

        self.pressed_keys.remove(&event.key);

        // Drags end once their trigger is no longer a subset of what is held
        let mask = self.mask(EventSource::Key, event.modifiers, 1);
        let pressed_keys = &self.pressed_keys;
        let (x, y) = (self.mouse_x, self.mouse_y);
        self.active_key_drags.retain(|entry| {
            if entry.trigger.matches_subset(mask, pressed_keys) {
                true
            } else {
                entry.behavior.end(x, y);
                false
            }
        });

        Ok(())
    }

    pub fn mouse_entered(&mut self) -> Result<(), DispatchError> {
        self.update()?;
        Ok(())
    }

    pub fn mouse_exited(&mut self) -> Result<(), DispatchError> {
        self.update()?;
        Ok(())
    }

    /// Key releases may have been missed while unfocused
    pub fn focus_gained(&mut self) -> Result<(), DispatchError> {
        self.update()?;
        self.forget_held_keys();
        Ok(())
    }

    pub fn focus_lost(&mut self) -> Result<(), DispatchError> {
        self.update()?;
        self.forget_held_keys();
        Ok(())
    }

    fn forget_held_keys(&mut self) {
        if !self.pressed_keys.is_empty() {
            info!("Dropping {} held keys after focus change", self.pressed_keys.len());
        }
        self.pressed_keys.clear();
        self.modifiers.reset();
    }
}
