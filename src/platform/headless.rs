//! Synthetic adapter without a window
//!
//! Drives a dispatcher from code: tests, scripted demos and replay tools. Keeps its own
//! clock so multi-click and double-press timing is deterministic.

use super::{AdapterKind, PlatformAdapter};
use crate::dispatch::{DispatchError, Dispatcher, KeyEvent, PointerEvent, WheelEvent};
use crate::trigger::{KeyCode, RawModifiers};
use chrono::{DateTime, Local, TimeDelta};
use std::collections::BTreeSet;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

impl MouseButton {
    pub fn flag(self) -> RawModifiers {
        match self {
            MouseButton::Primary => RawModifiers::BUTTON1,
            MouseButton::Middle => RawModifiers::BUTTON2,
            MouseButton::Secondary => RawModifiers::BUTTON3,
        }
    }
}

pub struct HeadlessAdapter {
    dispatcher: Dispatcher,
    now: DateTime<Local>,
    held_keys: BTreeSet<KeyCode>,
    held_buttons: BTreeSet<MouseButton>,
    last_press: Option<(MouseButton, DateTime<Local>, u32)>,
    x: i32,
    y: i32,
}

impl HeadlessAdapter {
    /// Moves the adapter clock forward
    pub fn advance(&mut self, by: TimeDelta) {
        self.now += by;
    }

    pub fn advance_ms(&mut self, ms: i64) {
        self.advance(TimeDelta::milliseconds(ms));
    }

    pub fn now(&self) -> DateTime<Local> {
        self.now
    }

    /// Raw flags as a window system would report them right now
    pub fn raw_modifiers(&self) -> RawModifiers {
        let mut raw = RawModifiers::empty();
        for key in &self.held_keys {
            raw |= match key {
                KeyCode::Shift => RawModifiers::SHIFT,
                KeyCode::Control => RawModifiers::CTRL,
                KeyCode::Alt => RawModifiers::ALT,
                KeyCode::AltGraph => RawModifiers::ALT_GRAPH,
                KeyCode::Meta => RawModifiers::META,
                _ => RawModifiers::empty(),
            };
        }
        for button in &self.held_buttons {
            raw |= button.flag();
        }
        raw
    }

    fn pointer_event(&self, click_count: u32) -> PointerEvent {
        PointerEvent::new(self.x, self.y)
            .with_modifiers(self.raw_modifiers())
            .with_click_count(click_count)
            .at(self.now)
    }

    pub fn press_key(&mut self, key: impl Into<KeyCode>) -> Result<(), DispatchError> {
        let key = key.into();
        self.held_keys.insert(key);
        let event = KeyEvent::new(key)
            .with_modifiers(self.raw_modifiers())
            .at(self.now);
        self.dispatcher.key_pressed(&event)
    }

    pub fn release_key(&mut self, key: impl Into<KeyCode>) -> Result<(), DispatchError> {
        let key = key.into();
        self.held_keys.remove(&key);
        let event = KeyEvent::new(key)
            .with_modifiers(self.raw_modifiers())
            .at(self.now);
        self.dispatcher.key_released(&event)
    }

    /// Press and release
    pub fn tap_key(&mut self, key: impl Into<KeyCode>) -> Result<(), DispatchError> {
        let key = key.into();
        self.press_key(key)?;
        self.release_key(key)
    }

    pub fn press_button(&mut self, button: MouseButton) -> Result<(), DispatchError> {
        let interval = self.dispatcher.double_click_interval();
        let click_count = match self.last_press {
            Some((last, when, count)) if last == button && self.now - when < interval => count + 1,
            _ => 1,
        };
        self.last_press = Some((button, self.now, click_count));
        self.held_buttons.insert(button);
        trace!("Synthetic {:?} press, click count {}", button, click_count);

        let event = self.pointer_event(click_count);
        self.dispatcher.mouse_pressed(&event)
    }

    pub fn release_button(&mut self, button: MouseButton) -> Result<(), DispatchError> {
        self.held_buttons.remove(&button);
        let click_count = self.last_press.map_or(1, |(_, _, count)| count);

        let event = self.pointer_event(click_count);
        self.dispatcher.mouse_released(&event)?;
        self.dispatcher.mouse_clicked(&event)
    }

    /// Moves the pointer, reported as a drag while any button is held
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<(), DispatchError> {
        self.x = x;
        self.y = y;
        let event = self.pointer_event(1);
        if self.held_buttons.is_empty() {
            self.dispatcher.mouse_moved(&event)
        } else {
            self.dispatcher.mouse_dragged(&event)
        }
    }

    pub fn scroll(&mut self, delta_x: f64, delta_y: f64) -> Result<(), DispatchError> {
        let event = WheelEvent {
            x: self.x,
            y: self.y,
            delta_x,
            delta_y,
            modifiers: self.raw_modifiers(),
            when: self.now,
        };
        self.dispatcher.mouse_wheel_moved(&event)
    }

    /// Focus changes drop every held key on both sides
    pub fn focus(&mut self, focused: bool) -> Result<(), DispatchError> {
        self.held_keys.clear();
        if focused {
            self.dispatcher.focus_gained()
        } else {
            self.dispatcher.focus_lost()
        }
    }

    pub fn pointer_entered(&mut self, inside: bool) -> Result<(), DispatchError> {
        if inside {
            self.dispatcher.mouse_entered()
        } else {
            self.dispatcher.mouse_exited()
        }
    }
}

impl PlatformAdapter for HeadlessAdapter {
    const KIND: AdapterKind = AdapterKind::Headless;

    fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            now: Local::now(),
            held_keys: BTreeSet::new(),
            held_buttons: BTreeSet::new(),
            last_press: None,
            x: 0,
            y: 0,
        }
    }

    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }
}
