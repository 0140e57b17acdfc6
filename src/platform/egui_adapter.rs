//! egui adapter
//!
//! Feeds the raw [`egui::Event`] stream of a frame into a dispatcher. egui reports modifier
//! keys only as state on other events, so shift and command transitions are synthesized
//! as key presses from the difference to the previous state.

use super::{AdapterKind, PlatformAdapter};
use crate::dispatch::{DispatchError, Dispatcher, KeyEvent, PointerEvent, WheelEvent};
use crate::trigger::{KeyCode, RawModifiers};
use chrono::{DateTime, Local};
use egui::{Event, Modifiers, PointerButton, Pos2};
use std::time::Duration;
use tracing::{debug, trace};

// egui's own double-click window
const EGUI_DOUBLE_CLICK_MS: u64 = 300;

pub struct EguiAdapter {
    dispatcher: Dispatcher,
    modifiers: Modifiers,
    buttons: RawModifiers,
    last_press: Option<(PointerButton, DateTime<Local>, u32)>,
    pointer: (i32, i32),
    scale: f32,
}

fn button_flag(button: PointerButton) -> RawModifiers {
    match button {
        PointerButton::Primary => RawModifiers::BUTTON1,
        PointerButton::Middle => RawModifiers::BUTTON2,
        PointerButton::Secondary => RawModifiers::BUTTON3,
        _ => RawModifiers::empty(),
    }
}

impl EguiAdapter {
    /// Factor from egui points to the pixels behaviors work in
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn to_pixels(&self, pos: Pos2) -> (i32, i32) {
        (
            (pos.x * self.scale).round() as i32,
            (pos.y * self.scale).round() as i32,
        )
    }

    fn raw(&self, modifiers: Modifiers) -> RawModifiers {
        let mut raw = self.buttons;
        raw.set(RawModifiers::SHIFT, modifiers.shift);
        raw.set(RawModifiers::CTRL, modifiers.ctrl);
        raw.set(RawModifiers::ALT, modifiers.alt);
        raw.set(RawModifiers::META, modifiers.mac_cmd);
        raw
    }

    /// Dispatches every event of one frame, stopping at the first failure
    pub fn handle_events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<(), DispatchError> {
        for event in events {
            self.handle_event(event)?;
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: &Event) -> Result<(), DispatchError> {
        match event {
            Event::Key {
                key,
                pressed,
                modifiers,
                ..
            } => {
                self.sync_modifiers(*modifiers)?;
                let event = KeyEvent::new(*key).with_modifiers(self.raw(*modifiers));
                if *pressed {
                    self.dispatcher.key_pressed(&event)
                } else {
                    self.dispatcher.key_released(&event)
                }
            }
            Event::PointerMoved(pos) => {
                self.pointer = self.to_pixels(*pos);
                let event = PointerEvent::new(self.pointer.0, self.pointer.1)
                    .with_modifiers(self.raw(self.modifiers));
                if self.buttons.is_empty() {
                    self.dispatcher.mouse_moved(&event)
                } else {
                    self.dispatcher.mouse_dragged(&event)
                }
            }
            Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
                ..
            } => {
                self.sync_modifiers(*modifiers)?;
                self.pointer = self.to_pixels(*pos);
                self.pointer_button(*button, *pressed, *modifiers)
            }
            Event::MouseWheel {
                delta, modifiers, ..
            } => {
                self.sync_modifiers(*modifiers)?;
                // egui scrolls content, wheel rotation points the other way
                let event = WheelEvent {
                    x: self.pointer.0,
                    y: self.pointer.1,
                    delta_x: -f64::from(delta.x),
                    delta_y: -f64::from(delta.y),
                    modifiers: self.raw(*modifiers),
                    when: Local::now(),
                };
                self.dispatcher.mouse_wheel_moved(&event)
            }
            Event::WindowFocused(focused) => {
                debug!("Window focus changed: {}", focused);
                self.modifiers = Modifiers::NONE;
                self.buttons = RawModifiers::empty();
                if *focused {
                    self.dispatcher.focus_gained()
                } else {
                    self.dispatcher.focus_lost()
                }
            }
            Event::PointerGone => self.dispatcher.mouse_exited(),
            _ => Ok(()),
        }
    }

    fn pointer_button(
        &mut self,
        button: PointerButton,
        pressed: bool,
        modifiers: Modifiers,
    ) -> Result<(), DispatchError> {
        let now = Local::now();
        let flag = button_flag(button);

        if pressed {
            let interval = self.dispatcher.double_click_interval();
            let click_count = match self.last_press {
                Some((last, when, count)) if last == button && now - when < interval => count + 1,
                _ => 1,
            };
            self.last_press = Some((button, now, click_count));
            self.buttons |= flag;
            trace!("{:?} pressed, click count {}", button, click_count);

            let event = PointerEvent::new(self.pointer.0, self.pointer.1)
                .with_modifiers(self.raw(modifiers))
                .with_click_count(click_count)
                .at(now);
            self.dispatcher.mouse_pressed(&event)
        } else {
            self.buttons.remove(flag);
            let click_count = self.last_press.map_or(1, |(_, _, count)| count);

            let event = PointerEvent::new(self.pointer.0, self.pointer.1)
                .with_modifiers(self.raw(modifiers))
                .with_click_count(click_count)
                .at(now);
            self.dispatcher.mouse_released(&event)?;
            self.dispatcher.mouse_clicked(&event)
        }
    }

    fn sync_modifiers(&mut self, modifiers: Modifiers) -> Result<(), DispatchError> {
        let previous = self.modifiers;
        self.modifiers = modifiers;

        let transitions = [
            (KeyCode::Shift, previous.shift, modifiers.shift),
            (KeyCode::Meta, previous.mac_cmd, modifiers.mac_cmd),
        ];
        for (key, was_down, is_down) in transitions {
            if was_down == is_down {
                continue;
            }
            let event = KeyEvent::new(key).with_modifiers(self.raw(modifiers));
            if is_down {
                self.dispatcher.key_pressed(&event)?;
            } else {
                self.dispatcher.key_released(&event)?;
            }
        }

        Ok(())
    }
}

impl PlatformAdapter for EguiAdapter {
    const KIND: AdapterKind = AdapterKind::Egui;

    fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            modifiers: Modifiers::NONE,
            buttons: RawModifiers::empty(),
            last_press: None,
            pointer: (0, 0),
            scale: 1.0,
        }
    }

    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    fn host_double_click_interval() -> Option<Duration> {
        Some(Duration::from_millis(EGUI_DOUBLE_CLICK_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, BehaviorMap, DragBehavior, InputTriggerMap};
    use crate::dispatch::DispatcherSettings;
    use egui::pos2;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl DragBehavior for Recorder {
        fn init(&self, x: i32, y: i32) {
            self.0.lock().push(format!("init {} {}", x, y));
        }
        fn drag(&self, x: i32, y: i32) {
            self.0.lock().push(format!("drag {} {}", x, y));
        }
        fn end(&self, x: i32, y: i32) {
            self.0.lock().push(format!("end {} {}", x, y));
        }
    }

    fn adapter(trigger: &str, log: Arc<Mutex<Vec<String>>>) -> EguiAdapter {
        let input_map = Arc::new(InputTriggerMap::new());
        let behaviors = Arc::new(BehaviorMap::new());
        behaviors.put("tracked", Behavior::drag(Recorder(log)));
        input_map.put(trigger.parse().unwrap(), "tracked");

        let dispatcher = Dispatcher::new(
            DispatcherSettings::default(),
            EguiAdapter::host_double_click_interval(),
        );
        dispatcher.set_input_map(input_map);
        dispatcher.set_behavior_map(behaviors);
        EguiAdapter::with_dispatcher(dispatcher)
    }

    fn button(pressed: bool, modifiers: Modifiers) -> Event {
        Event::PointerButton {
            pos: pos2(10.0, 10.0),
            button: PointerButton::Primary,
            pressed,
            modifiers,
        }
    }

    #[test]
    fn primary_drag_is_scaled() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut adapter = adapter("button1", log.clone());
        adapter.set_scale(2.0);

        adapter
            .handle_events(&[
                button(true, Modifiers::NONE),
                Event::PointerMoved(pos2(12.0, 15.0)),
                Event::PointerButton {
                    pos: pos2(12.0, 15.0),
                    button: PointerButton::Primary,
                    pressed: false,
                    modifiers: Modifiers::NONE,
                },
            ])
            .unwrap();

        assert_eq!(
            *log.lock(),
            vec!["init 20 20", "drag 24 30", "end 24 30"]
        );
    }

    #[test]
    fn shift_state_becomes_a_tracked_key() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut adapter = adapter("shift button1", log.clone());

        adapter.handle_event(&button(true, Modifiers::SHIFT)).unwrap();
        assert!(adapter.dispatcher().modifier_state().shift());
        assert_eq!(*log.lock(), vec!["init 10 10"]);

        adapter.handle_event(&Event::WindowFocused(false)).unwrap();
        assert!(!adapter.dispatcher().modifier_state().shift());
    }

    #[test]
    fn key_events_carry_synthesized_shift() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut adapter = adapter("shift W", log.clone());

        let key = |pressed| Event::Key {
            key: egui::Key::W,
            physical_key: Some(egui::Key::W),
            pressed,
            repeat: false,
            modifiers: Modifiers::SHIFT,
        };
        adapter
            .handle_events(&[Event::PointerMoved(pos2(4.0, 6.0)), key(true)])
            .unwrap();
        assert_eq!(*log.lock(), vec!["init 4 6"]);

        adapter.handle_event(&key(false)).unwrap();
        assert_eq!(*log.lock(), vec!["init 4 6", "end 4 6"]);
    }
}
