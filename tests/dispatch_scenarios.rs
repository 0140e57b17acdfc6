use egui::Key;
use parking_lot::Mutex;
use std::sync::Arc;
use triggerdispatch::behavior::DragBehavior;
use triggerdispatch::dispatch::{DispatchError, Dispatcher, DispatcherSettings, PointerEvent};
use triggerdispatch::platform::headless::MouseButton;
use triggerdispatch::platform::{HeadlessAdapter, PlatformAdapter, WindowKind};
use triggerdispatch::trigger::{KeyCode, RawModifiers};
use triggerdispatch::{Behavior, InputHandler};

type Log = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl DragBehavior for Recorder {
    fn init(&self, x: i32, y: i32) {
        self.log.lock().push(format!("{} init {} {}", self.name, x, y));
    }

    fn drag(&self, x: i32, y: i32) {
        self.log.lock().push(format!("{} drag {} {}", self.name, x, y));
    }

    fn end(&self, x: i32, y: i32) {
        self.log.lock().push(format!("{} end {} {}", self.name, x, y));
    }
}

fn click(log: &Log, name: &'static str) -> Behavior {
    let log = log.clone();
    Behavior::click(move |x: i32, y: i32| log.lock().push(format!("{} click {} {}", name, x, y)))
}

fn headless(handler: &InputHandler) -> HeadlessAdapter {
    handler
        .attach::<HeadlessAdapter>(WindowKind::Headless)
        .unwrap()
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().clone()
}

#[test]
fn shift_w_fires_only_the_fast_binding() {
    let log = Log::default();
    let handler = InputHandler::default();
    handler.add_behavior("move_forward", click(&log, "move_forward"));
    handler.add_behavior("move_forward_fast", click(&log, "move_forward_fast"));
    handler.add_key_binding("move_forward", &["W"]).unwrap();
    handler.add_key_binding("move_forward_fast", &["shift W"]).unwrap();

    let mut adapter = headless(&handler);
    adapter.move_to(100, 50).unwrap();
    adapter.press_key(KeyCode::Shift).unwrap();
    adapter.press_key(Key::W).unwrap();

    assert_eq!(entries(&log), vec!["move_forward_fast click 100 50"]);

    adapter.release_key(Key::W).unwrap();
    adapter.release_key(KeyCode::Shift).unwrap();
    adapter.advance_ms(1000);
    adapter.press_key(Key::W).unwrap();

    assert_eq!(
        entries(&log),
        vec!["move_forward_fast click 100 50", "move_forward click 100 50"]
    );
}

#[test]
fn button_drag_lifecycle() {
    let log = Log::default();
    let handler = InputHandler::default();
    handler.add_behavior(
        "mouse_control",
        Behavior::drag(Recorder {
            name: "mouse_control",
            log: log.clone(),
        }),
    );
    handler.add_key_binding("mouse_control", &["button1"]).unwrap();

    let mut adapter = headless(&handler);
    adapter.move_to(10, 10).unwrap();
    adapter.press_button(MouseButton::Primary).unwrap();
    adapter.move_to(20, 15).unwrap();
    adapter.release_button(MouseButton::Primary).unwrap();
    adapter.move_to(30, 30).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "mouse_control init 10 10",
            "mouse_control drag 20 15",
            "mouse_control end 20 15",
        ]
    );
    assert_eq!(adapter.dispatcher().active_drag_count(), 0);
}

#[test]
fn key_drag_follows_the_pointer_until_release() {
    let log = Log::default();
    let handler = InputHandler::default();
    handler.add_behavior(
        "look",
        Behavior::drag(Recorder {
            name: "look",
            log: log.clone(),
        }),
    );
    handler.add_key_binding("look", &["M"]).unwrap();

    let mut adapter = headless(&handler);
    adapter.move_to(5, 5).unwrap();
    adapter.press_key(Key::M).unwrap();
    adapter.press_key(Key::Q).unwrap();
    adapter.move_to(8, 9).unwrap();
    adapter.release_key(Key::Q).unwrap();
    adapter.release_key(Key::M).unwrap();

    assert_eq!(
        entries(&log),
        vec!["look init 5 5", "look drag 8 9", "look end 8 9"]
    );
}

#[test]
fn double_press_boundary_is_exclusive() {
    let log = Log::default();
    let handler = InputHandler::new(DispatcherSettings {
        double_click_interval_ms: Some(200),
        ..Default::default()
    });
    handler.add_behavior("dash", click(&log, "dash"));
    handler.add_key_binding("dash", &["double-click D"]).unwrap();

    let mut adapter = headless(&handler);
    adapter.tap_key(Key::D).unwrap();
    adapter.advance_ms(200);
    adapter.tap_key(Key::D).unwrap();
    assert!(entries(&log).is_empty());

    adapter.advance_ms(199);
    adapter.tap_key(Key::D).unwrap();
    assert_eq!(entries(&log), vec!["dash click 0 0"]);
}

#[test]
fn unchanged_maps_do_not_rebuild() {
    let log = Log::default();
    let handler = InputHandler::default();
    handler.add_behavior("jump", click(&log, "jump"));
    handler.add_key_binding("jump", &["space"]).unwrap();

    let mut adapter = headless(&handler);
    adapter.tap_key(Key::Space).unwrap();
    adapter.tap_key(Key::Space).unwrap();
    assert_eq!(adapter.dispatcher().rebuild_count(), 1);

    handler.add_key_binding("jump", &["K"]).unwrap();
    adapter.tap_key(Key::K).unwrap();
    assert_eq!(adapter.dispatcher().rebuild_count(), 2);
    assert_eq!(entries(&log).len(), 3);
}

#[test]
fn every_binding_with_a_behavior_is_in_exactly_one_list() {
    let log = Log::default();
    let handler = InputHandler::default();
    handler.add_behavior("jump", click(&log, "jump"));
    handler.add_behavior(
        "look",
        Behavior::drag(Recorder {
            name: "look",
            log: log.clone(),
        }),
    );
    handler.add_behavior("zoom", Behavior::scroll(|_: f64, _: bool, _: i32, _: i32| {}));
    handler
        .add_key_binding("jump", &["space", "button2", "double-click button1"])
        .unwrap();
    handler.add_key_binding("look", &["button3", "ctrl L"]).unwrap();
    handler.add_key_binding("zoom", &["scroll", "ctrl scroll"]).unwrap();
    handler.add_key_binding("unregistered", &["U"]).unwrap();

    let adapter = headless(&handler);
    let tables = adapter.dispatcher().update().unwrap();

    assert_eq!(tables.key_clicks.len(), 1);
    assert_eq!(tables.button_clicks.len(), 2);
    assert_eq!(tables.key_drags.len(), 1);
    assert_eq!(tables.button_drags.len(), 1);
    assert_eq!(tables.scrolls.len(), 2);
    assert_eq!(tables.len(), 7);
}

#[test]
fn events_before_maps_are_rejected() {
    let mut dispatcher = Dispatcher::new(DispatcherSettings::default(), None);
    let press = PointerEvent::new(0, 0).with_modifiers(RawModifiers::BUTTON1);

    assert_eq!(
        dispatcher.mouse_pressed(&press),
        Err(DispatchError::NoInputMap)
    );
}

#[test]
fn removed_behavior_stops_firing() {
    let log = Log::default();
    let handler = InputHandler::default();
    handler.add_behavior("screenshot", click(&log, "screenshot"));
    handler.add_key_binding("screenshot", &["P"]).unwrap();

    let mut adapter = headless(&handler);
    adapter.tap_key(Key::P).unwrap();
    handler.remove_behavior("screenshot");
    adapter.advance_ms(1000);
    adapter.tap_key(Key::P).unwrap();

    assert_eq!(entries(&log), vec!["screenshot click 0 0"]);
}
