use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use triggerdispatch::controller::{
    Axis, BackendError, ComponentId, ControllerBackend, ControllerEvent, ControllerPoller,
    DeviceId, PollerSettings,
};
use triggerdispatch::platform::{HeadlessAdapter, PlatformAdapter, WindowKind};
use triggerdispatch::{Behavior, InputHandler};

const PAD: DeviceId = DeviceId(3);
const RIGHT_X: ComponentId = ComponentId::Axis(Axis::RX);

/// Replays one batch per poll, then reports nothing
struct Replay(VecDeque<Vec<ControllerEvent>>);

impl ControllerBackend for Replay {
    fn poll(&mut self) -> Result<Vec<ControllerEvent>, BackendError> {
        Ok(self.0.pop_front().unwrap_or_default())
    }
}

#[test]
fn gamepad_behaviors_receive_sustained_axis_values() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    let handler = InputHandler::default();
    handler.add_behavior(
        "gamepad_camera_control",
        Behavior::gamepad_fn(vec![RIGHT_X], move |axis, value| {
            sink.lock().push((axis, value))
        }),
    );
    handler
        .add_key_binding("gamepad_camera_control", &["G"])
        .unwrap();
    let adapter = handler
        .attach::<HeadlessAdapter>(WindowKind::Headless)
        .unwrap();

    let backend = Replay(VecDeque::from(vec![vec![
        ControllerEvent::Attached {
            device: PAD,
            name: "Replay Pad".into(),
        },
        ControllerEvent::Changed {
            device: PAD,
            component: RIGHT_X,
            value: -0.75,
        },
        ControllerEvent::Changed {
            device: PAD,
            component: ComponentId::Button(0),
            value: 1.0,
        },
    ]]));

    let poller = ControllerPoller::create(
        PollerSettings {
            heartbeat_ms: 1,
            ..Default::default()
        },
        adapter.dispatcher().lookup(),
        Box::new(backend),
    );
    let axes = poller.axes();
    let running = poller.start().unwrap();
    std::thread::sleep(Duration::from_millis(40));
    running.shutdown().unwrap();

    let received = received.lock().clone();
    assert!(received.len() >= 2, "expected sustained values, got {:?}", received);
    assert!(received.iter().all(|entry| *entry == (RIGHT_X, -0.75)));
    assert_eq!(axes.get(ComponentId::Button(0)), Some(1.0));
}
