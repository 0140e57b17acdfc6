//! gilrs-backed controller source
//!
//! Translates gilrs events into [`ControllerEvent`]s. Stick and trigger values are passed
//! through untouched; thresholding happens in the poller so every backend behaves the same.

use super::backend::{BackendError, ControllerBackend};
use super::component::{pov, Axis, ComponentId, ControllerEvent, DeviceId};
use gilrs::{Button, Event, EventType, GamepadId, Gilrs};
use tracing::{debug, error, info};

pub struct GilrsBackend {
    gilrs: Gilrs,

    // Already connected pads are announced on the first poll
    announced: bool,
}

impl GilrsBackend {
    pub fn new() -> Result<Self, BackendError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(BackendError::InitializationError(e.to_string()));
            }
        };

        Ok(Self {
            gilrs,
            announced: false,
        })
    }

    fn announce_connected(&mut self, out: &mut Vec<ControllerEvent>) {
        let gamepads: Vec<(GamepadId, String)> = self
            .gilrs
            .gamepads()
            .map(|(id, gamepad)| (id, gamepad.name().to_string()))
            .collect();

        if gamepads.is_empty() {
            info!("No gamepad connected, waiting for one to attach");
        } else {
            info!("Found {} gamepads:", gamepads.len());
        }

        for (idx, (id, name)) in gamepads.into_iter().enumerate() {
            info!("  [{}] ID: {}, Name: {}", idx, id, name);
            out.push(ControllerEvent::Attached {
                device: device_id(id),
                name,
            });
        }
    }

    fn convert(&self, id: GamepadId, event: EventType) -> Option<ControllerEvent> {
        let device = device_id(id);

        match event {
            EventType::Connected => {
                let name = self.gilrs.gamepad(id).name().to_string();
                info!("Controller connected: {} ({})", name, id);
                Some(ControllerEvent::Attached { device, name })
            }
            EventType::Disconnected => {
                info!("Controller disconnected: {}", id);
                Some(ControllerEvent::Detached { device })
            }
            EventType::AxisChanged(axis, value, _) => {
                map_axis(axis).map(|axis| ControllerEvent::Changed {
                    device,
                    component: ComponentId::Axis(axis),
                    value,
                })
            }
            EventType::ButtonPressed(button, _) => map_button(button, true)
                .map(|(component, value)| ControllerEvent::Changed {
                    device,
                    component,
                    value,
                }),
            EventType::ButtonReleased(button, _) => map_button(button, false)
                .map(|(component, value)| ControllerEvent::Changed {
                    device,
                    component,
                    value,
                }),
            _ => {
                debug!("Unhandled event type: {:?}", event);
                None
            }
        }
    }
}

impl ControllerBackend for GilrsBackend {
    fn poll(&mut self) -> Result<Vec<ControllerEvent>, BackendError> {
        let mut out = Vec::new();

        if !self.announced {
            self.announce_connected(&mut out);
            self.announced = true;
        }

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            if let Some(converted) = self.convert(id, event) {
                out.push(converted);
            }
        }

        Ok(out)
    }
}

fn device_id(id: GamepadId) -> DeviceId {
    DeviceId(usize::from(id))
}

fn map_axis(axis: gilrs::Axis) -> Option<Axis> {
    match axis {
        gilrs::Axis::LeftStickX => Some(Axis::X),
        gilrs::Axis::LeftStickY => Some(Axis::Y),
        gilrs::Axis::LeftZ => Some(Axis::Z),
        gilrs::Axis::RightStickX => Some(Axis::RX),
        gilrs::Axis::RightStickY => Some(Axis::RY),
        gilrs::Axis::RightZ => Some(Axis::RZ),
        _ => None,
    }
}

// Face buttons first, then shoulders and menu buttons; the d-pad becomes a POV hat
fn map_button(button: Button, pressed: bool) -> Option<(ComponentId, f32)> {
    let digital = if pressed { 1.0 } else { 0.0 };
    let hat = |direction: f32| {
        let value = if pressed { direction } else { pov::CENTERED };
        Some((ComponentId::Axis(Axis::Pov), value))
    };

    match button {
        Button::South => Some((ComponentId::Button(0), digital)),
        Button::East => Some((ComponentId::Button(1), digital)),
        Button::West => Some((ComponentId::Button(2), digital)),
        Button::North => Some((ComponentId::Button(3), digital)),
        Button::LeftTrigger => Some((ComponentId::Button(4), digital)),
        Button::RightTrigger => Some((ComponentId::Button(5), digital)),
        Button::Select => Some((ComponentId::Button(6), digital)),
        Button::Start => Some((ComponentId::Button(7), digital)),
        Button::Mode => Some((ComponentId::Button(8), digital)),
        Button::LeftThumb => Some((ComponentId::Button(9), digital)),
        Button::RightThumb => Some((ComponentId::Button(10), digital)),
        Button::DPadUp => hat(pov::UP),
        Button::DPadRight => hat(pov::RIGHT),
        Button::DPadDown => hat(pov::DOWN),
        Button::DPadLeft => hat(pov::LEFT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpad_maps_to_pov_hat() {
        assert_eq!(
            map_button(Button::DPadRight, true),
            Some((ComponentId::Axis(Axis::Pov), pov::RIGHT))
        );
        assert_eq!(
            map_button(Button::DPadRight, false),
            Some((ComponentId::Axis(Axis::Pov), pov::CENTERED))
        );
    }

    #[test]
    fn face_buttons_are_indexed() {
        assert_eq!(
            map_button(Button::South, true),
            Some((ComponentId::Button(0), 1.0))
        );
        assert_eq!(map_button(Button::C, true), None);
    }

    #[test]
    fn sticks_and_triggers_map_to_axes() {
        assert_eq!(map_axis(gilrs::Axis::RightZ), Some(Axis::RZ));
        assert_eq!(map_axis(gilrs::Axis::DPadX), None);
    }
}
