use crate::trigger::KeyCode;
use egui::Key;
use serde::{Deserialize, Serialize};
use std::fmt;

const BUTTON_KEYS: [Key; 9] = [
    Key::Num0,
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
];

const POV_KEYS: [(f32, Key); 4] = [
    (pov::UP, Key::ArrowUp),
    (pov::RIGHT, Key::ArrowRight),
    (pov::DOWN, Key::ArrowDown),
    (pov::LEFT, Key::ArrowLeft),
];

/// Controller axes, named after the classic joystick layout
///
/// Left stick is X/Y, right stick RX/RY, analog triggers Z/RZ. The d-pad is reported
/// as a point-of-view hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    RX,
    RY,
    RZ,
    Pov,
}

/// Physical axis or button of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentId {
    Axis(Axis),
    Button(u8),
}

impl ComponentId {
    /// Analog components are tracked for sustained deflection, digital ones are not
    pub fn is_analog(self) -> bool {
        matches!(self, ComponentId::Axis(axis) if axis != Axis::Pov)
    }

    /// Key a digital component stands for in gamepad click triggers
    ///
    /// Buttons 0 to 8 are the digit keys, the four main hat directions are the arrow keys.
    /// Hat diagonals and other buttons have no key.
    pub fn gamepad_key(self, value: f32) -> Option<KeyCode> {
        match self {
            ComponentId::Button(index) => BUTTON_KEYS
                .get(usize::from(index))
                .map(|key| KeyCode::Named(*key)),
            ComponentId::Axis(Axis::Pov) => POV_KEYS
                .iter()
                .find(|(direction, _)| (value - direction).abs() < 1e-3)
                .map(|(_, key)| KeyCode::Named(*key)),
            ComponentId::Axis(_) => None,
        }
    }

    /// Every key the hat can press
    pub fn pov_keys() -> impl Iterator<Item = KeyCode> {
        POV_KEYS.into_iter().map(|(_, key)| KeyCode::Named(key))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Axis(axis) => write!(f, "{:?}", axis),
            ComponentId::Button(index) => write!(f, "Button{}", index),
        }
    }
}

/// POV hat values, clockwise from up
pub mod pov {
    pub const CENTERED: f32 = 0.0;
    pub const UP: f32 = 0.25;
    pub const RIGHT: f32 = 0.5;
    pub const DOWN: f32 = 0.75;
    pub const LEFT: f32 = 1.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Low-level notification from a controller backend
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Attached { device: DeviceId, name: String },
    Detached { device: DeviceId },
    Changed {
        device: DeviceId,
        component: ComponentId,
        value: f32,
    },
}
