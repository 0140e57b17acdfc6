//! Raw events as handed over by platform adapters
//!
//! Coordinates are already scaled to framebuffer pixels. Modifier flags are whatever
//! the platform reported; the dispatcher decides which of them to trust.

use crate::trigger::{KeyCode, RawModifiers};
use chrono::{DateTime, Local};

/// Pointer motion, press, release or click
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,

    /// Platform flags, including the buttons held after this event
    pub modifiers: RawModifiers,

    /// Platform multi-click count, 1 for a single click
    pub click_count: u32,

    pub when: DateTime<Local>,
}

impl PointerEvent {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            modifiers: RawModifiers::empty(),
            click_count: 1,
            when: Local::now(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: RawModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    pub fn at(mut self, when: DateTime<Local>) -> Self {
        self.when = when;
        self
    }
}

/// Wheel or trackpad scroll
#[derive(Debug, Clone, PartialEq)]
pub struct WheelEvent {
    pub x: i32,
    pub y: i32,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: RawModifiers,
    pub when: DateTime<Local>,
}

impl WheelEvent {
    pub fn vertical(x: i32, y: i32, amount: f64) -> Self {
        Self {
            x,
            y,
            delta_x: 0.0,
            delta_y: amount,
            modifiers: RawModifiers::empty(),
            when: Local::now(),
        }
    }

    pub fn horizontal(x: i32, y: i32, amount: f64) -> Self {
        Self {
            delta_x: amount,
            delta_y: 0.0,
            ..Self::vertical(x, y, 0.0)
        }
    }

    pub fn with_modifiers(mut self, modifiers: RawModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: RawModifiers,
    pub when: DateTime<Local>,
}

impl KeyEvent {
    pub fn new(key: impl Into<KeyCode>) -> Self {
        Self {
            key: key.into(),
            modifiers: RawModifiers::empty(),
            when: Local::now(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: RawModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, when: DateTime<Local>) -> Self {
        self.when = when;
        self
    }
}
