use crate::trigger::{KeyCode, TriggerMask};
use tracing::trace;

/// Modifier keys that are actually held, as observed through key presses
///
/// Platforms set shift and meta flags for reasons that have nothing to do with the keys
/// (horizontal scrolling, right clicks), so the dispatcher trusts this state instead.
/// Owned by whoever builds the dispatcher and reset on focus changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    shift: bool,
    meta: bool,
    windows: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a modifier key press, ignores other keys
    pub fn press(&mut self, key: KeyCode) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.set(key, false);
    }

    fn set(&mut self, key: KeyCode, down: bool) {
        match key {
            KeyCode::Shift => self.shift = down,
            KeyCode::Meta => self.meta = down,
            KeyCode::Windows => self.windows = down,
            _ => return,
        }
        trace!("Modifier {} {}", key, if down { "down" } else { "up" });
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn meta(&self) -> bool {
        self.meta
    }

    pub fn windows(&self) -> bool {
        self.windows
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Trigger bits for the tracked modifiers
    pub fn mask(&self) -> TriggerMask {
        let mut mask = TriggerMask::empty();
        mask.set(TriggerMask::SHIFT, self.shift);
        mask.set(TriggerMask::META, self.meta);
        mask.set(TriggerMask::WIN, self.windows);
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_only_shift_meta_and_windows() {
        let mut state = ModifierState::new();
        state.press(KeyCode::Shift);
        state.press(KeyCode::Control);
        state.press(KeyCode::Windows);

        assert_eq!(state.mask(), TriggerMask::SHIFT | TriggerMask::WIN);

        state.release(KeyCode::Shift);
        assert_eq!(state.mask(), TriggerMask::WIN);

        state.reset();
        assert_eq!(state, ModifierState::default());
    }
}
