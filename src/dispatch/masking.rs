//! Builds a [`TriggerMask`] from one raw event
//!
//! Order of operations:
//!
//! 1. exact-value platform corrections on the raw flags
//! 2. ctrl, alt and alt-graph straight from the raw flags
//! 3. shift, meta and windows from tracked key state only
//! 4. button bits for pointer events, never for wheel events
//! 5. double-click and scroll gesture bits

use super::modifiers::ModifierState;
use crate::trigger::{RawModifiers, TriggerMask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Key,
    Pointer,
    Wheel,
}

pub fn event_mask(
    source: EventSource,
    raw: RawModifiers,
    click_count: u32,
    tracked: &ModifierState,
    platform_quirks: bool,
) -> TriggerMask {
    let raw = if platform_quirks {
        raw.without_button_quirks()
    } else {
        raw
    };

    let mut mask = tracked.mask();
    mask.set(TriggerMask::CTRL, raw.contains(RawModifiers::CTRL));
    mask.set(TriggerMask::ALT, raw.contains(RawModifiers::ALT));
    mask.set(TriggerMask::ALT_GRAPH, raw.contains(RawModifiers::ALT_GRAPH));

    if source == EventSource::Pointer {
        mask.set(TriggerMask::BUTTON1, raw.contains(RawModifiers::BUTTON1));
        mask.set(TriggerMask::BUTTON2, raw.contains(RawModifiers::BUTTON2));
        mask.set(TriggerMask::BUTTON3, raw.contains(RawModifiers::BUTTON3));
    }

    if source != EventSource::Key && click_count > 1 {
        mask |= TriggerMask::DOUBLE_CLICK;
    }

    if source == EventSource::Wheel {
        mask |= TriggerMask::SCROLL;
        mask.remove(TriggerMask::BUTTONS);
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::KeyCode;

    fn tracked(keys: &[KeyCode]) -> ModifierState {
        let mut state = ModifierState::new();
        for key in keys {
            state.press(*key);
        }
        state
    }

    #[test]
    fn shift_comes_from_tracked_state() {
        let reported = RawModifiers::SHIFT | RawModifiers::BUTTON1;

        let without = event_mask(EventSource::Pointer, reported, 1, &tracked(&[]), true);
        assert_eq!(without, TriggerMask::BUTTON1);

        let with = event_mask(
            EventSource::Pointer,
            RawModifiers::BUTTON1,
            1,
            &tracked(&[KeyCode::Shift]),
            true,
        );
        assert_eq!(with, TriggerMask::SHIFT | TriggerMask::BUTTON1);
    }

    #[test]
    fn meta_flag_from_right_click_is_ignored() {
        let reported = RawModifiers::META | RawModifiers::BUTTON3;
        let mask = event_mask(EventSource::Pointer, reported, 1, &tracked(&[]), true);
        assert_eq!(mask, TriggerMask::BUTTON3);
    }

    #[test]
    fn wheel_never_carries_buttons() {
        let reported = RawModifiers::BUTTON1 | RawModifiers::BUTTON2 | RawModifiers::CTRL;
        let mask = event_mask(EventSource::Wheel, reported, 1, &tracked(&[]), true);
        assert_eq!(mask, TriggerMask::SCROLL | TriggerMask::CTRL);
    }

    #[test]
    fn multi_click_sets_double_click() {
        let mask = event_mask(
            EventSource::Pointer,
            RawModifiers::BUTTON1,
            2,
            &tracked(&[]),
            true,
        );
        assert_eq!(mask, TriggerMask::BUTTON1 | TriggerMask::DOUBLE_CLICK);
    }

    #[test]
    fn key_events_carry_no_buttons() {
        let mask = event_mask(
            EventSource::Key,
            RawModifiers::BUTTON1 | RawModifiers::ALT,
            1,
            &tracked(&[]),
            true,
        );
        assert_eq!(mask, TriggerMask::ALT);
    }

    #[test]
    fn button_quirks_are_corrected_first() {
        let meta_left = RawModifiers::BUTTON1 | RawModifiers::BUTTON3 | RawModifiers::META;
        let state = tracked(&[KeyCode::Meta]);

        let corrected = event_mask(EventSource::Pointer, meta_left, 1, &state, true);
        assert_eq!(corrected, TriggerMask::META | TriggerMask::BUTTON1);

        let verbatim = event_mask(EventSource::Pointer, meta_left, 1, &state, false);
        assert_eq!(
            verbatim,
            TriggerMask::META | TriggerMask::BUTTON1 | TriggerMask::BUTTON3
        );

        let alt_left = RawModifiers::BUTTON1 | RawModifiers::BUTTON2 | RawModifiers::ALT;
        let corrected = event_mask(EventSource::Pointer, alt_left, 1, &tracked(&[]), true);
        assert_eq!(corrected, TriggerMask::ALT | TriggerMask::BUTTON1);
    }
}
