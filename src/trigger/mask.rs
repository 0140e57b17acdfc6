//! Bit layouts for trigger masks and platform-reported modifier flags
//!
//! Two flag sets:
//!
//! - [`TriggerMask`] is the canonical layout stored in every [`InputTrigger`](super::InputTrigger)
//!   and produced by the dispatcher's mask builder. All adapters share it.
//! - [`RawModifiers`] is what a windowing back-end *claims* was down when it delivered an
//!   event. Those flags are not trusted blindly: shift and meta come from tracked key state,
//!   button bits are ignored for wheel events, and a few exact combinations are corrected.

use bitflags::bitflags;

bitflags! {
    /// Canonical modifier, button and gesture bits of a trigger
    ///
    /// Modifiers and buttons occupy bits 6 to 13. The windows key, double-click and scroll
    /// live above them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct TriggerMask: u32 {
        const SHIFT = 1 << 6;
        const CTRL = 1 << 7;
        const META = 1 << 8;
        const ALT = 1 << 9;
        const BUTTON1 = 1 << 10;
        const BUTTON2 = 1 << 11;
        const BUTTON3 = 1 << 12;
        const ALT_GRAPH = 1 << 13;
        const WIN = 1 << 16;
        const DOUBLE_CLICK = 1 << 20;
        const SCROLL = 1 << 21;
    }
}

impl TriggerMask {
    /// All pointer button bits
    pub const BUTTONS: TriggerMask = TriggerMask::BUTTON1
        .union(TriggerMask::BUTTON2)
        .union(TriggerMask::BUTTON3);

    /// Whether a trigger with this mask is activated by the pointer rather than the keyboard
    pub fn is_pointer_based(self) -> bool {
        self.intersects(TriggerMask::BUTTONS | TriggerMask::SCROLL)
    }
}

bitflags! {
    /// Modifier and button flags as reported by a windowing back-end
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RawModifiers: u32 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
        const ALT_GRAPH = 1 << 4;
        const BUTTON1 = 1 << 5;
        const BUTTON2 = 1 << 6;
        const BUTTON3 = 1 << 7;
    }
}

/// Exact raw flag combinations some platforms report with a bogus extra button
///
/// Each entry is `(reported, spurious)`: when the raw flags are exactly `reported`,
/// the `spurious` button is dropped before the mask is built.
pub const BUTTON_QUIRKS: [(RawModifiers, RawModifiers); 3] = [
    // meta + left click arrives with button 3 set
    (
        RawModifiers::BUTTON1
            .union(RawModifiers::BUTTON3)
            .union(RawModifiers::META),
        RawModifiers::BUTTON3,
    ),
    // alt + left click arrives with button 2 set
    (
        RawModifiers::BUTTON1
            .union(RawModifiers::BUTTON2)
            .union(RawModifiers::ALT),
        RawModifiers::BUTTON2,
    ),
    // alt + right click arrives with button 2 and meta set
    (
        RawModifiers::BUTTON3
            .union(RawModifiers::BUTTON2)
            .union(RawModifiers::ALT)
            .union(RawModifiers::META),
        RawModifiers::BUTTON2,
    ),
];

impl RawModifiers {
    /// Drops spurious button flags from the exact combinations in [`BUTTON_QUIRKS`]
    pub fn without_button_quirks(self) -> RawModifiers {
        BUTTON_QUIRKS
            .iter()
            .find(|(reported, _)| *reported == self)
            .map(|(reported, spurious)| reported.difference(*spurious))
            .unwrap_or(self)
    }
}
